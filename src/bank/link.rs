//! Cross-bank reference resolution.
//!
//! Content is loaded in two phases: every bank is first built from raw
//! records, then the references between banks are checked and the records
//! that carry them are rebuilt in their linked form. After linking, any
//! foreign-key ID held by a linked record is guaranteed to resolve.

use crate::bank::{
    BankId, Commander, Country, MovementType, PropertyBank, Terrain, TileType, TileTypeDef,
    UnitType, UnitTypeDef,
};
use crate::error::LinkError;

/// Resolve the terrain of every tile type.
///
/// # Errors
///
/// Returns [`LinkError::DanglingReference`] naming the first tile type whose
/// terrain ID is not in `terrains`.
pub fn link_terrains(
    tiles: PropertyBank<TileTypeDef>,
    terrains: &PropertyBank<Terrain>,
) -> Result<PropertyBank<TileType>, LinkError> {
    let kind = tiles.kind();
    tiles.try_map(|entry| {
        check_reference(terrains, kind, entry.script_name(), "terrain", entry.terrain)?;
        Ok(TileType::linked(entry.record().clone()))
    })
}

/// Resolve the movement type and loadable unit types of every unit type.
///
/// Loadable unit types live in the same bank, so a unit type may name one
/// that appears after it.
///
/// # Errors
///
/// Returns [`LinkError::DanglingReference`] naming the first unit type with a
/// movement type or loadable unit type that does not exist.
pub fn link_movements_and_loadables(
    units: PropertyBank<UnitTypeDef>,
    movements: &PropertyBank<MovementType>,
) -> Result<PropertyBank<UnitType>, LinkError> {
    let kind = units.kind();
    let unit_count = units.len();
    units.try_map(|entry| {
        let name = entry.script_name();
        check_reference(movements, kind, name, "movement type", entry.movement_type)?;
        if let Some(&missing) = entry
            .can_load
            .iter()
            .find(|&&id| usize::try_from(id).map_or(true, |idx| idx >= unit_count))
        {
            return Err(LinkError::DanglingReference {
                bank: kind,
                entry: name.to_string(),
                field: "loadable unit type",
                id: missing,
            });
        }
        Ok(UnitType::linked(entry.record().clone()))
    })
}

fn check_reference<T>(
    target: &PropertyBank<T>,
    bank: &'static str,
    entry: &str,
    field: &'static str,
    id: BankId,
) -> Result<(), LinkError> {
    if target.contains(id) {
        Ok(())
    } else {
        Err(LinkError::DanglingReference {
            bank,
            entry: entry.to_string(),
            field,
            id,
        })
    }
}

/// Every bank as built from content files, before linking.
#[derive(Debug, Clone)]
pub struct BankDefs {
    /// Countries, in turn-order identity.
    pub countries: PropertyBank<Country>,
    /// Terrains.
    pub terrains: PropertyBank<Terrain>,
    /// Tile types with raw terrain IDs.
    pub tile_types: PropertyBank<TileTypeDef>,
    /// Movement types.
    pub movement_types: PropertyBank<MovementType>,
    /// Unit types with raw movement and loadable IDs.
    pub unit_types: PropertyBank<UnitTypeDef>,
    /// Commanders.
    pub commanders: PropertyBank<Commander>,
}

/// The complete, linked and immutable set of content banks.
///
/// Shared read-only by every [`crate::game::Map`] built on it.
#[derive(Debug, Clone)]
pub struct Banks {
    countries: PropertyBank<Country>,
    terrains: PropertyBank<Terrain>,
    tile_types: PropertyBank<TileType>,
    movement_types: PropertyBank<MovementType>,
    unit_types: PropertyBank<UnitType>,
    commanders: PropertyBank<Commander>,
}

impl Banks {
    /// Link raw banks into a usable content set.
    ///
    /// # Errors
    ///
    /// Returns the first unresolved reference found.
    pub fn link(defs: BankDefs) -> Result<Self, LinkError> {
        let tile_types = link_terrains(defs.tile_types, &defs.terrains)?;
        let unit_types = link_movements_and_loadables(defs.unit_types, &defs.movement_types)?;
        log::debug!(
            "linked {} countries, {} terrains, {} tile types, {} unit types, {} commanders",
            defs.countries.len(),
            defs.terrains.len(),
            tile_types.len(),
            unit_types.len(),
            defs.commanders.len()
        );
        Ok(Self {
            countries: defs.countries,
            terrains: defs.terrains,
            tile_types,
            movement_types: defs.movement_types,
            unit_types,
            commanders: defs.commanders,
        })
    }

    /// Country bank.
    #[must_use]
    pub const fn countries(&self) -> &PropertyBank<Country> {
        &self.countries
    }

    /// Terrain bank.
    #[must_use]
    pub const fn terrains(&self) -> &PropertyBank<Terrain> {
        &self.terrains
    }

    /// Tile type bank.
    #[must_use]
    pub const fn tile_types(&self) -> &PropertyBank<TileType> {
        &self.tile_types
    }

    /// Movement type bank.
    #[must_use]
    pub const fn movement_types(&self) -> &PropertyBank<MovementType> {
        &self.movement_types
    }

    /// Unit type bank.
    #[must_use]
    pub const fn unit_types(&self) -> &PropertyBank<UnitType> {
        &self.unit_types
    }

    /// Commander bank.
    #[must_use]
    pub const fn commanders(&self) -> &PropertyBank<Commander> {
        &self.commanders
    }

    /// Terrain of the given tile type.
    ///
    /// Linking guarantees this is `Some` for every tile type in the bank.
    #[must_use]
    pub fn terrain_of(&self, tile_type: BankId) -> Option<&Terrain> {
        let tile = self.tile_types.get(tile_type)?;
        self.terrains.get(tile.terrain()).map(|entry| entry.record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terrains() -> PropertyBank<Terrain> {
        PropertyBank::from_entries(
            "terrain",
            [
                ("plains", Terrain { max_hp: 0, ..Terrain::default() }),
                ("city", Terrain { max_hp: 20, is_capturable: true, ..Terrain::default() }),
            ],
        )
        .unwrap()
    }

    fn movements() -> PropertyBank<MovementType> {
        PropertyBank::from_entries("movement type", [("foot", MovementType::default())]).unwrap()
    }

    #[test]
    fn test_link_terrains() {
        let tiles = PropertyBank::from_entries(
            "tile type",
            [
                ("plains", TileTypeDef { terrain: 0, ..TileTypeDef::default() }),
                ("city", TileTypeDef { terrain: 1, ..TileTypeDef::default() }),
            ],
        )
        .unwrap();
        let linked = link_terrains(tiles, &terrains()).unwrap();
        assert_eq!(linked.get_by_name("city").unwrap().terrain(), 1);
    }

    #[test]
    fn test_link_terrains_dangling() {
        let tiles = PropertyBank::from_entries(
            "tile type",
            [("bridge", TileTypeDef { terrain: 9, ..TileTypeDef::default() })],
        )
        .unwrap();
        let err = link_terrains(tiles, &terrains()).unwrap_err();
        assert_eq!(
            err,
            LinkError::DanglingReference {
                bank: "tile type",
                entry: "bridge".to_string(),
                field: "terrain",
                id: 9,
            }
        );
    }

    #[test]
    fn test_loadables_may_reference_later_entries() {
        let units = PropertyBank::from_entries(
            "unit type",
            [
                ("apc", UnitTypeDef { can_load: vec![1], ..UnitTypeDef::default() }),
                ("infantry", UnitTypeDef::default()),
            ],
        )
        .unwrap();
        let linked = link_movements_and_loadables(units, &movements()).unwrap();
        assert!(linked.get(0).unwrap().can_load(1));
    }

    #[test]
    fn test_loadable_out_of_range() {
        let units = PropertyBank::from_entries(
            "unit type",
            [("apc", UnitTypeDef { can_load: vec![1], ..UnitTypeDef::default() })],
        )
        .unwrap();
        let err = link_movements_and_loadables(units, &movements()).unwrap_err();
        assert!(matches!(
            err,
            LinkError::DanglingReference { field: "loadable unit type", id: 1, .. }
        ));
    }

    #[test]
    fn test_missing_movement_type() {
        let units = PropertyBank::from_entries(
            "unit type",
            [("tank", UnitTypeDef { movement_type: 4, ..UnitTypeDef::default() })],
        )
        .unwrap();
        let err = link_movements_and_loadables(units, &movements()).unwrap_err();
        assert!(matches!(
            err,
            LinkError::DanglingReference { field: "movement type", id: 4, .. }
        ));
    }

    #[test]
    fn test_banks_terrain_of() {
        let defs = BankDefs {
            countries: PropertyBank::empty("country"),
            terrains: terrains(),
            tile_types: PropertyBank::from_entries(
                "tile type",
                [("city", TileTypeDef { terrain: 1, ..TileTypeDef::default() })],
            )
            .unwrap(),
            movement_types: movements(),
            unit_types: PropertyBank::empty("unit type"),
            commanders: PropertyBank::empty("commander"),
        };
        let banks = Banks::link(defs).unwrap();
        assert_eq!(banks.terrain_of(0).unwrap().max_hp, 20);
        assert!(banks.terrain_of(1).is_none());
    }
}
