//! Content record types.
//!
//! Records that refer to other banks come in two forms: a `*Def` holding raw
//! foreign-key IDs, exactly as the content files describe it, and a linked
//! form whose references have been checked by [`crate::bank::link_terrains`]
//! or [`crate::bank::link_movements_and_loadables`]. Linked records can only
//! be built by those functions.

use serde::Deserialize;

use crate::bank::BankId;

/// Properties shared by most kinds of content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommonProperties {
    /// Full display name.
    #[serde(rename = "longname", default)]
    pub name: String,
    /// Abbreviated display name.
    #[serde(rename = "shortname", default)]
    pub short_name: String,
    /// Sprite key of the icon.
    #[serde(rename = "icon", default)]
    pub icon_name: String,
    /// Description text.
    #[serde(default)]
    pub description: String,
}

/// A country an army can play as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Country {
    /// Names and icon.
    #[serde(flatten)]
    pub common: CommonProperties,
    /// RGBA colour of the country.
    #[serde(default)]
    pub colour: [u8; 4],
}

/// A class of movement (foot, tyres, treads, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MovementType {
    /// Names and icon.
    #[serde(flatten)]
    pub common: CommonProperties,
}

/// A commanding officer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Commander {
    /// Names and icon.
    #[serde(flatten)]
    pub common: CommonProperties,
    /// Sprite key of the portrait.
    #[serde(default)]
    pub portrait: String,
}

/// A kind of terrain, shared by one or more tile types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Terrain {
    /// Names and icon.
    #[serde(flatten)]
    pub common: CommonProperties,
    /// HP (capture points) of a fresh tile.
    #[serde(rename = "hp", default)]
    pub max_hp: u32,
    /// Defence stars.
    #[serde(default)]
    pub defence: u32,
    /// Movement cost per movement type ID. Negative means impassable.
    #[serde(rename = "movecosts", default)]
    pub move_costs: Vec<i32>,
    /// Picture per country ID.
    #[serde(default)]
    pub pictures: Vec<String>,
    /// Whether armies can capture tiles of this terrain.
    #[serde(rename = "capturable", default)]
    pub is_capturable: bool,
}

impl Terrain {
    /// Movement cost for the given movement type, if one is defined.
    #[must_use]
    pub fn move_cost(&self, movement: BankId) -> Option<i32> {
        self.move_costs.get(usize::try_from(movement).ok()?).copied()
    }

    /// Picture shown when the given country owns a tile of this terrain.
    #[must_use]
    pub fn picture(&self, country: BankId) -> Option<&str> {
        self.pictures
            .get(usize::try_from(country).ok()?)
            .map(String::as_str)
    }
}

/// A tile type as described by content files: the terrain is a raw ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TileTypeDef {
    /// ID of the terrain this tile type belongs to.
    #[serde(rename = "type")]
    pub terrain: BankId,
    /// Sprite per owning country ID.
    #[serde(rename = "tiles", default)]
    pub owned_tiles: Vec<String>,
    /// Sprite when nobody owns the tile.
    #[serde(rename = "neutral", default)]
    pub neutral_tile: String,
}

/// A tile type whose terrain is known to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileType {
    terrain: BankId,
    owned_tiles: Vec<String>,
    neutral_tile: String,
}

impl TileType {
    pub(super) fn linked(def: TileTypeDef) -> Self {
        Self {
            terrain: def.terrain,
            owned_tiles: def.owned_tiles,
            neutral_tile: def.neutral_tile,
        }
    }

    /// ID of this tile type's terrain.
    #[must_use]
    pub const fn terrain(&self) -> BankId {
        self.terrain
    }

    /// Sprite for a tile owned by `country`, falling back to the neutral one.
    #[must_use]
    pub fn owned_tile(&self, country: BankId) -> &str {
        usize::try_from(country)
            .ok()
            .and_then(|idx| self.owned_tiles.get(idx))
            .map_or(self.neutral_tile.as_str(), String::as_str)
    }

    /// Sprite for an unowned tile.
    #[must_use]
    pub fn neutral_tile(&self) -> &str {
        &self.neutral_tile
    }
}

/// A unit type as described by content files: references are raw IDs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitTypeDef {
    /// Names and icon.
    #[serde(flatten)]
    pub common: CommonProperties,
    /// ID of the unit type's movement type.
    #[serde(rename = "movetype")]
    pub movement_type: BankId,
    /// Picture per country ID.
    #[serde(default)]
    pub pictures: Vec<String>,
    /// Map sprite per country ID.
    #[serde(rename = "sprites", default)]
    pub units: Vec<String>,
    /// Price to deploy.
    #[serde(rename = "price", default)]
    pub cost: u32,
    /// Fuel capacity. Negative means infinite.
    #[serde(rename = "fuel", default)]
    pub max_fuel: i32,
    /// Ammo capacity. Negative means infinite.
    #[serde(rename = "ammo", default)]
    pub max_ammo: i32,
    /// Internal HP of a full-strength unit.
    #[serde(rename = "hp", default = "default_max_hp")]
    pub max_hp: u32,
    /// Movement points per turn.
    #[serde(rename = "mp", default)]
    pub movement_points: u32,
    /// Vision range.
    #[serde(default = "one")]
    pub vision: u32,
    /// Minimum attack range.
    #[serde(rename = "lowrange", default = "one")]
    pub lower_range: u32,
    /// Maximum attack range.
    #[serde(rename = "highrange", default = "one")]
    pub higher_range: u32,
    /// IDs of the unit types this unit can carry.
    #[serde(rename = "canload", default)]
    pub can_load: Vec<BankId>,
    /// How many units it can carry at once.
    #[serde(rename = "loadlimit", default)]
    pub load_limit: u32,
    /// Fuel burned at the start of each turn.
    #[serde(rename = "fuelperturn", default)]
    pub fuel_per_turn: i32,
}

const fn default_max_hp() -> u32 {
    100
}

const fn one() -> u32 {
    1
}

impl Default for UnitTypeDef {
    fn default() -> Self {
        Self {
            common: CommonProperties::default(),
            movement_type: 0,
            pictures: Vec::new(),
            units: Vec::new(),
            cost: 0,
            max_fuel: 0,
            max_ammo: 0,
            max_hp: default_max_hp(),
            movement_points: 0,
            vision: 1,
            lower_range: 1,
            higher_range: 1,
            can_load: Vec::new(),
            load_limit: 0,
            fuel_per_turn: 0,
        }
    }
}

/// A unit type whose movement type and loadable unit types are known to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitType {
    def: UnitTypeDef,
}

impl UnitType {
    pub(super) fn linked(mut def: UnitTypeDef) -> Self {
        // HP is stored signed everywhere else.
        def.max_hp = def.max_hp.min(i32::MAX.unsigned_abs());
        Self { def }
    }

    /// Names and icon.
    #[must_use]
    pub const fn common(&self) -> &CommonProperties {
        &self.def.common
    }

    /// ID of the unit type's movement type.
    #[must_use]
    pub const fn movement_type(&self) -> BankId {
        self.def.movement_type
    }

    /// Picture for the given country, if one is defined.
    #[must_use]
    pub fn picture(&self, country: BankId) -> Option<&str> {
        self.def
            .pictures
            .get(usize::try_from(country).ok()?)
            .map(String::as_str)
    }

    /// Map sprite for the given country, if one is defined.
    #[must_use]
    pub fn sprite(&self, country: BankId) -> Option<&str> {
        self.def
            .units
            .get(usize::try_from(country).ok()?)
            .map(String::as_str)
    }

    /// Price to deploy.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.def.cost
    }

    /// Fuel capacity; negative when fuel is infinite.
    #[must_use]
    pub const fn max_fuel(&self) -> i32 {
        self.def.max_fuel
    }

    /// Ammo capacity; negative when ammo is infinite.
    #[must_use]
    pub const fn max_ammo(&self) -> i32 {
        self.def.max_ammo
    }

    /// Internal HP of a full-strength unit.
    #[must_use]
    pub fn max_hp(&self) -> i32 {
        i32::try_from(self.def.max_hp).unwrap_or(i32::MAX)
    }

    /// Movement points per turn.
    #[must_use]
    pub const fn movement_points(&self) -> u32 {
        self.def.movement_points
    }

    /// Vision range.
    #[must_use]
    pub const fn vision(&self) -> u32 {
        self.def.vision
    }

    /// Minimum attack range.
    #[must_use]
    pub const fn lower_range(&self) -> u32 {
        self.def.lower_range
    }

    /// Maximum attack range.
    #[must_use]
    pub const fn higher_range(&self) -> u32 {
        self.def.higher_range
    }

    /// Check if fuel never runs out.
    #[must_use]
    pub const fn has_infinite_fuel(&self) -> bool {
        self.def.max_fuel < 0
    }

    /// Check if ammo never runs out.
    #[must_use]
    pub const fn has_infinite_ammo(&self) -> bool {
        self.def.max_ammo < 0
    }

    /// Check if units of type `other` can be loaded onto this one.
    #[must_use]
    pub fn can_load(&self, other: BankId) -> bool {
        self.def.can_load.contains(&other)
    }

    /// IDs of every unit type this one can carry.
    #[must_use]
    pub fn loadable_unit_types(&self) -> &[BankId] {
        &self.def.can_load
    }

    /// How many units it can carry at once.
    #[must_use]
    pub const fn load_limit(&self) -> u32 {
        self.def.load_limit
    }

    /// Fuel burned at the start of each turn.
    #[must_use]
    pub const fn fuel_per_turn(&self) -> i32 {
        self.def.fuel_per_turn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_lookups_out_of_range() {
        let terrain = Terrain {
            move_costs: vec![1, 2],
            pictures: vec!["plains_os".to_string()],
            ..Terrain::default()
        };
        assert_eq!(terrain.move_cost(1), Some(2));
        assert_eq!(terrain.move_cost(2), None);
        assert_eq!(terrain.picture(0), Some("plains_os"));
        assert_eq!(terrain.picture(1), None);
    }

    #[test]
    fn test_owned_tile_falls_back_to_neutral() {
        let tile = TileType::linked(TileTypeDef {
            terrain: 0,
            owned_tiles: vec!["hq_orange".to_string()],
            neutral_tile: "hq_neutral".to_string(),
        });
        assert_eq!(tile.owned_tile(0), "hq_orange");
        assert_eq!(tile.owned_tile(5), "hq_neutral");
        assert_eq!(tile.neutral_tile(), "hq_neutral");
    }

    #[test]
    fn test_infinite_supplies() {
        let unit = UnitType::linked(UnitTypeDef {
            max_fuel: -1,
            max_ammo: 9,
            ..UnitTypeDef::default()
        });
        assert!(unit.has_infinite_fuel());
        assert!(!unit.has_infinite_ammo());
        assert_eq!(unit.max_hp(), 100);
    }

    #[test]
    fn test_max_hp_clamped_to_signed_range() {
        let unit = UnitType::linked(UnitTypeDef {
            max_hp: u32::MAX,
            ..UnitTypeDef::default()
        });
        assert_eq!(unit.max_hp(), i32::MAX);
    }

    #[test]
    fn test_can_load() {
        let unit = UnitType::linked(UnitTypeDef {
            can_load: vec![0, 3],
            load_limit: 2,
            ..UnitTypeDef::default()
        });
        assert!(unit.can_load(3));
        assert!(!unit.can_load(1));
        assert_eq!(unit.loadable_unit_types(), &[0, 3]);
        assert_eq!(unit.load_limit(), 2);
    }
}
