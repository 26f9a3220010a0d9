//! Plain data mirror of a CWM file.
//!
//! These records carry exactly what a file stores, with no bank lookups and
//! no cross-references. [`crate::game::Map`] builds them on save and consumes
//! them on load.

use std::borrow::Cow;

use serde::Serialize;

use crate::bank::BankId;

/// A whole map as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapRecord {
    /// Name bytes, exactly as stored.
    pub name: Vec<u8>,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Selected tile cursor. Only stored from version 1 on.
    pub selected: Option<(u32, u32)>,
    /// Armies in ascending country ID order.
    pub armies: Vec<ArmyRecord>,
    /// `width * height` tiles, row by row.
    pub tiles: Vec<TileRecord>,
}

impl MapRecord {
    /// The name for display, with invalid UTF-8 replaced.
    #[must_use]
    pub fn display_name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Total number of units, including cargo.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.tiles
            .iter()
            .filter_map(|tile| tile.unit.as_ref())
            .map(UnitRecord::count)
            .sum()
    }
}

/// One army.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArmyRecord {
    /// Country ID, which is also the army ID.
    pub country: BankId,
    /// Funds.
    pub funds: i32,
    /// Current commander. Only stored from version 1 on.
    pub current_co: Option<BankId>,
    /// Tag commander. Only stored from version 1 on.
    pub tag_co: Option<BankId>,
}

/// One tile and everything standing on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TileRecord {
    /// Tile type ID, or `None` for an untyped tile.
    pub tile_type: Option<BankId>,
    /// Capture HP.
    pub hp: i32,
    /// Owning army.
    pub owner: Option<BankId>,
    /// The unit standing on the tile.
    pub unit: Option<UnitRecord>,
}

/// One unit and, recursively, its cargo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitRecord {
    /// Owning army.
    pub army: BankId,
    /// Unit type ID.
    pub unit_type: BankId,
    /// HP.
    pub hp: i32,
    /// Fuel.
    pub fuel: i32,
    /// Ammo.
    pub ammo: i32,
    /// Units loaded onto this one.
    pub cargo: Vec<UnitRecord>,
}

impl UnitRecord {
    /// This unit plus everything it carries, transitively.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.cargo.iter().map(Self::count).sum::<usize>()
    }

    /// Nesting depth: 1 for a unit with no cargo.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.cargo.iter().map(Self::depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(cargo: Vec<UnitRecord>) -> UnitRecord {
        UnitRecord {
            cargo,
            ..UnitRecord::default()
        }
    }

    #[test]
    fn test_count_and_depth() {
        let lander = unit(vec![unit(vec![unit(vec![])]), unit(vec![])]);
        assert_eq!(lander.count(), 4);
        assert_eq!(lander.depth(), 3);
    }

    #[test]
    fn test_map_unit_count() {
        let record = MapRecord {
            tiles: vec![
                TileRecord {
                    unit: Some(unit(vec![unit(vec![])])),
                    ..TileRecord::default()
                },
                TileRecord::default(),
            ],
            ..MapRecord::default()
        };
        assert_eq!(record.unit_count(), 2);
    }

    #[test]
    fn test_display_name_replaces_invalid_utf8() {
        let record = MapRecord {
            name: vec![0xC3, b'x'],
            ..MapRecord::default()
        };
        assert_eq!(record.display_name(), "\u{FFFD}x");
        assert_eq!(record.name, [0xC3, b'x']);
    }
}
