//! Grid coordinates and tiles.

use std::fmt;

use serde::Serialize;

use crate::bank::BankId;
use crate::game::{ArmyId, UnitId};

/// A coordinate on the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u32,
    /// Y coordinate (row).
    pub y: u32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The neighbouring coordinate in `direction`, if it is representable.
    ///
    /// Bounds are not checked against any map.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let Self { x, y } = self;
        match direction {
            Direction::Up => y.checked_sub(1).map(|y| Self::new(x, y)),
            Direction::Down => y.checked_add(1).map(|y| Self::new(x, y)),
            Direction::Left => x.checked_sub(1).map(|x| Self::new(x, y)),
            Direction::Right => x.checked_add(1).map(|x| Self::new(x, y)),
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four grid directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Towards column 0.
    Left,
    /// Away from column 0.
    Right,
}

/// A single tile on the map.
///
/// Tiles are only changed through [`crate::game::Map`], which keeps them in
/// step with the armies and units that refer to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tile {
    pub(super) tile_type: Option<BankId>,
    pub(super) hp: i32,
    pub(super) owner: Option<ArmyId>,
    pub(super) unit: Option<UnitId>,
}

impl Tile {
    /// Create an unowned, vacant tile.
    #[must_use]
    pub const fn new(tile_type: Option<BankId>) -> Self {
        Self {
            tile_type,
            hp: 0,
            owner: None,
            unit: None,
        }
    }

    /// Tile type, or `None` if the tile was never given one.
    #[must_use]
    pub const fn tile_type(&self) -> Option<BankId> {
        self.tile_type
    }

    /// Capture HP.
    #[must_use]
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    /// Owning army.
    #[must_use]
    pub const fn owner(&self) -> Option<ArmyId> {
        self.owner
    }

    /// Unit the tile last recorded as standing on it.
    ///
    /// Prefer [`crate::game::Map::unit_on_tile`], which also checks that the
    /// unit is still on the map.
    #[must_use]
    pub const fn recorded_unit(&self) -> Option<UnitId> {
        self.unit
    }

    pub(super) fn set_hp(&mut self, hp: i32) {
        self.hp = hp.max(0);
    }
}
