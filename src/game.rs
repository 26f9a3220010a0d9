//! Game state for Custom Wars maps.
//!
//! A [`Map`] owns everything that changes during a battle:
//! - the tile grid, with each tile's type, HP and owner
//! - armies, keyed by country, with funds and commanders
//! - units, keyed by [`UnitId`], either on the grid or loaded onto a transport
//!
//! Static content lives in [`crate::bank::Banks`] and is only referred to by ID.

mod alloc;
mod army;
mod invariants;
mod map;
mod persist;
#[cfg(test)]
mod test_support;
mod tile;
mod unit;

pub use alloc::{UnitId, UnitIdAllocator};
pub use army::{Army, ArmyId};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use map::Map;
pub use tile::{Coord, Direction, Tile};
pub use unit::Unit;
