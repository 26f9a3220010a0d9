// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! cwstate: game state and the CWM map format for a turn-based strategy game.
//!
//! The crate keeps the state of one battle consistent and persists it:
//! - Read-only content registries (countries, terrain, units, commanders)
//! - The map aggregate: tiles, armies, units and transport cargo
//! - A versioned little-endian binary map format
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Embedding application / cwm CLI   │
//! ├─────────────────────────────────────┤
//! │      game::Map  (mutators, I/O)     │
//! ├──────────────────┬──────────────────┤
//! │   bank::Banks    │   cwm codec      │
//! └──────────────────┴──────────────────┘
//! ```

pub mod bank;
pub mod cwm;
pub mod error;
pub mod game;

pub use error::{CodecError, CodecResult, LinkError};

// Re-export key game types at crate root for convenience
pub use bank::{BankId, Banks, PropertyBank};
pub use game::{Army, ArmyId, Coord, Map, Tile, Unit, UnitId};
