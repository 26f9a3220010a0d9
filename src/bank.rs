//! Static game content.
//!
//! Content is held in immutable [`PropertyBank`]s, one per kind of record:
//! - Countries, which double as army identities
//! - Terrains and the tile types drawn on them
//! - Movement types and unit types
//! - Commanders
//!
//! Banks are built from `(script name, record)` pairs, then cross-linked by
//! [`Banks::link`].

mod link;
mod property;
mod records;

pub use link::{link_movements_and_loadables, link_terrains, BankDefs, Banks};
pub use property::{BankEntry, BankId, PropertyBank};
pub use records::{
    Commander, CommonProperties, Country, MovementType, Terrain, TileType, TileTypeDef, UnitType,
    UnitTypeDef,
};
