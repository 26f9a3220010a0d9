//! The CWM binary map format.
//!
//! Pure byte-level encoding: [`encode`] turns a [`MapRecord`] into the bytes
//! of a given format version and [`decode`] reverses it. Content IDs are
//! stored raw; checking them against the banks is left to
//! [`crate::game::Map`].

mod binary;
mod record;
mod version;

pub use binary::{BinaryReader, BinaryWriter, WireNumber};
pub use record::{ArmyRecord, MapRecord, TileRecord, UnitRecord};
pub use version::{
    decode, encode, is_supported, magic, read_version, BASE_MAGIC, LATEST_VERSION,
    MAX_CARGO_DEPTH, NO_ARMY, NO_COMMANDER, NO_TILE_TYPE,
};
