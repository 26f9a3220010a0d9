//! Error types for content linking and the CWM codec.

use std::io;

use thiserror::Error;

use crate::bank::BankId;

/// Errors raised while reading or writing CWM map data.
///
/// Nothing above [`crate::game::Map`] ever sees one of these: `Map::load` and
/// `Map::save` log them and report `false`.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The underlying file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The data ended before a value could be read.
    #[error("unexpected end of data at offset {offset}: {needed} more byte(s) needed")]
    Truncated {
        /// Offset of the value that could not be read.
        offset: usize,
        /// Number of bytes missing.
        needed: usize,
    },
    /// The header did not hold a known `BASE_MAGIC + version` value.
    #[error("unrecognised CWM header {0:#010x}")]
    UnsupportedVersion(u32),
    /// A string is longer than a `u32` length prefix can describe.
    #[error("string of {len} bytes does not fit a 32-bit length prefix")]
    StringTooLong {
        /// Length of the string in bytes.
        len: usize,
    },
    /// The stored dimensions cannot be addressed on this platform.
    #[error("map dimensions {width}x{height} are too large")]
    SizeOverflow {
        /// Stored width.
        width: u32,
        /// Stored height.
        height: u32,
    },
    /// Units were nested inside each other deeper than the codec allows.
    #[error("units are nested {depth} levels deep")]
    NestingTooDeep {
        /// Depth at which decoding stopped.
        depth: usize,
    },
    /// A stored content ID has no entry in the matching bank.
    #[error("{bank} bank has no entry with ID {id}")]
    UnknownEntry {
        /// Name of the bank that was searched.
        bank: &'static str,
        /// The ID that was not found.
        id: BankId,
    },
    /// The map refused a value read from the file.
    #[error("map rejected stored data: {0}")]
    Rejected(String),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while building or linking content banks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Two entries in one bank share a script name.
    #[error("{bank} bank has more than one entry named \"{name}\"")]
    DuplicateName {
        /// Name of the bank.
        bank: &'static str,
        /// The repeated script name.
        name: String,
    },
    /// An entry refers to an ID that its target bank does not contain.
    #[error("{bank} entry \"{entry}\" has {field} {id}, which does not exist")]
    DanglingReference {
        /// Name of the bank holding the broken entry.
        bank: &'static str,
        /// Script name of the broken entry.
        entry: String,
        /// Which field holds the reference.
        field: &'static str,
        /// The unresolved ID.
        id: BankId,
    },
}
