//! Little-endian primitive reader and writer.
//!
//! Every multi-byte number is little-endian. Strings are a `u32` byte count
//! followed by the raw bytes, with no terminator.

use std::mem::size_of;

use crate::error::{CodecError, CodecResult};

/// A fixed-width number that can be stored in a CWM stream.
pub trait WireNumber: Copy {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Append the little-endian encoding of `self`.
    fn put(self, out: &mut Vec<u8>);

    /// Decode from exactly [`Self::SIZE`] bytes.
    fn get(bytes: &[u8]) -> Self;
}

macro_rules! wire_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WireNumber for $ty {
                const SIZE: usize = size_of::<$ty>();

                #[inline]
                fn put(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn get(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(buf)
                }
            }
        )*
    };
}

wire_number!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Growable output buffer.
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append a number.
    #[inline]
    pub fn write<T: WireNumber>(&mut self, value: T) {
        value.put(&mut self.buf);
    }

    /// Append a boolean as a single byte.
    pub fn write_bool(&mut self, value: bool) {
        self.write(u8::from(value));
    }

    /// Append a length-prefixed byte string, as is.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::StringTooLong`] if the length does not fit a `u32`.
    pub fn write_bytes(&mut self, value: &[u8]) -> CodecResult<()> {
        let len = u32::try_from(value.len())
            .map_err(|_| CodecError::StringTooLong { len: value.len() })?;
        self.write(len);
        self.buf.extend_from_slice(value);
        Ok(())
    }

    /// Consume the writer and return its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Bounds-checked cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    /// Start reading at the beginning of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Offset of the next byte to be read.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fail unless at least `len` more bytes are available, without consuming them.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if the data is too short.
    pub fn require(&self, len: usize) -> CodecResult<()> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(CodecError::Truncated {
                offset: self.pos,
                needed: len - remaining,
            });
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        self.require(len)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read a number.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if fewer than `T::SIZE` bytes remain.
    #[inline]
    pub fn read<T: WireNumber>(&mut self) -> CodecResult<T> {
        self.take(T::SIZE).map(T::get)
    }

    /// Read a single-byte boolean; any non-zero byte is `true`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] at end of data.
    pub fn read_bool(&mut self) -> CodecResult<bool> {
        Ok(self.read::<u8>()? != 0)
    }

    /// Read a length-prefixed byte string. No encoding is assumed.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if the prefix or the bytes it
    /// announces are missing.
    pub fn read_bytes(&mut self) -> CodecResult<Vec<u8>> {
        let len = self.read::<u32>()?;
        let len = usize::try_from(len).map_err(|_| CodecError::Truncated {
            offset: self.pos,
            needed: usize::MAX,
        })?;
        let bytes = self.take(len)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_little_endian() {
        let mut writer = BinaryWriter::new();
        writer.write(0x0102_0304u32);
        writer.write(-2i32);
        writer.write(0xABu8);
        assert_eq!(
            writer.into_bytes(),
            vec![0x04, 0x03, 0x02, 0x01, 0xFE, 0xFF, 0xFF, 0xFF, 0xAB]
        );
    }

    #[test]
    fn test_read_sequence() {
        let bytes = [0x00, 0x43, 0x57, 0x4D, 0x07, 0x00, 0x00, 0x00, 0x01];
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(reader.read::<u32>().unwrap(), 0x4D57_4300);
        assert_eq!(reader.read::<i32>().unwrap(), 7);
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_truncated_reports_offset() {
        let mut reader = BinaryReader::new(&[1, 2, 3, 4, 5, 6]);
        reader.read::<u32>().unwrap();
        let err = reader.read::<u32>().unwrap_err();
        assert!(matches!(
            err,
            CodecError::Truncated {
                offset: 4,
                needed: 2
            }
        ));
        // A failed read consumes nothing.
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_string_layout() {
        let mut writer = BinaryWriter::new();
        writer.write_bytes(b"Map").unwrap();
        assert_eq!(writer.len(), 7);
        let bytes = writer.into_bytes();
        assert_eq!(&bytes[..4], &[3, 0, 0, 0]);
        assert_eq!(&bytes[4..], b"Map");
        assert_eq!(BinaryReader::new(&bytes).read_bytes().unwrap(), b"Map");
    }

    #[test]
    fn test_string_length_beyond_data() {
        let bytes = [0xFF, 0xFF, 0xFF, 0x7F, b'a'];
        let err = BinaryReader::new(&bytes).read_bytes().unwrap_err();
        assert!(matches!(err, CodecError::Truncated { offset: 4, .. }));
    }

    #[test]
    fn test_invalid_utf8_is_kept() {
        let bytes = [2, 0, 0, 0, 0xC3, b'x'];
        let name = BinaryReader::new(&bytes).read_bytes().unwrap();
        assert_eq!(name, [0xC3, b'x']);
        let mut writer = BinaryWriter::new();
        writer.write_bytes(&name).unwrap();
        assert_eq!(writer.into_bytes(), bytes);
    }
}
