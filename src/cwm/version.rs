//! Versioned CWM layouts.
//!
//! A file starts with a `u32` holding `BASE_MAGIC + version`. Each version
//! has an entry in the layout table; versions only ever add fields, and share the
//! tile and unit encodings below.
//!
//! ```text
//! v0  name  width height                  armies(country funds)              tiles
//! v1  name  width height  sel_x sel_y     armies(country funds current tag)  tiles
//!
//! tile := type:u32 hp:i32 owner:u32 (NO_ARMY | unit)
//! unit := army:u32 type:u32 hp:i32 fuel:i32 ammo:i32 unit* NO_ARMY
//! ```
//!
//! A vacant tile ends with a single `NO_ARMY`. An occupied tile ends with its
//! unit, whose own `NO_ARMY` closes its cargo list.

use crate::cwm::{ArmyRecord, BinaryReader, BinaryWriter, MapRecord, TileRecord, UnitRecord};
use crate::error::{CodecError, CodecResult};

/// Header value of a version 0 file: the bytes `\0CWM` read little-endian.
pub const BASE_MAGIC: u32 = 0x4D57_4300;

/// Newest version this crate writes by default.
pub const LATEST_VERSION: u8 = 1;

/// Deepest transport nesting accepted in either direction.
pub const MAX_CARGO_DEPTH: usize = 64;

/// Wire value meaning "no army". Also marks a vacant tile and closes every
/// unit's cargo list.
pub const NO_ARMY: u32 = u32::MAX;

/// Wire value of a tile that has no tile type.
pub const NO_TILE_TYPE: u32 = u32::MAX;

/// Wire value of an absent commander.
pub const NO_COMMANDER: u32 = u32::MAX;

/// Smallest possible encoding of one tile: type, HP, owner and `NO_ARMY`.
const MIN_TILE_BYTES: usize = 16;

type EncodeFn = fn(&MapRecord, &mut BinaryWriter) -> CodecResult<()>;
type DecodeFn = fn(&mut BinaryReader<'_>) -> CodecResult<MapRecord>;

struct Layout {
    encode: EncodeFn,
    decode: DecodeFn,
}

/// Indexed by version number.
const VERSIONS: &[Layout] = &[
    Layout {
        encode: encode_v0,
        decode: decode_v0,
    },
    Layout {
        encode: encode_v1,
        decode: decode_v1,
    },
];

/// Check if `version` can be read and written.
#[must_use]
pub fn is_supported(version: u8) -> bool {
    usize::from(version) < VERSIONS.len()
}

/// Header value written for `version`.
#[must_use]
pub fn magic(version: u8) -> u32 {
    BASE_MAGIC.wrapping_add(u32::from(version))
}

fn layout(version: u8) -> CodecResult<&'static Layout> {
    VERSIONS
        .get(usize::from(version))
        .ok_or(CodecError::UnsupportedVersion(magic(version)))
}

/// Read the header and return the version it announces.
///
/// # Errors
///
/// Returns [`CodecError::Truncated`] if there is no header, or
/// [`CodecError::UnsupportedVersion`] if it names no known version.
pub fn read_version(reader: &mut BinaryReader<'_>) -> CodecResult<u8> {
    let raw: u32 = reader.read()?;
    u8::try_from(raw.wrapping_sub(BASE_MAGIC))
        .ok()
        .filter(|&version| is_supported(version))
        .ok_or(CodecError::UnsupportedVersion(raw))
}

/// Encode `record` in the layout of `version`.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedVersion`] for an unknown version, or an
/// error if the record cannot be represented (wrong tile count, a unit owned
/// by the `NO_ARMY` sentinel, cargo nested too deep).
pub fn encode(record: &MapRecord, version: u8) -> CodecResult<Vec<u8>> {
    let layout = layout(version)?;
    let mut writer = BinaryWriter::new();
    writer.write(magic(version));
    (layout.encode)(record, &mut writer)?;
    Ok(writer.into_bytes())
}

/// Decode a complete file.
///
/// # Errors
///
/// Returns the first format error encountered.
pub fn decode(bytes: &[u8]) -> CodecResult<(u8, MapRecord)> {
    let mut reader = BinaryReader::new(bytes);
    let version = read_version(&mut reader)?;
    let record = (layout(version)?.decode)(&mut reader)?;
    if reader.remaining() > 0 {
        log::warn!(
            "ignoring {} trailing byte(s) after version {version} map data",
            reader.remaining()
        );
    }
    Ok((version, record))
}

fn encode_v0(record: &MapRecord, writer: &mut BinaryWriter) -> CodecResult<()> {
    write_name_and_size(record, writer)?;
    write_count(writer, record.armies.len())?;
    for army in &record.armies {
        write_army(army, writer)?;
    }
    write_tiles(record, writer)
}

fn decode_v0(reader: &mut BinaryReader<'_>) -> CodecResult<MapRecord> {
    let (name, width, height) = read_name_and_size(reader)?;
    let count = reader.read::<u32>()?;
    let mut armies = Vec::new();
    for _ in 0..count {
        armies.push(read_army(reader)?);
    }
    let tiles = read_tiles(reader, width, height)?;
    Ok(MapRecord {
        name,
        width,
        height,
        selected: None,
        armies,
        tiles,
    })
}

fn encode_v1(record: &MapRecord, writer: &mut BinaryWriter) -> CodecResult<()> {
    write_name_and_size(record, writer)?;
    let (x, y) = record.selected.unwrap_or_default();
    writer.write(x);
    writer.write(y);
    write_count(writer, record.armies.len())?;
    for army in &record.armies {
        write_army(army, writer)?;
        writer.write(army.current_co.unwrap_or(NO_COMMANDER));
        writer.write(army.tag_co.unwrap_or(NO_COMMANDER));
    }
    write_tiles(record, writer)
}

fn decode_v1(reader: &mut BinaryReader<'_>) -> CodecResult<MapRecord> {
    let (name, width, height) = read_name_and_size(reader)?;
    let selected = Some((reader.read()?, reader.read()?));
    let count = reader.read::<u32>()?;
    let mut armies = Vec::new();
    for _ in 0..count {
        let mut army = read_army(reader)?;
        army.current_co = optional(reader.read()?, NO_COMMANDER);
        army.tag_co = optional(reader.read()?, NO_COMMANDER);
        armies.push(army);
    }
    let tiles = read_tiles(reader, width, height)?;
    Ok(MapRecord {
        name,
        width,
        height,
        selected,
        armies,
        tiles,
    })
}

fn optional(raw: u32, none: u32) -> Option<u32> {
    (raw != none).then_some(raw)
}

fn write_count(writer: &mut BinaryWriter, count: usize) -> CodecResult<()> {
    let count = u32::try_from(count)
        .map_err(|_| CodecError::Rejected(format!("{count} armies cannot be stored")))?;
    writer.write(count);
    Ok(())
}

fn tile_count(width: u32, height: u32) -> CodecResult<usize> {
    usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .ok_or(CodecError::SizeOverflow { width, height })
}

fn write_name_and_size(record: &MapRecord, writer: &mut BinaryWriter) -> CodecResult<()> {
    writer.write_bytes(&record.name)?;
    writer.write(record.width);
    writer.write(record.height);
    Ok(())
}

fn read_name_and_size(reader: &mut BinaryReader<'_>) -> CodecResult<(Vec<u8>, u32, u32)> {
    let name = reader.read_bytes()?;
    let width = reader.read()?;
    let height = reader.read()?;
    Ok((name, width, height))
}

fn write_army(army: &ArmyRecord, writer: &mut BinaryWriter) -> CodecResult<()> {
    if army.country == NO_ARMY {
        return Err(CodecError::Rejected(
            "army ID collides with the NO_ARMY sentinel".to_string(),
        ));
    }
    writer.write(army.country);
    writer.write(army.funds);
    Ok(())
}

fn read_army(reader: &mut BinaryReader<'_>) -> CodecResult<ArmyRecord> {
    Ok(ArmyRecord {
        country: reader.read()?,
        funds: reader.read()?,
        current_co: None,
        tag_co: None,
    })
}

fn write_tiles(record: &MapRecord, writer: &mut BinaryWriter) -> CodecResult<()> {
    let expected = tile_count(record.width, record.height)?;
    if record.tiles.len() != expected {
        return Err(CodecError::Rejected(format!(
            "{} tiles given for a {}x{} map",
            record.tiles.len(),
            record.width,
            record.height
        )));
    }
    for tile in &record.tiles {
        writer.write(tile.tile_type.unwrap_or(NO_TILE_TYPE));
        writer.write(tile.hp);
        writer.write(tile.owner.unwrap_or(NO_ARMY));
        match &tile.unit {
            Some(unit) => write_unit(unit, writer, 0)?,
            None => writer.write(NO_ARMY),
        }
    }
    Ok(())
}

fn read_tiles(
    reader: &mut BinaryReader<'_>,
    width: u32,
    height: u32,
) -> CodecResult<Vec<TileRecord>> {
    let count = tile_count(width, height)?;
    // Refuse to allocate for tiles the data cannot possibly hold.
    reader.require(count.saturating_mul(MIN_TILE_BYTES))?;
    let mut tiles = Vec::with_capacity(count);
    for _ in 0..count {
        tiles.push(TileRecord {
            tile_type: optional(reader.read()?, NO_TILE_TYPE),
            hp: reader.read()?,
            owner: optional(reader.read()?, NO_ARMY),
            unit: match reader.read::<u32>()? {
                NO_ARMY => None,
                army => Some(read_unit(reader, army, 0)?),
            },
        });
    }
    Ok(tiles)
}

fn write_unit(unit: &UnitRecord, writer: &mut BinaryWriter, depth: usize) -> CodecResult<()> {
    if depth >= MAX_CARGO_DEPTH {
        return Err(CodecError::NestingTooDeep { depth: depth + 1 });
    }
    if unit.army == NO_ARMY {
        return Err(CodecError::Rejected(
            "unit owned by the NO_ARMY sentinel".to_string(),
        ));
    }
    writer.write(unit.army);
    writer.write(unit.unit_type);
    writer.write(unit.hp);
    writer.write(unit.fuel);
    writer.write(unit.ammo);
    for loaded in &unit.cargo {
        write_unit(loaded, writer, depth + 1)?;
    }
    writer.write(NO_ARMY);
    Ok(())
}

/// Read the rest of a unit whose army word has already been read.
fn read_unit(reader: &mut BinaryReader<'_>, army: u32, depth: usize) -> CodecResult<UnitRecord> {
    if depth >= MAX_CARGO_DEPTH {
        return Err(CodecError::NestingTooDeep { depth: depth + 1 });
    }
    let mut unit = UnitRecord {
        army,
        unit_type: reader.read()?,
        hp: reader.read()?,
        fuel: reader.read()?,
        ammo: reader.read()?,
        cargo: Vec::new(),
    };
    loop {
        match reader.read::<u32>()? {
            NO_ARMY => return Ok(unit),
            army => unit.cargo.push(read_unit(reader, army, depth + 1)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn infantry(army: u32, cargo: Vec<UnitRecord>) -> UnitRecord {
        UnitRecord {
            army,
            unit_type: 0,
            hp: 100,
            fuel: 99,
            ammo: 0,
            cargo,
        }
    }

    fn one_tile(unit: Option<UnitRecord>) -> MapRecord {
        MapRecord {
            name: Vec::new(),
            width: 1,
            height: 1,
            selected: None,
            armies: vec![ArmyRecord {
                country: 0,
                funds: 500,
                ..ArmyRecord::default()
            }],
            tiles: vec![TileRecord {
                tile_type: Some(2),
                hp: 20,
                owner: Some(0),
                unit,
            }],
        }
    }

    #[test]
    fn test_magic_bytes() {
        assert_eq!(BASE_MAGIC.to_le_bytes(), *b"\0CWM");
        assert_eq!(magic(1).to_le_bytes(), [1, b'C', b'W', b'M']);
    }

    #[test]
    fn test_v0_exact_bytes() {
        let bytes = encode(&one_tile(Some(infantry(0, vec![]))), 0).unwrap();
        let mut expected = words(&[BASE_MAGIC, 0, 1, 1, 1, 0, 500, 2, 20, 0]);
        expected.extend(words(&[0, 0, 100, 99, 0, NO_ARMY]));
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_transport_with_one_cargo_bytes() {
        let bytes = encode(&one_tile(Some(infantry(0, vec![infantry(0, vec![])]))), 0).unwrap();
        let mut expected = words(&[BASE_MAGIC, 0, 1, 1, 1, 0, 500, 2, 20, 0]);
        expected.extend(words(&[0, 0, 100, 99, 0]));
        expected.extend(words(&[0, 0, 100, 99, 0, NO_ARMY, NO_ARMY]));
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_decode_hand_built_two_tile_map() {
        // 2x1: an infantry on (0, 0), (1, 0) vacant and untyped.
        let mut bytes = words(&[BASE_MAGIC, 2]);
        bytes.extend_from_slice(b"Hi");
        bytes.extend(words(&[2, 1, 1, 0, 700]));
        bytes.extend(words(&[0, 10, NO_ARMY, 0, 3, 100, 40, 2, NO_ARMY]));
        bytes.extend(words(&[NO_TILE_TYPE, 0, NO_ARMY, NO_ARMY]));

        let (version, record) = decode(&bytes).unwrap();
        assert_eq!(version, 0);
        assert_eq!(record.name, b"Hi");
        assert_eq!((record.width, record.height), (2, 1));
        assert_eq!(record.tiles.len(), 2);
        let unit = record.tiles[0].unit.as_ref().unwrap();
        assert_eq!(
            (unit.army, unit.unit_type, unit.hp, unit.fuel, unit.ammo),
            (0, 3, 100, 40, 2)
        );
        assert!(unit.cargo.is_empty());
        assert_eq!(record.tiles[1], TileRecord::default());
        assert_eq!(encode(&record, 0).unwrap(), bytes);
    }

    #[test]
    fn test_v1_adds_cursor_and_commanders() {
        let mut record = one_tile(None);
        record.selected = Some((0, 0));
        record.armies[0].tag_co = Some(3);
        let bytes = encode(&record, 1).unwrap();
        let mut expected = words(&[magic(1), 0, 1, 1, 0, 0, 1, 0, 500, NO_COMMANDER, 3]);
        expected.extend(words(&[2, 20, 0, NO_ARMY]));
        assert_eq!(bytes, expected);
        assert_eq!(decode(&bytes).unwrap(), (1, record));
    }

    #[test]
    fn test_v0_drops_v1_fields() {
        let mut record = one_tile(None);
        record.selected = Some((0, 0));
        record.armies[0].current_co = Some(1);
        let (version, decoded) = decode(&encode(&record, 0).unwrap()).unwrap();
        assert_eq!(version, 0);
        assert_eq!(decoded.selected, None);
        assert_eq!(decoded.armies[0].current_co, None);
    }

    #[test]
    fn test_nested_cargo_termination() {
        let record = one_tile(Some(infantry(
            0,
            vec![infantry(0, vec![infantry(0, vec![])]), infantry(0, vec![])],
        )));
        let bytes = encode(&record, 0).unwrap();
        // One terminator per unit, closing its cargo list.
        let terminators = bytes
            .chunks_exact(4)
            .skip(10)
            .filter(|chunk| *chunk == NO_ARMY.to_le_bytes())
            .count();
        assert_eq!(terminators, 4);
        assert_eq!(decode(&bytes).unwrap().1, record);
    }

    #[test]
    fn test_untyped_tile() {
        let mut record = one_tile(None);
        record.tiles[0].tile_type = None;
        record.tiles[0].owner = None;
        let bytes = encode(&record, 0).unwrap();
        assert_eq!(&bytes[28..36], &words(&[NO_TILE_TYPE, 20])[..]);
        assert_eq!(decode(&bytes).unwrap().1, record);
    }

    #[test]
    fn test_unsupported_version() {
        let bytes = words(&[magic(7)]);
        assert!(matches!(
            decode(&bytes),
            Err(CodecError::UnsupportedVersion(raw)) if raw == magic(7)
        ));
        assert!(matches!(
            decode(&words(&[0x1234_5678])),
            Err(CodecError::UnsupportedVersion(0x1234_5678))
        ));
        assert!(matches!(
            encode(&MapRecord::default(), 2),
            Err(CodecError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_truncated_tile_data() {
        let bytes = encode(&one_tile(Some(infantry(0, vec![]))), 1).unwrap();
        let cut = &bytes[..bytes.len() - 2];
        assert!(matches!(decode(cut), Err(CodecError::Truncated { .. })));
    }

    #[test]
    fn test_huge_dimensions_do_not_allocate() {
        let mut bytes = words(&[BASE_MAGIC, 0, 60_000, 60_000, 0]);
        bytes.extend(words(&[0, 0, 0, NO_ARMY]));
        assert!(matches!(decode(&bytes), Err(CodecError::Truncated { .. })));
    }

    #[test]
    fn test_nesting_limit() {
        let mut deepest = infantry(0, vec![]);
        for _ in 0..MAX_CARGO_DEPTH {
            deepest = infantry(0, vec![deepest]);
        }
        let err = encode(&one_tile(Some(deepest)), 0).unwrap_err();
        assert!(matches!(err, CodecError::NestingTooDeep { depth } if depth == MAX_CARGO_DEPTH + 1));
    }

    #[test]
    fn test_tile_count_mismatch() {
        let mut record = one_tile(None);
        record.width = 2;
        assert!(matches!(encode(&record, 0), Err(CodecError::Rejected(_))));
    }

    #[test]
    fn test_sentinel_army_cannot_be_written() {
        let record = one_tile(Some(infantry(NO_ARMY, vec![])));
        assert!(matches!(encode(&record, 0), Err(CodecError::Rejected(_))));
    }
}
