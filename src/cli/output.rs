//! Output formatting utilities for CLI.

use std::borrow::Cow;

use cwstate::cwm::{ArmyRecord, MapRecord};
use serde::Serialize;

/// JSON-serializable summary of a map file.
#[derive(Debug, Serialize)]
pub(super) struct JsonMapSummary<'a> {
    /// Format version the file was written in.
    pub(super) version: u8,
    /// Map name, with invalid UTF-8 replaced.
    pub(super) name: Cow<'a, str>,
    /// Width in tiles.
    pub(super) width: u32,
    /// Height in tiles.
    pub(super) height: u32,
    /// Stored cursor (null for version 0 files).
    pub(super) selected: Option<(u32, u32)>,
    /// Armies in turn order.
    pub(super) armies: &'a [ArmyRecord],
    /// Tiles with no type.
    pub(super) untyped_tiles: usize,
    /// Tiles owned by some army.
    pub(super) owned_tiles: usize,
    /// Units, including cargo.
    pub(super) units: usize,
}

impl<'a> JsonMapSummary<'a> {
    /// Create from a decoded record.
    pub(super) fn from_record(version: u8, record: &'a MapRecord) -> Self {
        Self {
            version,
            name: record.display_name(),
            width: record.width,
            height: record.height,
            selected: record.selected,
            armies: &record.armies,
            untyped_tiles: record.tiles.iter().filter(|t| t.tile_type.is_none()).count(),
            owned_tiles: record.tiles.iter().filter(|t| t.owner.is_some()).count(),
            units: record.unit_count(),
        }
    }
}

/// Format a map summary as human-readable text.
pub(super) fn format_text(summary: &JsonMapSummary<'_>) -> String {
    let mut output = String::new();

    output.push_str(&format!("Map: \"{}\" (version {})\n", summary.name, summary.version));
    output.push_str(&format!("  Size: {}x{}\n", summary.width, summary.height));
    if let Some((x, y)) = summary.selected {
        output.push_str(&format!("  Cursor: ({x}, {y})\n"));
    }
    output.push_str(&format!(
        "  Tiles: {} owned, {} untyped\n",
        summary.owned_tiles, summary.untyped_tiles
    ));
    output.push_str(&format!("  Units: {}\n\n", summary.units));

    output.push_str(&format!("Armies ({}):\n", summary.armies.len()));
    for army in summary.armies {
        output.push_str(&format!("  Country {}: {} funds", army.country, army.funds));
        match (army.current_co, army.tag_co) {
            (Some(current), Some(tag)) => {
                output.push_str(&format!(", CO {current}, tag CO {tag}"));
            }
            (Some(current), None) => output.push_str(&format!(", CO {current}")),
            _ => {}
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwstate::cwm::TileRecord;

    fn record() -> MapRecord {
        MapRecord {
            name: b"Island".to_vec(),
            width: 2,
            height: 1,
            selected: Some((1, 0)),
            armies: vec![ArmyRecord {
                country: 0,
                funds: 1000,
                current_co: Some(2),
                tag_co: None,
            }],
            tiles: vec![
                TileRecord {
                    tile_type: Some(0),
                    owner: Some(0),
                    ..TileRecord::default()
                },
                TileRecord::default(),
            ],
        }
    }

    #[test]
    fn test_summary_counts() {
        let record = record();
        let summary = JsonMapSummary::from_record(1, &record);
        assert_eq!(summary.owned_tiles, 1);
        assert_eq!(summary.untyped_tiles, 1);
        assert_eq!(summary.units, 0);
    }

    #[test]
    fn test_format_text() {
        let record = record();
        let text = format_text(&JsonMapSummary::from_record(1, &record));
        assert!(text.contains("Map: \"Island\" (version 1)"));
        assert!(text.contains("Size: 2x1"));
        assert!(text.contains("Country 0: 1000 funds, CO 2"));
    }

    #[test]
    fn test_json_fields() {
        let record = record();
        let json = serde_json::to_value(JsonMapSummary::from_record(0, &record)).unwrap();
        assert_eq!(json["name"], "Island");
        assert_eq!(json["armies"][0]["funds"], 1000);
        assert_eq!(json["selected"][0], 1);
    }
}
