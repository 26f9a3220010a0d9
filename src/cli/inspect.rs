//! Map inspection command implementation.

use super::output::{format_text, JsonMapSummary};
use super::{CliError, OutputFormat};
use std::fs;
use std::path::Path;

/// Execute the inspect command.
///
/// The file is decoded without content banks, so stored IDs are printed raw.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub(crate) fn execute(file: &Path, format: OutputFormat) -> Result<(), CliError> {
    let bytes = fs::read(file)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", file.display())))?;
    let (version, record) = cwstate::cwm::decode(&bytes)?;
    let summary = JsonMapSummary::from_record(version, &record);

    match format {
        OutputFormat::Text => print!("{}", format_text(&summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}
