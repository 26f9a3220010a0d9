//! Map validation command implementation.

use super::CliError;
use cwstate::cwm::{self, BinaryReader};
use std::fs;
use std::path::Path;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any check fails.
pub(crate) fn execute(file: &Path) -> Result<(), CliError> {
    let bytes = fs::read(file)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", file.display())))?;

    println!("Validating: {}", file.display());
    println!();

    // Check header
    let version = cwm::read_version(&mut BinaryReader::new(&bytes));
    print_check("CWM header", version.is_ok());
    let version = version?;
    println!("  Format version: {version}");

    // Decode everything, including tile count and cargo nesting
    let decoded = cwm::decode(&bytes);
    print_check("Map data", decoded.is_ok());
    let (_, record) = decoded?;

    println!();
    println!("Summary:");
    println!("  File size:    {} bytes", bytes.len());
    println!("  Name:         {}", record.display_name());
    println!("  Size:         {}x{}", record.width, record.height);
    println!("  Armies:       {}", record.armies.len());
    println!("  Units:        {}", record.unit_count());

    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
