//! Reading facts inventories and writing trimmed output files.

use crate::error::{FiscalFrameError, Result};
use crate::schema::{FactsInventory, TrimmedOutput};
use std::fs;
use std::path::{Path, PathBuf};

/// Parses an inventory document. Malformed JSON and missing `ticker` / `factsIndex`
/// are fatal.
pub fn parse_inventory(json: &str) -> Result<FactsInventory> {
    let inventory: FactsInventory = serde_json::from_str(json)
        .map_err(|e| FiscalFrameError::InvalidInput(e.to_string()))?;
    validate_inventory(&inventory)?;
    Ok(inventory)
}

/// Rejects an empty ticker or an entry without a frame identifier.
pub fn validate_inventory(inventory: &FactsInventory) -> Result<()> {
    if inventory.ticker.trim().is_empty() {
        return Err(FiscalFrameError::InvalidInput(
            "ticker must not be empty".to_string(),
        ));
    }

    for (idx, frame) in inventory.facts_index.iter().enumerate() {
        if frame.frame.trim().is_empty() {
            return Err(FiscalFrameError::InvalidInput(format!(
                "factsIndex entry #{} has an empty frame identifier",
                idx
            )));
        }
    }

    Ok(())
}

pub fn read_inventory(path: &Path) -> Result<FactsInventory> {
    let json = fs::read_to_string(path).map_err(|source| FiscalFrameError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    parse_inventory(&json)
}

/// `<dir>/<input-basename>-trimmed.json`, next to the input file.
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "facts".to_string());
    input.with_file_name(format!("{}-trimmed.json", stem))
}

pub fn to_json(output: &TrimmedOutput) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

/// Serializes fully before touching the filesystem, so a failure leaves no partial file.
pub fn write_output(path: &Path, output: &TrimmedOutput) -> Result<()> {
    let json = to_json(output)?;
    fs::write(path, json).map_err(|source| FiscalFrameError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}
