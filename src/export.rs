// src/export.rs
//! JSON export of report structures.

use crate::error::{ProbeError, Result};
use serde::Serialize;
use std::path::Path;

/// Serializes any report structure to pretty-printed JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes a report structure to a JSON file.
///
/// # Errors
/// Returns error if serialization or the write fails.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = to_json_string(value)?;
    std::fs::write(path, json).map_err(|e| ProbeError::from(e).with_path(path))
}
