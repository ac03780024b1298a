//! Reading reference JSON files.
//!
//! A reference file is a single JSON object of string to string (or `null`).
//! Object order is preserved so key iteration follows the file.
use std::io::ErrorKind;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::warn;

use crate::IndexError;

/// Raw `(key, text)` pairs in file order.
pub type RawEntries = Vec<(String, Option<String>)>;

/// Reads `path` into raw entries. A missing file yields no entries.
pub fn read_entries(path: &Path) -> Result<RawEntries, IndexError> {
    let body = match std::fs::read_to_string(path) {
        Ok(body) => body,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "reference_file_missing");
            return Ok(Vec::new());
        }
        Err(err) => return Err(IndexError::io(path, err)),
    };
    parse_entries(path, &body)
}

/// Parses a JSON object body. `path` is only used in error messages.
pub fn parse_entries(path: &Path, body: &str) -> Result<RawEntries, IndexError> {
    let value: Value = serde_json::from_str(body).map_err(|err| IndexError::parse(path, err))?;
    let Value::Object(map) = value else {
        return Err(IndexError::InvalidEntry {
            path: path.display().to_string(),
            key: String::new(),
            reason: "top-level value must be a JSON object".into(),
        });
    };
    entries_from_map(path, map)
}

fn entries_from_map(path: &Path, map: Map<String, Value>) -> Result<RawEntries, IndexError> {
    let mut entries = Vec::with_capacity(map.len());
    for (key, value) in map {
        let text = match value {
            Value::String(text) => Some(text),
            Value::Null => None,
            other => {
                return Err(IndexError::InvalidEntry {
                    path: path.display().to_string(),
                    key,
                    reason: format!("expected string or null, found {}", kind(&other)),
                })
            }
        };
        entries.push((key, text));
    }
    Ok(entries)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
