/// Input loading - the data-access boundary
///
/// This module handles:
/// - Reading record collections from JSON files
/// - Unwrapping paginated `{"data": [...]}` resource payloads
/// - Converting typed rows into the canonical `RawRecord` mapping
use crate::engine::ReportError;
use crate::types::RawRecord;
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load one collection from a JSON file
pub fn load_collection(path: &Path) -> Result<Vec<RawRecord>, ReportError> {
    let source = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| ReportError::input(&source, e.to_string()))?;
    let records = parse_collection(&text).map_err(|e| ReportError::input(&source, e))?;
    debug!("Loaded {} records from {}", records.len(), source);
    Ok(records)
}

/// Parse a collection from JSON text.
///
/// Accepts a top-level array of objects, or an object wrapping that array
/// under `data`.
pub fn parse_collection(text: &str) -> Result<Vec<RawRecord>, String> {
    let value: Value = serde_json::from_str(text).map_err(|e| format!("invalid JSON: {}", e))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Err("expected an array of records or an object with a \"data\" array".to_string()),
        },
        _ => return Err("expected an array of records".to_string()),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(format!("record {} is not an object (found {})", i, kind_of(&other))),
        })
        .collect()
}

/// Convert a typed row to a `RawRecord`
pub fn to_record<T: Serialize>(row: &T) -> Result<RawRecord, String> {
    match serde_json::to_value(row).map_err(|e| e.to_string())? {
        Value::Object(record) => Ok(record),
        other => Err(format!("expected a struct or map, found {}", kind_of(&other))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
