/// Core data structures for report generation
///
/// This module defines the values that flow through the engine: raw records
/// as they arrive from the data-access layer, the keys used to merge them,
/// the merged per-entity rows, and the scalar cells of a finished table.
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One entity's data as received from an upstream collection.
///
/// Typed rows are converted to this mapping at the input boundary
/// (see `input::to_record`), so the engine only ever sees one shape.
pub type RawRecord = serde_json::Map<String, Value>;

/// Identifier used to merge records describing the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum EntityKey {
    /// Numeric id: 7, 7.0 and "7" all land here
    Id(i64),
    /// Any other non-empty string identifier
    Code(String),
}

impl EntityKey {
    /// Interpret a field value as a merge key.
    ///
    /// Returns `None` for values that cannot identify an entity: null,
    /// empty or blank strings, booleans, fractional numbers, arrays and objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(EntityKey::Id(i))
                } else {
                    let f = n.as_f64()?;
                    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                        Some(EntityKey::Id(f as i64))
                    } else {
                        None
                    }
                }
            }
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else if let Ok(i) = trimmed.parse::<i64>() {
                    Some(EntityKey::Id(i))
                } else {
                    Some(EntityKey::Code(trimmed.to_string()))
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Id(id) => write!(f, "{}", id),
            EntityKey::Code(code) => write!(f, "{}", code),
        }
    }
}

impl From<EntityKey> for CellValue {
    fn from(key: EntityKey) -> Self {
        match key {
            EntityKey::Id(id) => CellValue::Integer(id),
            EntityKey::Code(code) => CellValue::Text(code),
        }
    }
}

/// Merged record for one entity after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRow {
    pub key: EntityKey,
    pub fields: RawRecord,
}

impl UnifiedRow {
    pub fn new(key: EntityKey) -> Self {
        Self { key, fields: RawRecord::new() }
    }

    /// Shallow-merge a record: fields it carries overwrite, others are kept
    pub fn merge(&mut self, record: &RawRecord) {
        for (field, value) in record {
            self.fields.insert(field.clone(), value.clone());
        }
    }
}

/// A single scalar cell of a report table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Numeric view of the cell, used by threshold predicates and number formats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", if *b { "Yes" } else { "No" }),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Per-run values a report needs that must not be read from the clock
/// inside the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportContext {
    /// Date that "days since" style metrics are measured against
    pub as_of: chrono::NaiveDate,
    /// Timestamp printed in the generated-at metadata row
    pub generated_at: chrono::NaiveDateTime,
    /// strftime pattern for `generated_at`
    pub timestamp_format: String,
    /// Optional organization name prefixed to report titles
    pub organization: Option<String>,
}

impl ReportContext {
    /// Context pinned to the given instant, with the default timestamp pattern
    pub fn at(generated_at: chrono::NaiveDateTime) -> Self {
        Self {
            as_of: generated_at.date(),
            generated_at,
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            organization: None,
        }
    }
}
