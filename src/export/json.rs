//! JSON sink for downstream tooling.
//!
//! Cells keep their raw values; format rules travel alongside in `columns`
//! so consumers can render them the same way.

use super::{Sink, write_atomically};
use crate::engine::{ReportError, ReportTable, style_grid};
use serde_json::{Value, json};
use std::path::Path;

pub struct JsonSink;

impl JsonSink {
    pub fn render(table: &ReportTable) -> Value {
        let styles: Vec<Vec<Option<&str>>> = style_grid(table)
            .into_iter()
            .map(|row| row.into_iter().map(|tag| tag.map(|t| t.as_str())).collect())
            .collect();

        json!({
            "title": table.metadata().first(),
            "metadata": table.metadata(),
            "columns": table.columns(),
            "record_count": table.record_count(),
            "placeholder": table.is_placeholder(),
            "rows": table.rows(),
            "styles": styles,
        })
    }
}

impl Sink for JsonSink {
    fn write(&self, table: &ReportTable, path: &Path) -> Result<(), ReportError> {
        let text = serde_json::to_string_pretty(&Self::render(table)).map_err(|e| ReportError::export(path, e))?;
        write_atomically(path, text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ColumnSpec, FormatRule, StyleTag, Threshold, build};
    use crate::types::{CellValue, EntityKey, UnifiedRow};

    #[test]
    fn test_render_document() {
        let columns = vec![
            ColumnSpec::new("User ID"),
            ColumnSpec::new("Days Inactive").format(FormatRule::Integer).style(Threshold::Above(60.0), StyleTag::Bad),
        ];
        let rows = vec![UnifiedRow::new(EntityKey::Id(7))];
        let table = build(&rows, &columns, |row| vec![row.key.clone().into(), CellValue::Integer(90)])
            .unwrap()
            .with_metadata(["Inactive Users"]);

        let doc = JsonSink::render(&table);
        assert_eq!(doc["title"], "Inactive Users");
        assert_eq!(doc["record_count"], 1);
        assert_eq!(doc["placeholder"], false);
        assert_eq!(doc["columns"][1]["label"], "Days Inactive");
        assert_eq!(doc["columns"][1]["format"]["kind"], "integer");
        assert_eq!(doc["rows"], json!([[7, 90]]));
        assert_eq!(doc["styles"], json!([[null, "bad"]]));
    }

    #[test]
    fn test_placeholder_document() {
        let table = build(&[], &[ColumnSpec::new("A")], |_| vec![]).unwrap();
        let doc = JsonSink::render(&table);
        assert_eq!(doc["title"], Value::Null);
        assert_eq!(doc["record_count"], 0);
        assert_eq!(doc["placeholder"], true);
        assert_eq!(doc["rows"], json!([[null]]));
    }
}
