//! Catalog of registered reports, itself rendered as a report table.

use super::{ReportDefinition, registry};
use crate::engine::{self, ColumnSpec, ReportError, ReportTable, Source, resolve::resolve_text};
use crate::input::to_record;
use crate::types::{CellValue, RawRecord, ReportContext};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CatalogEntry {
    name: &'static str,
    title: &'static str,
    sources: String,
    description: &'static str,
}

impl CatalogEntry {
    fn from_definition(definition: &dyn ReportDefinition) -> Self {
        let sources = definition
            .sources()
            .iter()
            .map(|s| if s.required { s.label.to_string() } else { format!("{} (optional)", s.label) })
            .collect::<Vec<_>>()
            .join(", ");
        Self { name: definition.name(), title: definition.title(), sources, description: definition.description() }
    }
}

fn columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("Report").width(20),
        ColumnSpec::new("Title").width(28),
        ColumnSpec::new("Sources").width(36),
        ColumnSpec::new("Description").width(60),
    ]
}

/// One row per registered report, in registry order
pub fn catalog(context: &ReportContext) -> Result<ReportTable, ReportError> {
    let records: Vec<RawRecord> = registry()
        .iter()
        .map(|definition| to_record(&CatalogEntry::from_definition(definition.as_ref())))
        .collect::<Result<_, _>>()
        .map_err(|e| ReportError::input("report catalog", e))?;

    let merged = engine::normalize(&[Source { label: "reports", key_field: "name", records: &records }]);
    let table = engine::build(&merged.rows, &columns(), |row| {
        ["name", "title", "sources", "description"]
            .iter()
            .map(|field| CellValue::from(resolve_text(&row.fields, field, "")))
            .collect()
    })
    .map_err(|e| e.for_report("catalog"))?;

    Ok(table.with_metadata([
        "Available Reports".to_string(),
        format!("Generated: {}", context.generated_at.format(&context.timestamp_format)),
    ]))
}
