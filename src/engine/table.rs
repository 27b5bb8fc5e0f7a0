//! Table assembly: header row plus one column-aligned data row per entity.

use super::error::ReportError;
use super::format::ColumnSpec;
use crate::types::{CellValue, UnifiedRow};
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

/// The finished artifact handed to a sink.
///
/// Every data row has exactly `columns().len()` cells. Only `with_metadata`
/// changes a table after construction, and it consumes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    metadata: Vec<String>,
    columns: Vec<ColumnSpec>,
    rows: Vec<Vec<CellValue>>,
    placeholder: bool,
}

impl ReportTable {
    /// Free-text rows rendered above the header (title, timestamp, description)
    pub fn metadata(&self) -> &[String] {
        &self.metadata
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Header labels, one per column
    pub fn header(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// True when the input was empty and the single row is filler
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Number of real data rows (0 for a placeholder table)
    pub fn record_count(&self) -> usize {
        if self.placeholder { 0 } else { self.rows.len() }
    }

    /// Prepend metadata rows, returning the finished table
    pub fn with_metadata<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut metadata: Vec<String> = lines.into_iter().map(Into::into).collect();
        metadata.append(&mut self.metadata);
        self.metadata = metadata;
        self
    }

    /// Reorder data rows by the column at `index`.
    ///
    /// Numbers sort numerically and text lexically. Numbers always come
    /// before text and empty cells always last; `descending` only reverses
    /// the order within each group. The sort is stable, so ties keep their
    /// merge order.
    pub fn sorted_by(mut self, index: usize, descending: bool) -> Self {
        if self.placeholder || index >= self.columns.len() {
            return self;
        }
        self.rows.sort_by(|a, b| {
            let (a, b) = (&a[index], &b[index]);
            sort_group(a).cmp(&sort_group(b)).then_with(|| {
                let ord = compare_cells(a, b);
                if descending { ord.reverse() } else { ord }
            })
        });
        self
    }
}

/// 0 for numbers, 1 for text, 2 for empty cells
fn sort_group(cell: &CellValue) -> u8 {
    if cell.is_empty() {
        2
    } else if cell.as_f64().is_some() {
        0
    } else {
        1
    }
}

// Only called for cells in the same sort group
fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Build a table from unified rows.
///
/// `map_row` turns one row into column-aligned cells. With no input rows the
/// table still gets its header and a single row of empty cells, so fixed
/// sheet layouts never see an empty body.
///
/// Fails with a configuration error when there are no columns, when two
/// columns share a label, or when any mapped row does not have exactly one
/// cell per column.
pub fn build<F>(rows: &[UnifiedRow], columns: &[ColumnSpec], map_row: F) -> Result<ReportTable, ReportError>
where
    F: Fn(&UnifiedRow) -> Vec<CellValue>,
{
    validate_columns(columns)?;

    let width = columns.len();
    let placeholder = rows.is_empty();

    let data: Vec<Vec<CellValue>> = if placeholder {
        vec![vec![CellValue::Empty; width]]
    } else {
        rows.iter().map(&map_row).collect()
    };

    for (i, row) in data.iter().enumerate() {
        if row.len() != width {
            let key = rows.get(i).map(|r| r.key.to_string()).unwrap_or_default();
            return Err(ReportError::configuration(
                "",
                format!(
                    "row {} (key {}) has {} cells but {} columns are declared",
                    i,
                    key,
                    row.len(),
                    width
                ),
            ));
        }
    }

    debug!("Built table with {} columns and {} rows", width, data.len());

    Ok(ReportTable { metadata: Vec::new(), columns: columns.to_vec(), rows: data, placeholder })
}

fn validate_columns(columns: &[ColumnSpec]) -> Result<(), ReportError> {
    if columns.is_empty() {
        return Err(ReportError::configuration("", "no columns declared"));
    }

    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.label.as_str()) {
            return Err(ReportError::configuration("", format!("duplicate column label '{}'", column.label)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::format::FormatRule;
    use crate::engine::resolve::{resolve_f64, resolve_text};
    use crate::types::EntityKey;
    use serde_json::json;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("ID"),
            ColumnSpec::new("Name"),
            ColumnSpec::new("Score").format(FormatRule::Decimal(1)),
        ]
    }

    fn unified(id: i64, fields: serde_json::Value) -> UnifiedRow {
        let mut row = UnifiedRow::new(EntityKey::Id(id));
        row.merge(fields.as_object().unwrap());
        row
    }

    fn mapper(row: &UnifiedRow) -> Vec<CellValue> {
        vec![
            row.key.clone().into(),
            resolve_text(&row.fields, "name", "N/A").into(),
            resolve_f64(&row.fields, "score", 0.0).into(),
        ]
    }

    #[test]
    fn test_every_row_matches_column_count() {
        let rows = vec![unified(1, json!({"name": "Ana", "score": 90})), unified(2, json!({}))];
        let table = build(&rows, &columns(), mapper).unwrap();
        assert_eq!(table.header(), vec!["ID", "Name", "Score"]);
        assert_eq!(table.rows().len(), 2);
        assert!(table.rows().iter().all(|r| r.len() == 3));
        assert_eq!(table.rows()[1][1], CellValue::Text("N/A".into()));
        assert_eq!(table.record_count(), 2);
    }

    #[test]
    fn test_empty_input_yields_placeholder_row() {
        let table = build(&[], &columns(), mapper).unwrap();
        assert_eq!(table.header().len(), 3);
        assert_eq!(table.rows(), &[vec![CellValue::Empty, CellValue::Empty, CellValue::Empty]]);
        assert!(table.is_placeholder());
        assert_eq!(table.record_count(), 0);
    }

    #[test]
    fn test_short_row_is_configuration_error() {
        let rows = vec![unified(1, json!({"name": "Ana"}))];
        let err = build(&rows, &columns(), |row| vec![row.key.clone().into()]).unwrap_err();
        match err {
            ReportError::Configuration { message, .. } => {
                assert!(message.contains("1 cells but 3 columns"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_long_row_is_configuration_error() {
        let rows = vec![unified(1, json!({}))];
        let err = build(&rows, &columns(), |_| vec![CellValue::Empty; 4]);
        assert!(matches!(err, Err(ReportError::Configuration { .. })));
    }

    #[test]
    fn test_invalid_columns_rejected() {
        assert!(build(&[], &[], mapper).is_err());
        let dup = vec![ColumnSpec::new("ID"), ColumnSpec::new("ID")];
        assert!(matches!(build(&[], &dup, |_| vec![]), Err(ReportError::Configuration { .. })));
    }

    #[test]
    fn test_build_is_deterministic() {
        let rows = vec![unified(3, json!({"name": "Bo", "score": "71.25"})), unified(1, json!({"name": "Cy"}))];
        let first = build(&rows, &columns(), mapper).unwrap();
        let second = build(&rows, &columns(), mapper).unwrap();
        assert_eq!(first, second);
        assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
    }

    #[test]
    fn test_sorted_by_keeps_empty_last() {
        let rows = vec![
            unified(1, json!({"name": "Ana", "score": 70})),
            unified(2, json!({"name": "Bo", "score": 95})),
            unified(3, json!({"name": "Cy", "score": 80})),
        ];
        let table = build(&rows, &columns(), |row| {
            let mut cells = mapper(row);
            if row.key == EntityKey::Id(3) {
                cells[2] = CellValue::Empty;
            }
            cells
        })
        .unwrap();

        let desc = table.clone().sorted_by(2, true);
        let ids: Vec<&CellValue> = desc.rows().iter().map(|r| &r[0]).collect();
        assert_eq!(ids, vec![&CellValue::Integer(2), &CellValue::Integer(1), &CellValue::Integer(3)]);

        let by_name = table.sorted_by(1, true);
        assert_eq!(by_name.rows()[0][1], CellValue::Text("Cy".into()));
    }

    #[test]
    fn test_sorted_by_keeps_numbers_before_text_in_both_directions() {
        let rows: Vec<UnifiedRow> = (1..=5).map(|id| unified(id, json!({}))).collect();
        let table = build(&rows, &columns(), |row| {
            let score = match row.key {
                EntityKey::Id(1) => CellValue::Text("n/a".into()),
                EntityKey::Id(2) => CellValue::Number(40.0),
                EntityKey::Id(3) => CellValue::Empty,
                EntityKey::Id(4) => CellValue::Text("absent".into()),
                _ => CellValue::Integer(90),
            };
            vec![row.key.clone().into(), CellValue::from("x"), score]
        })
        .unwrap();

        let order = |t: &ReportTable| -> Vec<String> { t.rows().iter().map(|r| r[0].to_string()).collect() };
        assert_eq!(order(&table.clone().sorted_by(2, false)), vec!["2", "5", "4", "1", "3"]);
        assert_eq!(order(&table.sorted_by(2, true)), vec!["5", "2", "1", "4", "3"]);
    }

    #[test]
    fn test_with_metadata_prepends() {
        let table = build(&[], &columns(), mapper).unwrap().with_metadata(["Generated: now"]);
        let table = table.with_metadata(vec!["Title".to_string()]);
        assert_eq!(table.metadata(), &["Title".to_string(), "Generated: now".to_string()]);
    }
}
