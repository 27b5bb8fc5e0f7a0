//! Column format and conditional-style rules.
//!
//! Rules are declared on each `ColumnSpec`, so a column's header, number
//! format and style thresholds always share one position. Sinks look
//! columns up by zero-based index, never by spreadsheet letter.

use super::table::ReportTable;
use crate::types::CellValue;
use serde::Serialize;

/// How a column's values are displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "decimals", rename_all = "snake_case")]
pub enum FormatRule {
    /// Values are shown as they are
    #[default]
    Raw,
    /// Whole number, no separators: 1234
    Integer,
    /// Whole number with thousands separators: 1,234
    GroupedInteger,
    /// Fixed decimals: 12.50
    Decimal(u8),
    /// Value already on a 0-100 scale, fixed decimals and a % sign: 87.25%
    Percentage(u8),
}

impl FormatRule {
    /// Render a cell for text-based sinks.
    ///
    /// Non-numeric cells are shown unchanged regardless of the rule.
    pub fn render(&self, cell: &CellValue) -> String {
        let Some(n) = cell.as_f64() else {
            return cell.to_string();
        };
        match self {
            FormatRule::Raw => cell.to_string(),
            FormatRule::Integer => format!("{}", n.round() as i64),
            FormatRule::GroupedInteger => group_thousands(n.round() as i64),
            FormatRule::Decimal(d) => format!("{:.*}", *d as usize, n),
            FormatRule::Percentage(d) => format!("{:.*}%", *d as usize, n),
        }
    }

    /// Spreadsheet number format code, `None` for general formatting
    pub fn number_format(&self) -> Option<String> {
        match self {
            FormatRule::Raw => None,
            FormatRule::Integer => Some("0".to_string()),
            FormatRule::GroupedInteger => Some("#,##0".to_string()),
            FormatRule::Decimal(d) => Some(decimal_pattern(*d)),
            // Values are already scaled to 0-100, so the % is a literal suffix
            FormatRule::Percentage(d) => Some(format!("{}\"%\"", decimal_pattern(*d))),
        }
    }
}

fn decimal_pattern(decimals: u8) -> String {
    if decimals == 0 { "0".to_string() } else { format!("0.{}", "0".repeat(decimals as usize)) }
}

/// Format an integer with comma thousands separators
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Predicate over a cell value, used for style rules and classification bands
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Threshold {
    /// value > n
    Above(f64),
    /// value >= n
    AtLeast(f64),
    /// value < n
    Below(f64),
    /// value <= n
    AtMost(f64),
    /// Exact text match
    Is(String),
    /// Any text other than this
    IsNot(String),
}

impl Threshold {
    pub fn matches_number(&self, value: f64) -> bool {
        match self {
            Threshold::Above(n) => value > *n,
            Threshold::AtLeast(n) => value >= *n,
            Threshold::Below(n) => value < *n,
            Threshold::AtMost(n) => value <= *n,
            Threshold::Is(_) | Threshold::IsNot(_) => false,
        }
    }

    pub fn matches(&self, cell: &CellValue) -> bool {
        match (self, cell) {
            (Threshold::Is(expected), cell) => cell.as_text() == Some(expected.as_str()),
            (Threshold::IsNot(excluded), cell) => cell.as_text().is_some_and(|actual| actual != excluded),
            (numeric, cell) => cell.as_f64().is_some_and(|v| numeric.matches_number(v)),
        }
    }
}

/// Style bucket a sink maps to a concrete fill color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleTag {
    Good,
    Neutral,
    Warning,
    Bad,
}

impl StyleTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleTag::Good => "good",
            StyleTag::Neutral => "neutral",
            StyleTag::Warning => "warning",
            StyleTag::Bad => "bad",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRule {
    pub when: Threshold,
    pub tag: StyleTag,
}

/// Static description of one output column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSpec {
    pub label: String,
    pub format: FormatRule,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<StyleRule>,
    /// Preferred display width in characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
}

impl ColumnSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), format: FormatRule::Raw, styles: Vec::new(), width: None }
    }

    pub fn format(mut self, format: FormatRule) -> Self {
        self.format = format;
        self
    }

    /// Append a style rule; rules are tried in the order they were added
    pub fn style(mut self, when: Threshold, tag: StyleTag) -> Self {
        self.styles.push(StyleRule { when, tag });
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Style of the first rule matching `cell`, if any
    pub fn style_for(&self, cell: &CellValue) -> Option<StyleTag> {
        self.styles.iter().find(|rule| rule.when.matches(cell)).map(|rule| rule.tag)
    }

    /// Width to render this column with: declared, or derived from the label
    pub fn display_width(&self) -> usize {
        self.width.map(usize::from).unwrap_or_else(|| self.label.chars().count().max(8) + 2)
    }
}

/// Zero-based position of the column labelled `label`
pub fn column_index(columns: &[ColumnSpec], label: &str) -> Option<usize> {
    columns.iter().position(|c| c.label == label)
}

/// Style assignment for every data cell of `table`.
///
/// Placeholder rows of an empty report get no styles.
pub fn style_grid(table: &ReportTable) -> Vec<Vec<Option<StyleTag>>> {
    if table.is_placeholder() {
        return table.rows().iter().map(|row| vec![None; row.len()]).collect();
    }
    table
        .rows()
        .iter()
        .map(|row| row.iter().zip(table.columns()).map(|(cell, column)| column.style_for(cell)).collect())
        .collect()
}
