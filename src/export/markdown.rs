//! Markdown sink: title heading, metadata lines, then a pipe table.

use super::{Sink, write_atomically};
use crate::engine::{FormatRule, ReportError, ReportTable};
use std::fmt::Write as _;
use std::path::Path;

pub struct MarkdownSink;

impl MarkdownSink {
    /// Render the document; cells are formatted with each column's rule
    pub fn render(table: &ReportTable) -> String {
        let mut out = String::new();
        let (title, rest) = match table.metadata().split_first() {
            Some((title, rest)) => (title.as_str(), rest),
            None => ("Report", &[][..]),
        };

        let _ = writeln!(out, "# {}\n", escape(title));
        for line in rest {
            let _ = writeln!(out, "- {}", escape(line));
        }
        if !rest.is_empty() {
            out.push('\n');
        }

        let header: Vec<String> = table.header().iter().map(|h| escape(h)).collect();
        let _ = writeln!(out, "| {} |", header.join(" | "));

        let rules: Vec<&str> = table
            .columns()
            .iter()
            .map(|c| if c.format == FormatRule::Raw { "---" } else { "---:" })
            .collect();
        let _ = writeln!(out, "| {} |", rules.join(" | "));

        for row in table.rows() {
            let cells: Vec<String> = row
                .iter()
                .zip(table.columns())
                .map(|(cell, column)| escape(&column.format.render(cell)))
                .collect();
            let _ = writeln!(out, "| {} |", cells.join(" | "));
        }
        out
    }
}

impl Sink for MarkdownSink {
    fn write(&self, table: &ReportTable, path: &Path) -> Result<(), ReportError> {
        write_atomically(path, Self::render(table).as_bytes())
    }
}

/// Keep cell text from breaking the table structure
fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}
