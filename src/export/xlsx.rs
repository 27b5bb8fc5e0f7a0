//! XLSX sink built on rust_xlsxwriter.
//!
//! Sheet layout, top to bottom: the title merged across all columns, the
//! remaining metadata rows, one blank spacer row, the header, then data.

use super::{SheetStyle, Sink, write_atomically};
use crate::engine::{ReportError, ReportTable, StyleTag, style_grid};
use crate::types::CellValue;
use log::debug;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::Path;

/// Excel refuses sheet names longer than this
const MAX_SHEET_NAME: usize = 31;

pub struct XlsxSink {
    style: SheetStyle,
}

impl XlsxSink {
    pub fn new(style: SheetStyle) -> Self {
        Self { style }
    }

    /// Render the workbook into memory
    pub fn render(&self, table: &ReportTable) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let title = table.metadata().first().map(String::as_str).unwrap_or("Report");
        sheet.set_name(sheet_name(title))?;

        let header_row = self.write_preamble(sheet, table)?;
        self.write_header(sheet, table, header_row)?;
        self.write_rows(sheet, table, header_row + 1)?;

        let last_col = last_column(table);
        let last_row = header_row + table.rows().len() as u32;
        if self.style.autofilter && !table.is_placeholder() {
            sheet.autofilter(header_row, 0, last_row, last_col)?;
        }
        if self.style.freeze_header {
            sheet.set_freeze_panes(header_row + 1, 0)?;
        }
        for (col, column) in table.columns().iter().enumerate() {
            sheet.set_column_width(col as u16, column.display_width() as f64)?;
        }

        workbook.save_to_buffer()
    }

    /// Title and metadata rows; returns the row index of the header
    fn write_preamble(&self, sheet: &mut Worksheet, table: &ReportTable) -> Result<u32, XlsxError> {
        let Some((title, rest)) = table.metadata().split_first() else {
            return Ok(0);
        };

        let title_format = Format::new().set_bold().set_font_size(14).set_align(FormatAlign::Left);
        let last_col = last_column(table);
        if last_col > 0 {
            sheet.merge_range(0, 0, 0, last_col, title, &title_format)?;
        } else {
            sheet.write_string_with_format(0, 0, title, &title_format)?;
        }

        let meta_format = Format::new().set_italic().set_font_color(0x595959);
        for (i, line) in rest.iter().enumerate() {
            sheet.write_string_with_format(1 + i as u32, 0, line, &meta_format)?;
        }

        // One spacer row between metadata and header
        Ok(table.metadata().len() as u32 + 1)
    }

    fn write_header(&self, sheet: &mut Worksheet, table: &ReportTable, row: u32) -> Result<(), XlsxError> {
        let header_format = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(self.style.header_color)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        for (col, label) in table.header().iter().enumerate() {
            sheet.write_string_with_format(row, col as u16, *label, &header_format)?;
        }
        Ok(())
    }

    fn write_rows(&self, sheet: &mut Worksheet, table: &ReportTable, first_row: u32) -> Result<(), XlsxError> {
        let styles = style_grid(table);

        for (i, (cells, row_styles)) in table.rows().iter().zip(&styles).enumerate() {
            let row = first_row + i as u32;
            let striped = self.style.zebra && i % 2 == 1;

            for (col, ((cell, column), tag)) in cells.iter().zip(table.columns()).zip(row_styles).enumerate() {
                let mut format = Format::new().set_border(FormatBorder::Thin);
                if let Some(code) = column.format.number_format() {
                    format = format.set_num_format(code);
                }
                if let Some(color) = self.fill_for(*tag, striped) {
                    format = format.set_background_color(color);
                }
                write_cell(sheet, row, col as u16, cell, &format)?;
            }
        }
        Ok(())
    }

    /// Conditional style wins over zebra striping
    fn fill_for(&self, tag: Option<StyleTag>, striped: bool) -> Option<u32> {
        match tag {
            Some(tag) => Some(self.style.palette.color(tag)),
            None if striped => Some(self.style.zebra_color),
            None => None,
        }
    }
}

impl Sink for XlsxSink {
    fn write(&self, table: &ReportTable, path: &Path) -> Result<(), ReportError> {
        let bytes = self.render(table).map_err(|e| ReportError::export(path, e))?;
        debug!("Rendered workbook: {} bytes, {} rows", bytes.len(), table.rows().len());
        write_atomically(path, &bytes)
    }
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue, format: &Format) -> Result<(), XlsxError> {
    match cell {
        CellValue::Empty => sheet.write_blank(row, col, format)?,
        CellValue::Text(s) => sheet.write_string_with_format(row, col, s, format)?,
        CellValue::Integer(i) => sheet.write_number_with_format(row, col, *i as f64, format)?,
        CellValue::Number(n) if n.is_finite() => sheet.write_number_with_format(row, col, *n, format)?,
        CellValue::Number(_) => sheet.write_blank(row, col, format)?,
        CellValue::Bool(_) => sheet.write_string_with_format(row, col, cell.to_string(), format)?,
    };
    Ok(())
}

fn last_column(table: &ReportTable) -> u16 {
    table.columns().len().saturating_sub(1) as u16
}

/// Worksheet name derived from the report title
fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\') { '-' } else { c })
        .collect();
    let trimmed = cleaned.trim().trim_matches('\'');
    if trimmed.is_empty() {
        return "Report".to_string();
    }
    trimmed.chars().take(MAX_SHEET_NAME).collect::<String>().trim_end().to_string()
}
