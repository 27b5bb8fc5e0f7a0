/// Console formatting module - table preview rendering
///
/// This module handles all console output formatting including:
/// - Column width allocation against the terminal width
/// - Table borders and header layout
/// - Style-tag coloring of cells
/// - Unicode-aware truncation and padding
///
/// It accepts finished `ReportTable`s from the engine and renders them to the console.
///
/// ## Output Flexibility
///
/// `TableWriter` writes to any `std::io::Write` destination, so the same
/// layout can go to stdout with colors or to a plain string buffer.

use crate::engine::{ReportTable, StyleTag, style_grid};
use std::io::{self, Write};
use std::sync::OnceLock;
use term::color::Color;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Narrowest a column may be squeezed to, padding included
const MIN_COLUMN_WIDTH: usize = 6;

/// Writer for table output - configurable for color/plain text
pub struct TableWriter<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> TableWriter<W> {
    /// Create a new table writer
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Write text, colored when enabled and a color is given
    fn write_colored(&mut self, text: &str, color: Option<Color>) -> io::Result<()> {
        match color {
            Some(color) if self.use_colors => {
                if let Some(ref mut t) = term::stdout() {
                    let _ = t.fg(color);
                    let _ = t.write_all(text.as_bytes());
                    let _ = t.reset();
                    Ok(())
                } else {
                    write!(self.writer, "{}", text)
                }
            }
            _ => write!(self.writer, "{}", text),
        }
    }

    /// Write a full table: metadata lines, bordered header, rows, footer
    pub fn write_table(&mut self, table: &ReportTable, widths: &TableWidths) -> io::Result<()> {
        for line in table.metadata() {
            writeln!(self.writer, "{}", line)?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "{}", widths.border('┌', '┬', '┐'))?;
        let header: Vec<String> = table
            .header()
            .iter()
            .zip(&widths.columns)
            .map(|(label, width)| center(label, width.saturating_sub(2)))
            .collect();
        writeln!(self.writer, "│ {} │", header.join(" │ "))?;
        writeln!(self.writer, "{}", widths.border('├', '┼', '┤'))?;

        let styles = style_grid(table);
        for (row, row_styles) in table.rows().iter().zip(&styles) {
            write!(self.writer, "│")?;
            for ((cell, column), (width, tag)) in
                row.iter().zip(table.columns()).zip(widths.columns.iter().zip(row_styles))
            {
                let text = truncate_with_padding(&column.format.render(cell), width.saturating_sub(2));
                write!(self.writer, " ")?;
                self.write_colored(&text, tag.map(style_color))?;
                write!(self.writer, " │")?;
            }
            writeln!(self.writer)?;
        }

        writeln!(self.writer, "{}", widths.border('└', '┴', '┘'))?;
        writeln!(self.writer, "{} record(s)", table.record_count())
    }
}

//
// Table Layout and Widths
//

/// Column widths for one table, each including one space of padding per side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableWidths {
    pub columns: Vec<usize>,
}

impl TableWidths {
    /// Fit columns to `terminal_width`.
    ///
    /// Each column asks for the wider of its declared width and its widest
    /// rendered cell; the widest columns give up space first when the total
    /// does not fit.
    pub fn fit(table: &ReportTable, terminal_width: usize) -> Self {
        let columns: Vec<usize> = table
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let content = table
                    .rows()
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| display_width(&column.format.render(cell)) + 2)
                    .max()
                    .unwrap_or(0);
                column.display_width().max(content).max(MIN_COLUMN_WIDTH)
            })
            .collect();

        let mut widths = TableWidths { columns };
        while widths.total() > terminal_width {
            let Some((widest, width)) = widths.columns.iter().copied().enumerate().max_by_key(|(_, w)| *w) else {
                break;
            };
            if width <= MIN_COLUMN_WIDTH {
                break;
            }
            widths.columns[widest] -= 1;
        }

        widths
    }

    /// Total rendered width including borders
    pub fn total(&self) -> usize {
        self.columns.iter().sum::<usize>() + self.columns.len() + 1
    }

    fn border(&self, left: char, join: char, right: char) -> String {
        let segments: Vec<String> = self.columns.iter().map(|w| "─".repeat(*w)).collect();
        format!("{}{}{}", left, segments.join(&join.to_string()), right)
    }
}

// Width override for tests and --console-width
static CONSOLE_WIDTH: OnceLock<usize> = OnceLock::new();

/// Pin the console width instead of querying the terminal
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH.set(width); // First caller wins
}

/// Get console width: override, then terminal, then 120
pub fn get_terminal_width() -> usize {
    if let Some(width) = CONSOLE_WIDTH.get() {
        return *width;
    }
    if let Some((Width(w), _)) = terminal_size() {
        w as usize
    } else {
        120 // Default width
    }
}

/// Terminal color for a style tag
pub fn style_color(tag: StyleTag) -> Color {
    match tag {
        StyleTag::Good => term::color::GREEN,
        StyleTag::Neutral => term::color::BRIGHT_BLUE,
        StyleTag::Warning => term::color::YELLOW,
        StyleTag::Bad => term::color::BRIGHT_RED,
    }
}

//
// Text Formatting Utilities
//

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let display_w = display_width(s);
    if display_w <= width {
        return format!("{}{}", s, " ".repeat(width - display_w));
    }

    // Reserve space for "..."
    let target_width = if width >= 3 { width - 3 } else { width };
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let c_width = UnicodeWidthChar::width(c).unwrap_or(1);
        if current_width + c_width > target_width {
            break;
        }
        result.push(c);
        current_width += c_width;
    }

    if width >= 3 {
        result.push_str("...");
        current_width += 3;
    }
    if current_width < width {
        result.push_str(&" ".repeat(width - current_width));
    }
    result
}

/// Center `s` within `width`, truncating when it does not fit
fn center(s: &str, width: usize) -> String {
    let w = display_width(s);
    if w >= width {
        return truncate_with_padding(s, width);
    }
    let left = (width - w) / 2;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(width - w - left))
}

/// Print a table preview to stdout
pub fn print_table(table: &ReportTable, use_colors: bool) {
    let widths = TableWidths::fit(table, get_terminal_width());
    let stdout = io::stdout();
    let mut writer = TableWriter::new(stdout.lock(), use_colors);
    let _ = writer.write_table(table, &widths);
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
