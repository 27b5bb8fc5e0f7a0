//! Sink adapters - render a finished `ReportTable` to a file.
//!
//! This module handles:
//! - Choosing a sink from the output format or file extension
//! - XLSX workbooks with title, header styling, zebra rows and conditional fills
//! - Markdown tables for pasting into tickets and wikis
//! - JSON documents for downstream tooling
//!
//! # Module Organization
//!
//! - `xlsx` - spreadsheet sink (rust_xlsxwriter)
//! - `markdown` - Markdown sink
//! - `json` - JSON sink

mod json;
mod markdown;
mod xlsx;

use crate::engine::{ReportError, ReportTable, StyleTag};
use std::fs;
use std::io::Write;
use std::path::Path;

pub use json::JsonSink;
pub use markdown::MarkdownSink;
pub use xlsx::XlsxSink;

/// Output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Xlsx,
    Markdown,
    Json,
}

impl OutputFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(OutputFormat::Xlsx),
            "md" | "markdown" => Some(OutputFormat::Markdown),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

/// RGB fill colors for each style bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub good: u32,
    pub neutral: u32,
    pub warning: u32,
    pub bad: u32,
}

impl Palette {
    pub fn color(&self, tag: StyleTag) -> u32 {
        match tag {
            StyleTag::Good => self.good,
            StyleTag::Neutral => self.neutral,
            StyleTag::Warning => self.warning,
            StyleTag::Bad => self.bad,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self { good: 0xC6EFCE, neutral: 0xFFEB9C, warning: 0xFCE4D6, bad: 0xFFC7CE }
    }
}

/// Presentation settings shared by the sinks
#[derive(Debug, Clone, PartialEq)]
pub struct SheetStyle {
    /// Alternate row background on data rows
    pub zebra: bool,
    pub freeze_header: bool,
    pub autofilter: bool,
    pub header_color: u32,
    pub zebra_color: u32,
    pub palette: Palette,
}

impl Default for SheetStyle {
    fn default() -> Self {
        Self {
            zebra: true,
            freeze_header: true,
            autofilter: true,
            header_color: 0x4472C4,
            zebra_color: 0xF2F2F2,
            palette: Palette::default(),
        }
    }
}

/// Renders a table to a file
pub trait Sink {
    fn write(&self, table: &ReportTable, path: &Path) -> Result<(), ReportError>;
}

/// Sink for `format`
pub fn sink_for(format: OutputFormat, style: &SheetStyle) -> Box<dyn Sink> {
    match format {
        OutputFormat::Xlsx => Box::new(XlsxSink::new(style.clone())),
        OutputFormat::Markdown => Box::new(MarkdownSink),
        OutputFormat::Json => Box::new(JsonSink),
    }
}

/// Write `bytes` next to `path` in a temp file, then move it into place,
/// so a failed export never leaves a truncated file behind.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| ReportError::export(path, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ReportError::export(path, e))?;
    tmp.write_all(bytes).map_err(|e| ReportError::export(path, e))?;
    tmp.persist(path).map_err(|e| ReportError::export(path, e.error))?;
    Ok(())
}
