/// Configuration resolution module
///
/// This module handles:
/// - Locating and parsing the optional TOML config file
/// - Merging file settings with CLI flags (flags win)
/// - Validating colors and timestamp patterns
/// - Building the immutable `ExportPlan` the pipeline runs from
use crate::cli::{self, CliArgs};
use crate::engine::column_index;
use crate::export::{OutputFormat, Palette, SheetStyle};
use crate::reports;
use crate::types::ReportContext;
use chrono::NaiveDateTime;
use chrono::format::{Item, StrftimeItems};
use log::debug;
use serde::Deserialize;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "REPORT_SHEETS_CONFIG";

/// Settings read from the config file; every key is optional
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub organization: Option<String>,
    pub timestamp_format: Option<String>,
    pub sheet: SheetSection,
    pub palette: PaletteSection,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SheetSection {
    pub zebra: Option<bool>,
    pub freeze_header: Option<bool>,
    pub autofilter: Option<bool>,
    pub header_color: Option<String>,
    pub zebra_color: Option<String>,
}

/// Fill colors for style tags as hex RGB ("#C6EFCE")
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteSection {
    pub good: Option<String>,
    pub neutral: Option<String>,
    pub warning: Option<String>,
    pub bad: Option<String>,
}

/// Everything one run needs, fully resolved
#[derive(Debug, Clone)]
pub struct ExportPlan {
    /// Canonical report name
    pub report: String,
    pub sources: Vec<PathBuf>,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub style: SheetStyle,
    pub context: ReportContext,
    /// Column label and descending flag
    pub sort: Option<(String, bool)>,
    pub preview: bool,
}

/// Build a complete ExportPlan from CLI arguments
///
/// Reads the config file (if any) and resolves every default upfront, so the
/// pipeline receives a validated, immutable plan.
pub fn build_export_plan(args: &CliArgs) -> Result<ExportPlan, String> {
    debug!("Building export plan from CLI args");

    let file_config = match resolve_config_path(args)? {
        Some(path) => load_config(&path)?,
        None => FileConfig::default(),
    };

    plan_from(args, &file_config, chrono::Local::now().naive_local())
}

/// Config file location: --config, then $REPORT_SHEETS_CONFIG, then the user config dir.
///
/// Explicitly named files must exist; the default location is optional.
pub fn resolve_config_path(args: &CliArgs) -> Result<Option<PathBuf>, String> {
    if let Some(ref path) = args.config {
        debug!("Using config from --config: {:?}", path);
        return existing(path).map(Some);
    }

    if let Ok(value) = env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            debug!("Using config from {}: {}", CONFIG_ENV, value);
            return existing(Path::new(value.trim())).map(Some);
        }
    }

    Ok(cli::default_config_path().filter(|p| p.is_file()))
}

fn existing(path: &Path) -> Result<PathBuf, String> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(format!("Config file not found: {}", path.display()))
    }
}

/// Parse a config file
pub fn load_config(path: &Path) -> Result<FileConfig, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    toml::from_str(&text).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}

/// Merge CLI arguments over file settings
pub fn plan_from(args: &CliArgs, file: &FileConfig, now: NaiveDateTime) -> Result<ExportPlan, String> {
    let requested = args.report.as_deref().ok_or("Must specify --report <NAME>")?;
    let definition = reports::find(requested).map_err(|e| e.to_string())?;
    let report = definition.name().to_string();

    if let Some(ref column) = args.sort_by {
        let columns = definition.columns();
        if column_index(&columns, column).is_none() {
            let labels: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
            return Err(format!(
                "--sort-by '{}' is not a column of {} (columns: {})",
                column,
                report,
                labels.join(", ")
            ));
        }
    }

    let timestamp_format = match &file.timestamp_format {
        Some(pattern) => {
            validate_timestamp_format(pattern, now)?;
            pattern.clone()
        }
        None => ReportContext::at(now).timestamp_format,
    };

    let organization = args
        .organization
        .clone()
        .or_else(|| file.organization.clone())
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty());

    let context = ReportContext {
        as_of: args.as_of.unwrap_or_else(|| now.date()),
        generated_at: now,
        timestamp_format,
        organization,
    };

    let style = resolve_style(args, file)?;
    let format = args.output_format();
    let output = args.get_output_path(&report);

    debug!("Report {} -> {} ({:?})", report, output.display(), format);

    Ok(ExportPlan {
        report,
        sources: args.source.clone(),
        output,
        format,
        style,
        context,
        sort: args.sort_by.clone().map(|column| (column, args.descending)),
        preview: args.preview,
    })
}

fn resolve_style(args: &CliArgs, file: &FileConfig) -> Result<SheetStyle, String> {
    let defaults = SheetStyle::default();
    let sheet = &file.sheet;
    let palette = &file.palette;

    Ok(SheetStyle {
        zebra: !args.no_zebra && sheet.zebra.unwrap_or(defaults.zebra),
        freeze_header: sheet.freeze_header.unwrap_or(defaults.freeze_header),
        autofilter: sheet.autofilter.unwrap_or(defaults.autofilter),
        header_color: color_or(&sheet.header_color, defaults.header_color, "sheet.header_color")?,
        zebra_color: color_or(&sheet.zebra_color, defaults.zebra_color, "sheet.zebra_color")?,
        palette: Palette {
            good: color_or(&palette.good, defaults.palette.good, "palette.good")?,
            neutral: color_or(&palette.neutral, defaults.palette.neutral, "palette.neutral")?,
            warning: color_or(&palette.warning, defaults.palette.warning, "palette.warning")?,
            bad: color_or(&palette.bad, defaults.palette.bad, "palette.bad")?,
        },
    })
}

fn color_or(value: &Option<String>, default: u32, key: &str) -> Result<u32, String> {
    match value {
        Some(text) => parse_color(text).map_err(|e| format!("{}: {}", key, e)),
        None => Ok(default),
    }
}

/// Parse a hex RGB color: "#4472C4", "4472C4" or "0x4472C4"
pub fn parse_color(text: &str) -> Result<u32, String> {
    let trimmed = text.trim();
    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected a 6-digit hex color, got '{}'", text));
    }
    u32::from_str_radix(hex, 16).map_err(|e| e.to_string())
}

/// Reject strftime patterns chrono cannot render for a local timestamp
///
/// Parsing alone is not enough: timezone specifiers such as `%z` parse but
/// fail when rendered without an offset.
pub fn validate_timestamp_format(pattern: &str, sample: NaiveDateTime) -> Result<(), String> {
    if pattern.trim().is_empty() {
        return Err("timestamp_format must not be empty".to_string());
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(format!("timestamp_format '{}' is not a valid strftime pattern", pattern));
    }
    let mut rendered = String::new();
    write!(rendered, "{}", sample.format_with_items(StrftimeItems::new(pattern))).map_err(|_| {
        format!(
            "timestamp_format '{}' cannot be rendered for a local time (timezone specifiers are not supported)",
            pattern
        )
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
