use crate::export::OutputFormat;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Get the default location of the optional config file
/// Uses platform-specific config directories:
/// - Linux: ~/.config/report-sheets/config.toml
/// - macOS: ~/Library/Application Support/report-sheets/config.toml
/// - Windows: %APPDATA%/report-sheets/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("report-sheets").join("config.toml"))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD ({})", e))
}

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "report-sheets")]
#[command(about = "Merge record collections into formatted report sheets")]
#[command(version)]
pub struct CliArgs {
    /// Report to generate (see --list-reports)
    #[arg(long, short = 'r', value_name = "NAME")]
    pub report: Option<String>,

    /// JSON source collections, in the order the report declares them
    /// Can specify multiple: --source exams.json quiz_stats.json
    #[arg(long, short = 's', value_name = "FILE", num_args = 1..)]
    pub source: Vec<PathBuf>,

    /// Output file (default: <report>.<format extension> in the current directory)
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: inferred from the output extension, else xlsx)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Date "days since" metrics are measured against (default: today)
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub as_of: Option<NaiveDate>,

    /// Config file (default: $REPORT_SHEETS_CONFIG, then the user config directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Organization name prefixed to the report title
    #[arg(long, value_name = "NAME")]
    pub organization: Option<String>,

    /// Disable alternating row shading in spreadsheets
    #[arg(long)]
    pub no_zebra: bool,

    /// Sort data rows by this column label
    #[arg(long, value_name = "COLUMN")]
    pub sort_by: Option<String>,

    /// Sort in descending order (with --sort-by)
    #[arg(long, requires = "sort_by")]
    pub descending: bool,

    /// Print the table to the console as well
    #[arg(long)]
    pub preview: bool,

    /// Override console width for the preview (default: auto-detect)
    #[arg(long, value_name = "COLUMNS")]
    pub console_width: Option<usize>,

    /// List available reports and the sources each one reads
    #[arg(long)]
    pub list_reports: bool,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        let mut args = CliArgs::parse();

        // Trim so " exam_performance " and "exam_performance" name the same report
        args.report = args.report.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        args.organization = args.organization.map(|o| o.trim().to_string()).filter(|o| !o.is_empty());

        args
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.list_reports {
            return Ok(());
        }

        if self.report.is_none() {
            return Err("Must specify --report <NAME> (or --list-reports to see available reports)".to_string());
        }

        if self.source.is_empty() {
            return Err("Must specify at least one --source <FILE>".to_string());
        }

        if self.console_width == Some(0) {
            return Err("--console-width must be greater than zero".to_string());
        }

        // An explicit format must agree with a recognizable output extension
        if let (Some(format), Some(output)) = (self.format, &self.output) {
            if OutputFormat::from_path(output).is_some_and(|inferred| inferred != format) {
                return Err(format!("--format {} does not match output file {}", format.extension(), output.display()));
            }
        }

        Ok(())
    }

    /// Resolve the output format: --format, then the output extension, then xlsx
    pub fn output_format(&self) -> OutputFormat {
        self.format
            .or_else(|| self.output.as_deref().and_then(OutputFormat::from_path))
            .unwrap_or(OutputFormat::Xlsx)
    }

    /// Get the output path, defaulting to "<report>.<ext>"
    pub fn get_output_path(&self, report_name: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.{}", report_name, self.output_format().extension())))
    }
}
