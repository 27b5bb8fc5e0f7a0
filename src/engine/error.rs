//! Error taxonomy for report generation.
//!
//! Only failures that must stop an export live here. Missing merge keys are
//! counted and logged by the normalizer, and missing fields fall back to
//! defaults in the resolver; neither is an error.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum ReportError {
    /// Column/header/row arity mismatch or an invalid column declaration.
    ///
    /// Fatal: a mismatch shifts every value of a report under the wrong header.
    Configuration { report: String, message: String },

    /// A source collection could not be read, parsed, or was not supplied
    Input { source: String, message: String },

    /// The sink failed to render or write the artifact
    Export { path: PathBuf, message: String },

    /// No report definition is registered under this name
    UnknownReport(String),
}

impl ReportError {
    pub fn configuration(report: impl Into<String>, message: impl Into<String>) -> Self {
        ReportError::Configuration { report: report.into(), message: message.into() }
    }

    pub fn input(source: impl Into<String>, message: impl Into<String>) -> Self {
        ReportError::Input { source: source.into(), message: message.into() }
    }

    pub fn export(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        ReportError::Export { path: path.into(), message: message.to_string() }
    }

    /// Attach the report name to a configuration error raised before it was known
    pub fn for_report(self, name: &str) -> Self {
        match self {
            ReportError::Configuration { report, message } if report.is_empty() => {
                ReportError::Configuration { report: name.to_string(), message }
            }
            other => other,
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Configuration { report, message } if report.is_empty() => {
                write!(f, "Configuration error: {}", message)
            }
            ReportError::Configuration { report, message } => {
                write!(f, "Configuration error in report '{}': {}", report, message)
            }
            ReportError::Input { source, message } => write!(f, "Failed to load {}: {}", source, message),
            ReportError::Export { path, message } => write!(f, "Failed to write {}: {}", path.display(), message),
            ReportError::UnknownReport(name) => {
                write!(f, "Unknown report '{}' (use --list-reports to see available reports)", name)
            }
        }
    }
}

impl std::error::Error for ReportError {}
