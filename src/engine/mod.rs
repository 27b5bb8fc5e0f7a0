//! Report engine - shared logic behind every report sheet.
//!
//! This module handles:
//! - Reading fields off raw records with explicit defaults
//! - Computing derived metrics (rates, deltas, classifications)
//! - Merging several source collections by entity key
//! - Assembling column-aligned tables with an arity check
//! - Declaring per-column format and style rules
//!
//! Rendering to files is handled by the export module.
//!
//! # Module Organization
//!
//! - `resolve` - Field Resolver
//! - `metrics` - Metric Calculator and domain classifiers
//! - `normalize` - Row Normalizer
//! - `table` - Table Builder and `ReportTable`
//! - `format` - Column specs, format rules, style rules
//! - `error` - `ReportError`

mod error;
mod format;
pub mod metrics;
mod normalize;
pub mod resolve;
mod table;

pub use error::ReportError;
pub use format::{ColumnSpec, FormatRule, StyleTag, Threshold, column_index, style_grid};
pub use normalize::{Source, normalize};
pub use table::{ReportTable, build};
