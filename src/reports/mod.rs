//! Report definitions - one thin declaration per sheet.
//!
//! Each report names its source collections, declares its columns, and maps
//! one unified row to cells. Everything else (merging, arity checks,
//! placeholders, metadata) is shared through `generate`.
//!
//! # Module Organization
//!
//! - `exam_performance` - attempts, completion and pass rates per assessment
//! - `question_analysis` - item difficulty, discrimination and review flags
//! - `inactive_users` - days since last login and risk level
//! - `attempt_quality` - score/duration quality flags per attempt
//! - `training_impact` - pre/post assessment improvement per employee
//! - `course_completion` - enrollment progress per course
//! - `catalog` - the registered reports themselves, for `--list-reports`

mod attempt_quality;
mod catalog;
mod course_completion;
mod exam_performance;
mod inactive_users;
mod question_analysis;
mod training_impact;

use crate::engine::{self, ColumnSpec, ReportError, ReportTable, Source};
use crate::types::{CellValue, RawRecord, ReportContext, UnifiedRow};
use log::debug;

pub use attempt_quality::AttemptQuality;
pub use catalog::catalog;
pub use course_completion::CourseCompletion;
pub use exam_performance::ExamPerformance;
pub use inactive_users::InactiveUsers;
pub use question_analysis::QuestionAnalysis;
pub use training_impact::TrainingImpact;

/// A source collection a report reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpec {
    pub label: &'static str,
    pub key_field: &'static str,
    /// Optional sources may be left out on the command line
    pub required: bool,
}

impl SourceSpec {
    pub const fn required(label: &'static str, key_field: &'static str) -> Self {
        Self { label, key_field, required: true }
    }

    pub const fn optional(label: &'static str, key_field: &'static str) -> Self {
        Self { label, key_field, required: false }
    }
}

/// Declarative description of one report sheet
pub trait ReportDefinition {
    /// Command-line name, e.g. "exam-performance"
    fn name(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Source collections in merge order; later sources override earlier ones
    fn sources(&self) -> &'static [SourceSpec];

    fn columns(&self) -> Vec<ColumnSpec>;

    /// Map one unified row to exactly one cell per column
    fn map_row(&self, row: &UnifiedRow, context: &ReportContext) -> Vec<CellValue>;
}

/// All registered reports, in listing order
pub fn registry() -> Vec<Box<dyn ReportDefinition>> {
    vec![
        Box::new(ExamPerformance),
        Box::new(QuestionAnalysis),
        Box::new(InactiveUsers),
        Box::new(AttemptQuality),
        Box::new(TrainingImpact),
        Box::new(CourseCompletion),
    ]
}

/// Look up a report by its command-line name
pub fn find(name: &str) -> Result<Box<dyn ReportDefinition>, ReportError> {
    registry()
        .into_iter()
        .find(|r| r.name() == name.trim().to_lowercase().replace('_', "-"))
        .ok_or_else(|| ReportError::UnknownReport(name.to_string()))
}

/// Run a report over already-loaded collections.
///
/// `collections` line up with `definition.sources()`. Optional trailing
/// sources may be omitted; extra collections are an input error.
pub fn generate(
    definition: &dyn ReportDefinition,
    collections: &[Vec<RawRecord>],
    context: &ReportContext,
) -> Result<ReportTable, ReportError> {
    let specs = definition.sources();

    if collections.len() > specs.len() {
        return Err(ReportError::input(
            definition.name(),
            format!("expected at most {} source collections, got {}", specs.len(), collections.len()),
        ));
    }
    if let Some(missing) = specs.iter().skip(collections.len()).find(|s| s.required) {
        return Err(ReportError::input(missing.label, "required source collection was not supplied"));
    }

    let sources: Vec<Source<'_>> = specs
        .iter()
        .zip(collections)
        .map(|(spec, records)| Source { label: spec.label, key_field: spec.key_field, records })
        .collect();

    let merged = engine::normalize(&sources);
    debug!("{}: {} entities from {} sources", definition.name(), merged.rows.len(), sources.len());

    let table = engine::build(&merged.rows, &definition.columns(), |row| definition.map_row(row, context))
        .map_err(|e| e.for_report(definition.name()))?;

    Ok(table.with_metadata(metadata_rows(definition, context, merged.rows.len(), merged.skipped)))
}

/// Title, generated-at, description and record count lines
fn metadata_rows(
    definition: &dyn ReportDefinition,
    context: &ReportContext,
    records: usize,
    skipped: usize,
) -> Vec<String> {
    let title = match &context.organization {
        Some(org) if !org.trim().is_empty() => format!("{} - {}", org.trim(), definition.title()),
        _ => definition.title().to_string(),
    };

    let mut count = format!("Records: {}", records);
    if skipped > 0 {
        count.push_str(&format!(" ({} skipped without an id)", skipped));
    }

    vec![
        title,
        format!("Generated: {}", context.generated_at.format(&context.timestamp_format)),
        definition.description().to_string(),
        count,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::collections::HashSet;

    pub(crate) fn context() -> ReportContext {
        let at = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
        ReportContext::at(at)
    }

    pub(crate) fn records(v: serde_json::Value) -> Vec<RawRecord> {
        v.as_array().unwrap().iter().map(|r| r.as_object().cloned().unwrap()).collect()
    }

    #[test]
    fn test_registry_names_are_unique() {
        let names: Vec<&str> = registry().iter().map(|r| r.name()).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len());
    }

    #[test]
    fn test_every_report_is_well_formed_on_empty_input() {
        for report in registry() {
            let required = report.sources().iter().filter(|s| s.required).count();
            let collections = vec![Vec::new(); required];
            let table = generate(report.as_ref(), &collections, &context())
                .unwrap_or_else(|e| panic!("{} failed: {}", report.name(), e));
            assert!(table.is_placeholder(), "{}", report.name());
            assert_eq!(table.rows()[0].len(), report.columns().len(), "{}", report.name());
        }
    }

    #[test]
    fn test_every_report_maps_a_sparse_row() {
        // A record with only a key must still produce a full row of defaults
        for report in registry() {
            let key = report.sources()[0].key_field;
            let required = report.sources().iter().filter(|s| s.required).count().max(1);
            let mut collections = vec![Vec::new(); required];
            collections[0] = records(json!([{ key: 1 }]));
            let table = generate(report.as_ref(), &collections, &context())
                .unwrap_or_else(|e| panic!("{} failed: {}", report.name(), e));
            assert_eq!(table.record_count(), 1, "{}", report.name());
            assert_eq!(table.rows()[0].len(), table.columns().len(), "{}", report.name());
        }
    }

    #[test]
    fn test_find_accepts_underscores() {
        assert_eq!(find("exam_performance").unwrap().name(), "exam-performance");
        assert_eq!(find(" Inactive-Users ").unwrap().name(), "inactive-users");
        assert!(matches!(find("payroll"), Err(ReportError::UnknownReport(_))));
    }

    #[test]
    fn test_missing_required_source() {
        let report = find("training-impact").unwrap();
        let err = generate(report.as_ref(), &[Vec::new()], &context()).unwrap_err();
        assert!(matches!(err, ReportError::Input { .. }));
    }

    #[test]
    fn test_too_many_sources() {
        let report = find("inactive-users").unwrap();
        let err = generate(report.as_ref(), &[Vec::new(), Vec::new()], &context()).unwrap_err();
        assert!(matches!(err, ReportError::Input { .. }));
    }

    #[test]
    fn test_metadata_rows() {
        let report = find("attempt-quality").unwrap();
        let mut ctx = context();
        ctx.organization = Some("Acme Learning".to_string());
        let collections = vec![records(json!([{"attempt_id": 1}, {"attempt_id": null}]))];
        let table = generate(report.as_ref(), &collections, &ctx).unwrap();
        assert_eq!(table.metadata()[0], "Acme Learning - Attempt Quality Review");
        assert_eq!(table.metadata()[1], "Generated: 2026-03-01 09:30:00");
        assert_eq!(table.metadata()[3], "Records: 1 (1 skipped without an id)");
    }

    #[test]
    fn test_generate_is_deterministic() {
        let report = find("exam-performance").unwrap();
        let collections = vec![
            records(json!([{"assessment_id": 1, "title": "Fire Safety", "total_attempts": 10, "passed": 7}])),
            records(json!([{"assessment_id": 1, "avg_score": 72.4}])),
        ];
        let a = generate(report.as_ref(), &collections, &context()).unwrap();
        let b = generate(report.as_ref(), &collections, &context()).unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }
}
