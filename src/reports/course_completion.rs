//! Course completion progress per course.

use super::{ReportDefinition, SourceSpec};
use crate::engine::metrics::{self, PERCENT_DECIMALS};
use crate::engine::resolve::{resolve_first_text, resolve_i64};
use crate::engine::{ColumnSpec, FormatRule, StyleTag, Threshold};
use crate::types::{CellValue, ReportContext, UnifiedRow};

pub struct CourseCompletion;

static SOURCES: [SourceSpec; 2] =
    [SourceSpec::required("enrollments", "course_id"), SourceSpec::optional("progress", "course_id")];

impl ReportDefinition for CourseCompletion {
    fn name(&self) -> &'static str {
        "course-completion"
    }

    fn title(&self) -> &'static str {
        "Course Completion Report"
    }

    fn description(&self) -> &'static str {
        "Enrollment progress and completion rate per course"
    }

    fn sources(&self) -> &'static [SourceSpec] {
        &SOURCES
    }

    fn columns(&self) -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("ID").width(8),
            ColumnSpec::new("Course").width(32),
            ColumnSpec::new("Enrolled").format(FormatRule::GroupedInteger),
            ColumnSpec::new("Completed").format(FormatRule::GroupedInteger),
            ColumnSpec::new("In Progress").format(FormatRule::GroupedInteger),
            ColumnSpec::new("Not Started").format(FormatRule::GroupedInteger),
            ColumnSpec::new("Completion Rate (%)")
                .format(FormatRule::Percentage(2))
                .style(Threshold::AtLeast(90.0), StyleTag::Good)
                .style(Threshold::AtLeast(60.0), StyleTag::Neutral)
                .style(Threshold::Below(60.0), StyleTag::Bad),
            ColumnSpec::new("Status")
                .width(16)
                .style(Threshold::Is("On Track".into()), StyleTag::Good)
                .style(Threshold::Is("Needs Attention".into()), StyleTag::Warning)
                .style(Threshold::Is("At Risk".into()), StyleTag::Bad),
        ]
    }

    fn map_row(&self, row: &UnifiedRow, _context: &ReportContext) -> Vec<CellValue> {
        let f = &row.fields;

        let enrolled = resolve_i64(f, "enrolled", 0).max(0);
        let completed = resolve_i64(f, "completed", 0).max(0);
        let in_progress = resolve_i64(f, "in_progress", 0).max(0);
        let remaining = enrolled.saturating_sub(completed).saturating_sub(in_progress).max(0);
        let not_started = resolve_i64(f, "not_started", remaining);

        let completion = metrics::percentage_rate(completed as f64, enrolled as f64, PERCENT_DECIMALS);
        let status = if enrolled == 0 { "No Enrollments" } else { metrics::completion_status(completion) };

        vec![
            row.key.clone().into(),
            resolve_first_text(f, &["course_title", "title"], "Untitled").into(),
            enrolled.into(),
            completed.into(),
            in_progress.into(),
            not_started.into(),
            completion.into(),
            status.into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::generate;
    use crate::reports::tests::{context, records};
    use serde_json::json;

    #[test]
    fn test_progress_overrides_enrollment_counts() {
        let enrollments = records(json!([
            {"course_id": 1, "course_title": "Onboarding", "enrolled": 1200, "completed": 100},
            {"course_id": 2, "course_title": "Ethics", "enrolled": 0}
        ]));
        let progress = records(json!([{"course_id": 1, "completed": 1140, "in_progress": 40}]));
        let table = generate(&CourseCompletion, &[enrollments, progress], &context()).unwrap();
        let rows = table.rows();

        assert_eq!(rows[0][3], CellValue::Integer(1140));
        assert_eq!(rows[0][5], CellValue::Integer(20));
        assert_eq!(rows[0][6], CellValue::Number(95.0));
        assert_eq!(rows[0][7], CellValue::Text("On Track".into()));
        assert_eq!(table.columns()[2].format.render(&rows[0][2]), "1,200");

        assert_eq!(rows[1][6], CellValue::Number(0.0));
        assert_eq!(rows[1][7], CellValue::Text("No Enrollments".into()));
    }

    #[test]
    fn test_huge_counts_do_not_overflow() {
        let enrollments = records(json!([
            {"course_id": 1, "enrolled": 0, "completed": 9.0e18, "in_progress": 9.0e18}
        ]));
        let table = generate(&CourseCompletion, &[enrollments, Vec::new()], &context()).unwrap();
        let rows = table.rows();

        assert_eq!(rows[0][5], CellValue::Integer(0));
        assert_eq!(rows[0][7], CellValue::Text("No Enrollments".into()));
    }
}
