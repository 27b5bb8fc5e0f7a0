//! Exam performance overview: one row per assessment.

use super::{ReportDefinition, SourceSpec};
use crate::engine::metrics::{self, PERCENT_DECIMALS};
use crate::engine::resolve::{resolve_f64, resolve_first_text, resolve_i64, resolve_opt_f64};
use crate::engine::{ColumnSpec, FormatRule, StyleTag, Threshold};
use crate::types::{CellValue, ReportContext, UnifiedRow};

pub struct ExamPerformance;

static SOURCES: [SourceSpec; 2] =
    [SourceSpec::required("exams", "assessment_id"), SourceSpec::optional("quiz stats", "assessment_id")];

impl ReportDefinition for ExamPerformance {
    fn name(&self) -> &'static str {
        "exam-performance"
    }

    fn title(&self) -> &'static str {
        "Exam Performance Report"
    }

    fn description(&self) -> &'static str {
        "Attempts, completion and pass rates per assessment"
    }

    fn sources(&self) -> &'static [SourceSpec] {
        &SOURCES
    }

    fn columns(&self) -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("ID").width(8),
            ColumnSpec::new("Assessment").width(32),
            ColumnSpec::new("Attempts").format(FormatRule::GroupedInteger),
            ColumnSpec::new("Completed").format(FormatRule::GroupedInteger),
            ColumnSpec::new("Completion Rate (%)")
                .format(FormatRule::Percentage(2))
                .style(Threshold::AtLeast(90.0), StyleTag::Good)
                .style(Threshold::AtLeast(70.0), StyleTag::Neutral)
                .style(Threshold::Below(50.0), StyleTag::Bad),
            ColumnSpec::new("Passed").format(FormatRule::GroupedInteger),
            ColumnSpec::new("Pass Rate (%)")
                .format(FormatRule::Percentage(2))
                .style(Threshold::AtLeast(80.0), StyleTag::Good)
                .style(Threshold::AtLeast(60.0), StyleTag::Neutral)
                .style(Threshold::Below(40.0), StyleTag::Bad),
            ColumnSpec::new("Average Score").format(FormatRule::Decimal(2)),
            ColumnSpec::new("Average Duration (min)").format(FormatRule::Decimal(0)),
            ColumnSpec::new("Difficulty")
                .width(12)
                .style(Threshold::Is("Very Hard".into()), StyleTag::Bad)
                .style(Threshold::Is("Hard".into()), StyleTag::Warning),
        ]
    }

    fn map_row(&self, row: &UnifiedRow, _context: &ReportContext) -> Vec<CellValue> {
        let f = &row.fields;

        let attempts = resolve_i64(f, "total_attempts", 0);
        // Without a completed count every recorded attempt is treated as finished
        let completed = resolve_i64(f, "completed_attempts", attempts);
        let passed = resolve_i64(f, "passed", resolve_i64(f, "passed_attempts", 0));

        let completion_rate = metrics::percentage_rate(completed as f64, attempts as f64, PERCENT_DECIMALS);
        let pass_rate = metrics::percentage_rate(passed as f64, completed as f64, PERCENT_DECIMALS);

        let duration = resolve_opt_f64(f, "avg_duration_minutes")
            .or_else(|| resolve_opt_f64(f, "avg_duration_seconds").map(|s| s / 60.0))
            .unwrap_or(0.0);

        // Older exports carry a score total rather than the average
        let avg_score = resolve_opt_f64(f, "avg_score")
            .unwrap_or_else(|| metrics::average(resolve_f64(f, "total_score", 0.0), completed as f64));

        vec![
            row.key.clone().into(),
            resolve_first_text(f, &["title", "name"], "Untitled").into(),
            attempts.into(),
            completed.into(),
            completion_rate.into(),
            passed.into(),
            pass_rate.into(),
            metrics::round_to(avg_score, PERCENT_DECIMALS).into(),
            metrics::round_to(duration, 0).into(),
            metrics::difficulty_label(pass_rate).into(),
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
    fn test_average_score_from_total() {
        let exams = records(json!([{"assessment_id": 9, "total_attempts": 4, "completed_attempts": 3, "total_score": 200}]));
        let table = generate(&ExamPerformance, &[exams], &context()).unwrap();
        assert_eq!(table.rows()[0][7], CellValue::Number(66.67));
    }

    #[test]
    fn test_merges_exam_and_quiz_stats() {
        let exams = records(json!([
            {"assessment_id": 1, "title": "Fire Safety", "total_attempts": 20, "completed_attempts": 16, "passed": 12},
            {"assessment_id": 2, "title": "GDPR Basics", "total_attempts": 0}
        ]));
        let quiz = records(json!([
            {"assessment_id": "1", "avg_score": 78.456, "avg_duration_seconds": 1530},
            {"assessment_id": 3, "avg_score": 50}
        ]));

        let table = generate(&ExamPerformance, &[exams, quiz], &context()).unwrap();
        assert_eq!(table.record_count(), 3);

        let fire = &table.rows()[0];
        assert_eq!(fire[0], CellValue::Integer(1));
        assert_eq!(fire[1], CellValue::Text("Fire Safety".into()));
        assert_eq!(fire[4], CellValue::Number(80.0));
        assert_eq!(fire[6], CellValue::Number(75.0));
        assert_eq!(fire[7], CellValue::Number(78.46));
        assert_eq!(fire[8], CellValue::Number(26.0));
        assert_eq!(fire[9], CellValue::Text("Moderate".into()));

        // No attempts: rates fall back to 0 rather than dividing by zero
        let gdpr = &table.rows()[1];
        assert_eq!(gdpr[4], CellValue::Number(0.0));
        assert_eq!(gdpr[6], CellValue::Number(0.0));

        // Quiz-only entity still gets a full row
        let orphan = &table.rows()[2];
        assert_eq!(orphan[1], CellValue::Text("Untitled".into()));
        assert_eq!(orphan[7], CellValue::Number(50.0));
    }

    #[test]
    fn test_zero_score_is_not_replaced() {
        let exams = records(json!([{"assessment_id": 1, "avg_score": 0, "total_attempts": 4, "passed": 0}]));
        let table = generate(&ExamPerformance, &[exams], &context()).unwrap();
        assert_eq!(table.rows()[0][7], CellValue::Number(0.0));
        assert_eq!(table.rows()[0][9], CellValue::Text("Very Hard".into()));
    }
}
