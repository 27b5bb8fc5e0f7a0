//! Attempt quality review: flags attempts whose score and time do not fit together.

use super::{ReportDefinition, SourceSpec};
use crate::engine::metrics::{self, PERCENT_DECIMALS};
use crate::engine::resolve::{resolve_f64, resolve_first_text, resolve_opt_f64};
use crate::engine::{ColumnSpec, FormatRule, StyleTag, Threshold};
use crate::types::{CellValue, ReportContext, UnifiedRow};

pub struct AttemptQuality;

static SOURCES: [SourceSpec; 1] = [SourceSpec::required("attempts", "attempt_id")];

impl ReportDefinition for AttemptQuality {
    fn name(&self) -> &'static str {
        "attempt-quality"
    }

    fn title(&self) -> &'static str {
        "Attempt Quality Review"
    }

    fn description(&self) -> &'static str {
        "Score and duration per attempt, flagging suspiciously fast or struggling attempts"
    }

    fn sources(&self) -> &'static [SourceSpec] {
        &SOURCES
    }

    fn columns(&self) -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("Attempt ID").width(10),
            ColumnSpec::new("User").width(24),
            ColumnSpec::new("Assessment").width(32),
            ColumnSpec::new("Score")
                .format(FormatRule::Decimal(2))
                .style(Threshold::AtLeast(80.0), StyleTag::Good)
                .style(Threshold::Below(40.0), StyleTag::Bad),
            ColumnSpec::new("Duration (min)")
                .format(FormatRule::Decimal(0))
                .style(Threshold::AtMost(1.0), StyleTag::Warning),
            ColumnSpec::new("Quality Flag")
                .width(12)
                .style(Threshold::Is("EXCELLENT".into()), StyleTag::Good)
                .style(Threshold::Is("GOOD".into()), StyleTag::Good)
                .style(Threshold::Is("SUSPECT".into()), StyleTag::Bad)
                .style(Threshold::Is("CONCERN".into()), StyleTag::Warning),
        ]
    }

    fn map_row(&self, row: &UnifiedRow, _context: &ReportContext) -> Vec<CellValue> {
        let f = &row.fields;

        let score = metrics::round_to(resolve_f64(f, "score", 0.0), PERCENT_DECIMALS);
        let minutes = resolve_opt_f64(f, "duration_minutes")
            .or_else(|| resolve_opt_f64(f, "duration_seconds").map(|s| s / 60.0))
            .unwrap_or(0.0);

        vec![
            row.key.clone().into(),
            resolve_first_text(f, &["user_name", "user"], "Unknown").into(),
            resolve_first_text(f, &["assessment_title", "assessment"], "Untitled").into(),
            score.into(),
            metrics::round_to(minutes, 0).into(),
            metrics::attempt_quality(score, minutes).into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::style_grid;
    use crate::reports::generate;
    use crate::reports::tests::{context, records};
    use serde_json::json;

    #[test]
    fn test_quality_flags_per_attempt() {
        let attempts = records(json!([
            {"attempt_id": 100, "user_name": "Ana", "assessment_title": "Fire Safety", "score": 96, "duration_seconds": 45},
            {"attempt_id": 101, "user_name": "Bo", "score": "92.5", "duration_minutes": 14},
            {"attempt_id": 102, "score": 31, "duration_minutes": 75},
            {"attempt_id": 103, "score": 55, "duration_minutes": 20}
        ]));
        let table = generate(&AttemptQuality, &[attempts], &context()).unwrap();
        let flags: Vec<&CellValue> = table.rows().iter().map(|r| &r[5]).collect();
        assert_eq!(
            flags,
            vec![
                &CellValue::from("SUSPECT"),
                &CellValue::from("EXCELLENT"),
                &CellValue::from("CONCERN"),
                &CellValue::from("STANDARD")
            ]
        );
        assert_eq!(table.rows()[0][4], CellValue::Number(1.0));
        assert_eq!(table.rows()[1][3], CellValue::Number(92.5));
        assert_eq!(table.rows()[2][1], CellValue::Text("Unknown".into()));
    }

    #[test]
    fn test_short_durations_are_highlighted() {
        let attempts = records(json!([
            {"attempt_id": 1, "score": 96, "duration_seconds": 45},
            {"attempt_id": 2, "score": 70, "duration_minutes": 1},
            {"attempt_id": 3, "score": 70, "duration_minutes": 14}
        ]));
        let table = generate(&AttemptQuality, &[attempts], &context()).unwrap();
        let durations: Vec<Option<StyleTag>> = style_grid(&table).iter().map(|r| r[4]).collect();
        assert_eq!(durations, vec![Some(StyleTag::Warning), Some(StyleTag::Warning), None]);
    }
}
