//! Item analysis for quiz questions.
//!
//! Difficulty index is the share of correct responses. Discrimination is the
//! upper-group success rate minus the lower-group success rate, unless the
//! source already supplies `discrimination_index`.

use super::{ReportDefinition, SourceSpec};
use crate::engine::metrics::{self, PERCENT_DECIMALS};
use crate::engine::resolve::{resolve_f64, resolve_first_text, resolve_i64, resolve_opt_f64};
use crate::engine::{ColumnSpec, FormatRule, StyleTag, Threshold};
use crate::types::{CellValue, ReportContext, UnifiedRow};

pub struct QuestionAnalysis;

static SOURCES: [SourceSpec; 2] =
    [SourceSpec::required("questions", "question_id"), SourceSpec::optional("responses", "question_id")];

impl ReportDefinition for QuestionAnalysis {
    fn name(&self) -> &'static str {
        "question-analysis"
    }

    fn title(&self) -> &'static str {
        "Quiz Question Analysis"
    }

    fn description(&self) -> &'static str {
        "Difficulty, discrimination and reliability per question, with review recommendations"
    }

    fn sources(&self) -> &'static [SourceSpec] {
        &SOURCES
    }

    fn columns(&self) -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("ID").width(8),
            ColumnSpec::new("Question").width(48),
            ColumnSpec::new("Responses").format(FormatRule::GroupedInteger),
            ColumnSpec::new("Correct").format(FormatRule::GroupedInteger),
            ColumnSpec::new("Difficulty Index (%)").format(FormatRule::Percentage(2)),
            ColumnSpec::new("Discrimination")
                .format(FormatRule::Decimal(2))
                .style(Threshold::AtLeast(0.4), StyleTag::Good)
                .style(Threshold::AtLeast(0.2), StyleTag::Neutral)
                .style(Threshold::Below(0.2), StyleTag::Bad),
            ColumnSpec::new("Reliability")
                .format(FormatRule::Decimal(2))
                .style(Threshold::AtLeast(0.7), StyleTag::Good)
                .style(Threshold::Below(0.5), StyleTag::Bad),
            ColumnSpec::new("Average Score").format(FormatRule::Decimal(2)),
            ColumnSpec::new("Pass Rate (%)")
                .format(FormatRule::Percentage(2))
                .style(Threshold::AtLeast(80.0), StyleTag::Good)
                .style(Threshold::Below(50.0), StyleTag::Bad),
            ColumnSpec::new("Recommendation")
                .width(40)
                .style(Threshold::Is("Acceptable".into()), StyleTag::Good)
                .style(Threshold::IsNot("Acceptable".into()), StyleTag::Warning),
        ]
    }

    fn map_row(&self, row: &UnifiedRow, _context: &ReportContext) -> Vec<CellValue> {
        let f = &row.fields;

        let responses = resolve_i64(f, "total_responses", 0);
        let correct = resolve_i64(f, "correct_responses", 0);
        let difficulty = metrics::percentage_rate(correct as f64, responses as f64, PERCENT_DECIMALS);

        let discrimination = match resolve_opt_f64(f, "discrimination_index") {
            Some(d) => metrics::round_to(d, 2),
            None => metrics::discrimination_index(
                resolve_f64(f, "upper_correct", 0.0),
                resolve_f64(f, "upper_total", 0.0),
                resolve_f64(f, "lower_correct", 0.0),
                resolve_f64(f, "lower_total", 0.0),
            ),
        };
        let reliability = metrics::round_to(resolve_f64(f, "reliability", 0.0), 2);
        let avg_score = metrics::round_to(resolve_f64(f, "avg_score", difficulty), PERCENT_DECIMALS);
        let pass_rate = resolve_opt_f64(f, "pass_rate")
            .map(|p| metrics::round_to(p, PERCENT_DECIMALS))
            .unwrap_or_else(|| {
                metrics::percentage_rate(resolve_f64(f, "passed", 0.0), responses as f64, PERCENT_DECIMALS)
            });

        vec![
            row.key.clone().into(),
            resolve_first_text(f, &["question_text", "text"], "").into(),
            responses.into(),
            correct.into(),
            difficulty.into(),
            discrimination.into(),
            reliability.into(),
            avg_score.into(),
            pass_rate.into(),
            metrics::question_recommendation(avg_score, pass_rate, discrimination, reliability).into(),
        ]
    }
}
