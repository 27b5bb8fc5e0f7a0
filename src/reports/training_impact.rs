//! Training impact: pre- vs post-training assessment scores per employee.
//!
//! The two sources are expected to alias their score columns as `pre_score`
//! and `post_score`, since a shared field name would be overwritten by the
//! later source during the merge.

use super::{ReportDefinition, SourceSpec};
use crate::engine::metrics::{self, PERCENT_DECIMALS};
use crate::engine::resolve::{resolve_first_text, resolve_opt_f64, resolve_text};
use crate::engine::{ColumnSpec, FormatRule, StyleTag, Threshold};
use crate::types::{CellValue, ReportContext, UnifiedRow};

pub struct TrainingImpact;

static SOURCES: [SourceSpec; 2] =
    [SourceSpec::required("pre-assessment", "employee_id"), SourceSpec::required("post-assessment", "employee_id")];

impl ReportDefinition for TrainingImpact {
    fn name(&self) -> &'static str {
        "training-impact"
    }

    fn title(&self) -> &'static str {
        "Training Impact Report"
    }

    fn description(&self) -> &'static str {
        "Pre- and post-training scores with change and improvement per employee"
    }

    fn sources(&self) -> &'static [SourceSpec] {
        &SOURCES
    }

    fn columns(&self) -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("ID").width(8),
            ColumnSpec::new("Employee").width(24),
            ColumnSpec::new("Department").width(18),
            ColumnSpec::new("Pre Score").format(FormatRule::Decimal(2)),
            ColumnSpec::new("Post Score").format(FormatRule::Decimal(2)),
            ColumnSpec::new("Change")
                .format(FormatRule::Decimal(2))
                .style(Threshold::Above(0.0), StyleTag::Good)
                .style(Threshold::Below(0.0), StyleTag::Bad),
            ColumnSpec::new("Improvement (%)")
                .format(FormatRule::Percentage(2))
                .style(Threshold::AtLeast(20.0), StyleTag::Good)
                .style(Threshold::Below(0.0), StyleTag::Bad),
            ColumnSpec::new("Trend")
                .width(12)
                .style(Threshold::Is("IMPROVED".into()), StyleTag::Good)
                .style(Threshold::Is("DECLINED".into()), StyleTag::Bad)
                .style(Threshold::Is("INCOMPLETE".into()), StyleTag::Neutral),
        ]
    }

    fn map_row(&self, row: &UnifiedRow, _context: &ReportContext) -> Vec<CellValue> {
        let f = &row.fields;

        let pre = resolve_opt_f64(f, "pre_score").map(|s| metrics::round_to(s, PERCENT_DECIMALS));
        let post = resolve_opt_f64(f, "post_score").map(|s| metrics::round_to(s, PERCENT_DECIMALS));

        let score_cell = |score: Option<f64>| score.map(CellValue::Number).unwrap_or(CellValue::Empty);

        // Change metrics need both assessments
        let (change, improvement, trend) = match (pre, post) {
            (Some(before), Some(after)) => {
                let change = metrics::round_to(metrics::delta(after, before), PERCENT_DECIMALS);
                (
                    CellValue::Number(change),
                    CellValue::Number(metrics::improvement_percentage(before, after, PERCENT_DECIMALS)),
                    metrics::trend_label(change),
                )
            }
            _ => (CellValue::Empty, CellValue::Empty, "INCOMPLETE"),
        };

        vec![
            row.key.clone().into(),
            resolve_first_text(f, &["employee_name", "name"], "Unknown").into(),
            resolve_text(f, "department", "Unassigned").into(),
            score_cell(pre),
            score_cell(post),
            change,
            improvement,
            trend.into(),
        ]
    }
}
