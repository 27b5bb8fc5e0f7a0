//! Inactive user risk report.

use super::{ReportDefinition, SourceSpec};
use crate::engine::metrics;
use crate::engine::resolve::{resolve_date, resolve_opt_f64, resolve_text};
use crate::engine::{ColumnSpec, FormatRule, StyleTag, Threshold};
use crate::types::{CellValue, ReportContext, UnifiedRow};

pub struct InactiveUsers;

static SOURCES: [SourceSpec; 1] = [SourceSpec::required("users", "user_id")];

impl ReportDefinition for InactiveUsers {
    fn name(&self) -> &'static str {
        "inactive-users"
    }

    fn title(&self) -> &'static str {
        "Inactive Users Report"
    }

    fn description(&self) -> &'static str {
        "Days since last login and risk level per user"
    }

    fn sources(&self) -> &'static [SourceSpec] {
        &SOURCES
    }

    fn columns(&self) -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("ID").width(8),
            ColumnSpec::new("Name").width(24),
            ColumnSpec::new("Email").width(32),
            ColumnSpec::new("Department").width(18),
            ColumnSpec::new("Last Login").width(12),
            ColumnSpec::new("Days Inactive")
                .format(FormatRule::Integer)
                .style(Threshold::Above(60.0), StyleTag::Bad)
                .style(Threshold::Above(30.0), StyleTag::Warning),
            ColumnSpec::new("Risk Level")
                .width(12)
                .style(Threshold::Is("CRITICAL".into()), StyleTag::Bad)
                .style(Threshold::Is("HIGH".into()), StyleTag::Warning)
                .style(Threshold::Is("MEDIUM".into()), StyleTag::Neutral),
        ]
    }

    fn map_row(&self, row: &UnifiedRow, context: &ReportContext) -> Vec<CellValue> {
        let f = &row.fields;

        let name = match resolve_text(f, "name", "").trim() {
            "" => {
                let full = format!("{} {}", resolve_text(f, "first_name", ""), resolve_text(f, "last_name", ""));
                if full.trim().is_empty() { "Unknown".to_string() } else { full.trim().to_string() }
            }
            name => name.to_string(),
        };

        let last_login = resolve_date(f, "last_login_at");

        // An explicit count wins; otherwise measure from the last login, or
        // from account creation for users who never logged in
        let days = resolve_opt_f64(f, "days_inactive").map(|d| d.max(0.0).floor()).or_else(|| {
            last_login
                .or_else(|| resolve_date(f, "created_at"))
                .map(|date| metrics::days_between(date, context.as_of) as f64)
        });

        let risk = match days {
            Some(d) => metrics::inactivity_risk(d),
            None => "CRITICAL",
        };

        vec![
            row.key.clone().into(),
            name.into(),
            resolve_text(f, "email", "").into(),
            resolve_text(f, "department", "Unassigned").into(),
            last_login.map(|d| CellValue::Text(d.format("%Y-%m-%d").to_string())).unwrap_or_else(|| "Never".into()),
            days.map(|d| CellValue::Integer(d as i64)).unwrap_or(CellValue::Empty),
            risk.into(),
        ]
    }
}
