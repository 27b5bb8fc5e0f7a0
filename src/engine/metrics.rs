//! Derived metrics computed from raw counts.
//!
//! Every function here is total: denominators at or below zero give 0,
//! and no result is ever NaN or infinite.

use super::format::Threshold;
use chrono::NaiveDate;

/// Decimals used for percentage-like outputs unless a column says otherwise
pub const PERCENT_DECIMALS: u32 = 2;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // Avoid "-0" in rendered output
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// `numerator / denominator` as a fraction, or 0 when the denominator is not positive.
pub fn rate(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && numerator.is_finite() && denominator.is_finite() { numerator / denominator } else { 0.0 }
}

/// `rate` on a 0-100 scale, rounded to `decimals`.
pub fn percentage_rate(numerator: f64, denominator: f64, decimals: u32) -> f64 {
    round_to(100.0 * rate(numerator, denominator), decimals)
}

/// Mean from a total and a count
pub fn average(total: f64, count: f64) -> f64 {
    rate(total, count)
}

pub fn delta(current: f64, previous: f64) -> f64 {
    current - previous
}

/// Relative change against `previous`, or 0 when `previous` is not positive.
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    rate(delta(current, previous), previous)
}

/// Growth rate on a 0-100 scale, rounded to `decimals`.
pub fn improvement_percentage(before: f64, after: f64, decimals: u32) -> f64 {
    round_to(100.0 * growth_rate(after, before), decimals)
}

/// Difference between the upper and lower group success rates.
///
/// Ranges from -1 to 1; questions that strong candidates answer correctly
/// more often than weak candidates score positive.
pub fn discrimination_index(upper_correct: f64, upper_total: f64, lower_correct: f64, lower_total: f64) -> f64 {
    round_to(rate(upper_correct, upper_total) - rate(lower_correct, lower_total), PERCENT_DECIMALS)
}

/// Whole days from `from` to `to`, never negative.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days().max(0)
}

/// Return the label of the first band whose threshold matches `value`.
///
/// Bands are evaluated in declared order; `fallback` is the catch-all bucket
/// so every value classifies.
pub fn classify_by_thresholds<'a>(value: f64, bands: &[(Threshold, &'a str)], fallback: &'a str) -> &'a str {
    bands.iter().find(|(threshold, _)| threshold.matches_number(value)).map(|(_, label)| *label).unwrap_or(fallback)
}

/// Join the labels of all raised checks in declared order, or return `fallback`.
pub fn accumulate_flags(checks: &[(bool, &str)], fallback: &str) -> String {
    let raised: Vec<&str> = checks.iter().filter(|(raised, _)| *raised).map(|(_, label)| *label).collect();
    if raised.is_empty() { fallback.to_string() } else { raised.join("; ") }
}

//
// Domain classifiers
//

/// Risk level for a user who has not logged in for `days` days
pub fn inactivity_risk(days: f64) -> &'static str {
    classify_by_thresholds(
        days,
        &[(Threshold::Above(60.0), "CRITICAL"), (Threshold::Above(30.0), "HIGH")],
        "MEDIUM",
    )
}

/// Quality flag for a single attempt from its score (0-100) and duration in minutes
pub fn attempt_quality(score: f64, minutes: f64) -> &'static str {
    if score >= 90.0 && minutes < 2.0 {
        // High score in almost no time
        "SUSPECT"
    } else if score >= 90.0 && minutes >= 10.0 {
        "EXCELLENT"
    } else if score >= 75.0 {
        "GOOD"
    } else if score < 40.0 && minutes > 60.0 {
        "CONCERN"
    } else {
        "STANDARD"
    }
}

/// Review recommendation for a question or quiz
pub fn question_recommendation(avg_score: f64, pass_rate: f64, discrimination: f64, reliability: f64) -> String {
    accumulate_flags(
        &[
            (avg_score < 50.0, "Review difficulty"),
            (pass_rate < 50.0, "Low pass rate"),
            (discrimination < 0.2, "Poor discrimination"),
            (reliability < 0.7, "Low reliability"),
        ],
        "Acceptable",
    )
}

/// Difficulty label from the share of correct answers (0-100)
pub fn difficulty_label(correct_percentage: f64) -> &'static str {
    classify_by_thresholds(
        correct_percentage,
        &[
            (Threshold::AtLeast(80.0), "Easy"),
            (Threshold::AtLeast(50.0), "Moderate"),
            (Threshold::AtLeast(30.0), "Hard"),
        ],
        "Very Hard",
    )
}

/// Trend label for a before/after change
pub fn trend_label(change: f64) -> &'static str {
    classify_by_thresholds(
        change,
        &[(Threshold::Above(0.0), "IMPROVED"), (Threshold::Below(0.0), "DECLINED")],
        "UNCHANGED",
    )
}

/// Completion status for a course from its completion percentage
pub fn completion_status(completion_percentage: f64) -> &'static str {
    classify_by_thresholds(
        completion_percentage,
        &[(Threshold::AtLeast(90.0), "On Track"), (Threshold::AtLeast(60.0), "Needs Attention")],
        "At Risk",
    )
}
