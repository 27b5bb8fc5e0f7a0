//! Field resolution with explicit defaults.
//!
//! A field is absent only when the key is missing or its value is `null`.
//! `0`, `false` and `""` are real values and are returned as-is.

use crate::types::RawRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Read `field` from `record`, falling back to `default` when absent or null.
pub fn resolve(record: &RawRecord, field: &str, default: Value) -> Value {
    match record.get(field) {
        Some(Value::Null) | None => default,
        Some(value) => value.clone(),
    }
}

/// Numeric view of a field, or `None` when absent, null, or not numeric.
///
/// Numeric strings ("85.50") are accepted since decimal columns commonly
/// arrive as strings from SQL drivers. Booleans count as 1/0.
pub fn resolve_opt_f64(record: &RawRecord, field: &str) -> Option<f64> {
    match record.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

pub fn resolve_f64(record: &RawRecord, field: &str, default: f64) -> f64 {
    resolve_opt_f64(record, field).unwrap_or(default)
}

/// Integer view of a field; fractional values are truncated toward zero.
pub fn resolve_i64(record: &RawRecord, field: &str, default: i64) -> i64 {
    match record.get(field) {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(default),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
                .unwrap_or(default)
        }
        Some(Value::Bool(b)) => *b as i64,
        _ => default,
    }
}

/// Text view of a field. Numbers and booleans are stringified.
pub fn resolve_text(record: &RawRecord, field: &str, default: &str) -> String {
    match resolve(record, field, Value::Null) {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => default.to_string(),
    }
}

/// First field of `fields` that is present, as text
pub fn resolve_first_text(record: &RawRecord, fields: &[&str], default: &str) -> String {
    fields
        .iter()
        .find(|f| !matches!(record.get(**f), None | Some(Value::Null)))
        .map(|f| resolve_text(record, f, default))
        .unwrap_or_else(|| default.to_string())
}

/// Calendar date of a field holding a date or timestamp string.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339 timestamps.
pub fn resolve_date(record: &RawRecord, field: &str) -> Option<NaiveDate> {
    let Some(Value::String(s)) = record.get(field) else {
        return None;
    };
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok().map(|dt| dt.date()))
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> RawRecord {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_missing_and_null_use_default() {
        let r = record(json!({"a": null}));
        assert_eq!(resolve(&r, "a", json!("fallback")), json!("fallback"));
        assert_eq!(resolve(&r, "b", json!(3)), json!(3));
    }

    #[test]
    fn test_falsy_values_are_present() {
        let r = record(json!({"zero": 0, "no": false, "blank": ""}));
        assert_eq!(resolve(&r, "zero", json!(50)), json!(0));
        assert_eq!(resolve(&r, "no", json!(true)), json!(false));
        assert_eq!(resolve(&r, "blank", json!("N/A")), json!(""));
        assert_eq!(resolve_f64(&r, "zero", 50.0), 0.0);
        assert_eq!(resolve_i64(&r, "zero", 50), 0);
        assert_eq!(resolve_text(&r, "blank", "N/A"), "");
    }

    #[test]
    fn test_numeric_strings() {
        let r = record(json!({"avg": "85.50", "count": "12", "bad": "n/a", "frac": 7.9}));
        assert_eq!(resolve_f64(&r, "avg", 0.0), 85.5);
        assert_eq!(resolve_i64(&r, "count", 0), 12);
        assert_eq!(resolve_i64(&r, "avg", 0), 85);
        assert_eq!(resolve_f64(&r, "bad", -1.0), -1.0);
        assert_eq!(resolve_i64(&r, "frac", 0), 7);
        assert_eq!(resolve_opt_f64(&r, "missing"), None);
    }

    #[test]
    fn test_text_stringifies_scalars() {
        let r = record(json!({"id": 42, "active": true}));
        assert_eq!(resolve_text(&r, "id", ""), "42");
        assert_eq!(resolve_text(&r, "active", ""), "true");
        assert_eq!(resolve_text(&r, "missing", "N/A"), "N/A");
    }

    #[test]
    fn test_dates() {
        let r = record(json!({
            "day": "2026-02-03",
            "stamp": "2026-02-03 17:45:00",
            "rfc": "2026-02-03T23:10:00+00:00",
            "junk": "yesterday",
            "num": 20260203
        }));
        let expected = NaiveDate::from_ymd_opt(2026, 2, 3);
        assert_eq!(resolve_date(&r, "day"), expected);
        assert_eq!(resolve_date(&r, "stamp"), expected);
        assert_eq!(resolve_date(&r, "rfc"), expected);
        assert_eq!(resolve_date(&r, "junk"), None);
        assert_eq!(resolve_date(&r, "num"), None);
        assert_eq!(resolve_date(&r, "missing"), None);
    }

    #[test]
    fn test_first_text_skips_null() {
        let r = record(json!({"title": null, "name": "Safety 101"}));
        assert_eq!(resolve_first_text(&r, &["title", "name"], "Untitled"), "Safety 101");
        assert_eq!(resolve_first_text(&r, &["other"], "Untitled"), "Untitled");
    }
}
