use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::model::Timestamp;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

pub(crate) fn text(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Absent, null and blank strings are all `None`.
pub(crate) fn optional_text(v: Option<&Value>) -> Option<String> {
    let s = text(v);
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Durations are never negative or non-finite; anything unusable becomes 0.
pub(crate) fn duration(v: Option<&Value>) -> f64 {
    let raw = match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match raw {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => 0.0,
    }
}

pub(crate) fn flag(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|x| x != 0.0),
        _ => false,
    }
}

/// Parse a timestamp field. Strings may be RFC 3339, naive date-times (read as
/// UTC) or bare dates; numbers are epoch milliseconds.
pub fn parse_timestamp(v: &Value) -> Timestamp {
    match v {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(Timestamp::new)
            .unwrap_or(Timestamp::INVALID),
        _ => Timestamp::INVALID,
    }
}

fn parse_timestamp_str(s: &str) -> Timestamp {
    let s = s.trim();
    if s.is_empty() {
        return Timestamp::INVALID;
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Timestamp::new(t.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Timestamp::new(t.and_utc());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(t) = d.and_hms_opt(0, 0, 0) {
            return Timestamp::new(t.and_utc());
        }
    }
    Timestamp::INVALID
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duration_coercion() {
        assert_eq!(duration(Some(&json!(12.5))), 12.5);
        assert_eq!(duration(Some(&json!("40"))), 40.0);
        assert_eq!(duration(Some(&json!("fast"))), 0.0);
        assert_eq!(duration(Some(&json!(-3))), 0.0);
        assert_eq!(duration(None), 0.0);
    }

    #[test]
    fn timestamp_formats() {
        let rfc = parse_timestamp(&json!("2024-05-01T10:00:00Z"));
        let offset = parse_timestamp(&json!("2024-05-01T12:00:00+02:00"));
        let naive = parse_timestamp(&json!("2024-05-01T10:00:00"));
        let millis = parse_timestamp(&json!(1714557600000i64));
        assert!(rfc.is_valid());
        assert_eq!(rfc, offset);
        assert_eq!(rfc, naive);
        assert_eq!(rfc, millis);
        assert!(parse_timestamp(&json!("2024-05-01")).is_valid());
    }

    #[test]
    fn unparsable_timestamp_is_invalid() {
        assert_eq!(parse_timestamp(&json!("yesterday")), Timestamp::INVALID);
        assert_eq!(parse_timestamp(&json!(null)), Timestamp::INVALID);
        assert_eq!(parse_timestamp(&json!({"at": 1})), Timestamp::INVALID);
    }

    #[test]
    fn retry_flag_accepts_strings() {
        assert!(flag(Some(&json!(true))));
        assert!(flag(Some(&json!("TRUE"))));
        assert!(!flag(Some(&json!("no"))));
        assert!(!flag(None));
    }
}
