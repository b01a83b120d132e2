//! Record normalizer: NDJSON text into typed records.
//!
//! Malformed lines are dropped locally and never surfaced one by one; the
//! caller only ever sees the records that decoded.

pub mod aliases;
mod coerce;

use serde_json::{Map, Value};

use crate::model::{Category, Outcome, Sample, TestSample, Timestamp};
use aliases::{lookup, Field};

pub use coerce::parse_timestamp;

/// Decode every non-empty line into a JSON object, in file order.
fn objects(text: &str) -> (Vec<Map<String, Value>>, usize) {
    let mut out = Vec::new();
    let mut dropped = 0usize;
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(obj)) => out.push(obj),
            _ => dropped += 1,
        }
    }
    (out, dropped)
}

fn category(obj: &Map<String, Value>) -> Category {
    match lookup(obj, Field::Category) {
        Some(Value::String(s)) => Category::parse(s),
        Some(Value::Number(n)) => category_code(n)
            .map(Category::from_code)
            .unwrap_or_default(),
        _ => Category::default(),
    }
}

/// Integral codes only; `2.0` counts, `1.5` does not.
fn category_code(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn timestamp(obj: &Map<String, Value>) -> Timestamp {
    lookup(obj, Field::TimestampUtc)
        .map(parse_timestamp)
        .unwrap_or(Timestamp::INVALID)
}

pub fn sample_from_object(obj: &Map<String, Value>) -> Sample {
    Sample {
        scenario: coerce::text(lookup(obj, Field::Scenario)),
        metric: coerce::text(lookup(obj, Field::Metric)),
        category: category(obj),
        duration_ms: coerce::duration(lookup(obj, Field::DurationMs)),
        status: coerce::text(lookup(obj, Field::Status)),
        run_id: coerce::text(lookup(obj, Field::RunId)),
        branch: coerce::text(lookup(obj, Field::Branch)),
        commit: coerce::text(lookup(obj, Field::Commit)),
        timestamp_utc: timestamp(obj),
    }
}

pub fn test_sample_from_object(obj: &Map<String, Value>) -> TestSample {
    let outcome = match lookup(obj, Field::Outcome) {
        Some(Value::String(s)) => Outcome::parse(s),
        _ => Outcome::Other,
    };
    TestSample {
        test_name: coerce::text(lookup(obj, Field::TestName)),
        run_id: coerce::text(lookup(obj, Field::RunId)),
        outcome,
        succeeded_on_retry: coerce::flag(lookup(obj, Field::SucceededOnRetry)),
        error_key: coerce::optional_text(lookup(obj, Field::ErrorKey)),
        error_summary: coerce::optional_text(lookup(obj, Field::ErrorSummary)),
        timestamp_utc: timestamp(obj),
    }
}

/// Parse the performance stream.
pub fn parse_samples(text: &str) -> Vec<Sample> {
    let (objs, dropped) = objects(text);
    tracing::debug!(
        records = objs.len(),
        dropped,
        "normalized performance lines"
    );
    objs.iter().map(sample_from_object).collect()
}

/// Parse the test-outcome stream.
pub fn parse_test_samples(text: &str) -> Vec<TestSample> {
    let (objs, dropped) = objects(text);
    tracing::debug!(records = objs.len(), dropped, "normalized test lines");
    objs.iter().map(test_sample_from_object).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_malformed_and_blank_lines() {
        let text = r#"
{"scenario":"Login","metric":"submit","durationMs":100,"runId":"r1","timestampUtc":"2024-01-01T00:00:00Z"}
not json
{"scenario":"Login","metric":"submit","durationMs":200
[1,2,3]

   {"Scenario":"Cart","Metric":"add","DurationMs":"55","RunId":"r2"}
"#;
        let samples = parse_samples(text);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].scenario, "Login");
        assert_eq!(samples[0].duration_ms, 100.0);
        assert_eq!(samples[1].scenario, "Cart");
        assert_eq!(samples[1].duration_ms, 55.0);
        assert_eq!(samples[1].timestamp_utc, Timestamp::INVALID);
    }

    #[test]
    fn keeps_file_order() {
        let text = "{\"metric\":\"b\",\"timestampUtc\":\"2024-01-02T00:00:00Z\"}\n{\"metric\":\"a\",\"timestampUtc\":\"2024-01-01T00:00:00Z\"}";
        let metrics: Vec<_> = parse_samples(text).into_iter().map(|s| s.metric).collect();
        assert_eq!(metrics, vec!["b", "a"]);
    }

    #[test]
    fn category_from_string_code_or_absent() {
        let text = concat!(
            "{\"category\":\"cold\"}\n",
            "{\"Category\":0}\n",
            "{\"category\":\"steaming\"}\n",
            "{}\n",
        );
        let cats: Vec<_> = parse_samples(text).into_iter().map(|s| s.category).collect();
        assert_eq!(
            cats,
            vec![
                Category::Cold,
                Category::Hot,
                Category::Medium,
                Category::Medium
            ]
        );
    }

    #[test]
    fn float_category_codes_are_accepted_when_integral() {
        let text = concat!(
            "{\"category\":0.0}\n",
            "{\"category\":2.0}\n",
            "{\"category\":0}\n",
            "{\"category\":1.5}\n",
        );
        let cats: Vec<_> = parse_samples(text).into_iter().map(|s| s.category).collect();
        assert_eq!(
            cats,
            vec![
                Category::Hot,
                Category::Cold,
                Category::Hot,
                Category::Medium
            ]
        );
    }

    #[test]
    fn test_samples_decode_pascal_case() {
        let text = r#"{"TestName":"Login.Works","RunId":"r1","Outcome":"Failed","SucceededOnRetry":true,"ErrorKey":"timeout","ErrorSummary":"Timed out after 30s","TimestampUtc":"2024-01-01T00:00:00Z"}"#;
        let tests = parse_test_samples(text);
        assert_eq!(tests.len(), 1);
        let t = &tests[0];
        assert_eq!(t.test_name, "Login.Works");
        assert_eq!(t.outcome, Outcome::Failed);
        assert!(t.succeeded_on_retry);
        assert_eq!(t.error_key.as_deref(), Some("timeout"));
        assert!(t.timestamp_utc.is_valid());
    }

    #[test]
    fn blank_error_fields_are_absent() {
        let text = r#"{"testName":"a","outcome":"Failed","errorKey":"  ","errorSummary":"boom"}"#;
        let t = &parse_test_samples(text)[0];
        assert_eq!(t.error_key, None);
        assert_eq!(t.error_summary.as_deref(), Some("boom"));
    }
}
