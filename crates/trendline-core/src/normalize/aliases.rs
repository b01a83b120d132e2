//! Field-alias table for the two casing conventions producers emit.
//!
//! Lookups walk the spellings in order and take the first one present, so
//! camelCase wins when a line carries both.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Scenario,
    Metric,
    Category,
    DurationMs,
    Status,
    RunId,
    Branch,
    Commit,
    TimestampUtc,
    TestName,
    Outcome,
    SucceededOnRetry,
    ErrorKey,
    ErrorSummary,
}

impl Field {
    pub fn spellings(self) -> &'static [&'static str] {
        match self {
            Self::Scenario => &["scenario", "Scenario"],
            Self::Metric => &["metric", "Metric"],
            Self::Category => &["category", "Category"],
            Self::DurationMs => &["durationMs", "DurationMs"],
            Self::Status => &["status", "Status"],
            Self::RunId => &["runId", "RunId"],
            Self::Branch => &["branch", "Branch"],
            Self::Commit => &["commit", "Commit"],
            Self::TimestampUtc => &["timestampUtc", "TimestampUtc"],
            Self::TestName => &["testName", "TestName"],
            Self::Outcome => &["outcome", "Outcome"],
            Self::SucceededOnRetry => &["succeededOnRetry", "SucceededOnRetry"],
            Self::ErrorKey => &["errorKey", "ErrorKey"],
            Self::ErrorSummary => &["errorSummary", "ErrorSummary"],
        }
    }
}

/// First present, non-null value for `field`.
pub fn lookup(obj: &Map<String, Value>, field: Field) -> Option<&Value> {
    field
        .spellings()
        .iter()
        .filter_map(|name| obj.get(*name))
        .find(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn prefers_camel_case_when_both_present() {
        let o = obj(json!({"DurationMs": 5, "durationMs": 7}));
        assert_eq!(lookup(&o, Field::DurationMs), Some(&json!(7)));
    }

    #[test]
    fn falls_back_to_pascal_case() {
        let o = obj(json!({"RunId": "r9"}));
        assert_eq!(lookup(&o, Field::RunId), Some(&json!("r9")));
    }

    #[test]
    fn null_counts_as_absent() {
        let o = obj(json!({"durationMs": null, "DurationMs": 3}));
        assert_eq!(lookup(&o, Field::DurationMs), Some(&json!(3)));
        assert_eq!(lookup(&o, Field::Metric), None);
    }
}
