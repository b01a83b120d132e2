//! Typed records produced by the normalizer.
//!
//! Both record kinds are immutable once parsed. Enumerations are closed and
//! every normalizer is total: unrecognized input maps to a defined default.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A parsed instant. `Timestamp(None)` is the invalid instant: it compares equal
/// to itself and sorts before every valid instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timestamp(pub Option<DateTime<Utc>>);

impl Timestamp {
    pub const INVALID: Timestamp = Timestamp(None);

    pub fn new(at: DateTime<Utc>) -> Self {
        Self(Some(at))
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// Epoch milliseconds, `None` for the invalid instant.
    pub fn epoch_ms(&self) -> Option<i64> {
        self.0.map(|t| t.timestamp_millis())
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        self.0.as_ref()
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(t) => write!(f, "{}", t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
            None => f.write_str("invalid"),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(t) => s.serialize_str(&t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
            None => s.serialize_none(),
        }
    }
}

/// Cache temperature of a performance measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Hot,
    #[default]
    Medium,
    Cold,
}

impl Category {
    /// Numeric codes follow the producer's enum order: 0 hot, 1 medium, 2 cold.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Hot,
            2 => Self::Cold,
            _ => Self::Medium,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" | "0" => Self::Hot,
            "cold" | "2" => Self::Cold,
            _ => Self::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Medium => "medium",
            Self::Cold => "cold",
        }
    }
}

/// Outcome of one test execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Outcome {
    Passed,
    Failed,
    /// Anything else, including a missing outcome. Counted as skipped.
    #[default]
    #[serde(rename = "Skipped")]
    Other,
}

impl Outcome {
    /// Exact match only: "passed" or "PASSED" are `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "Passed" => Self::Passed,
            "Failed" => Self::Failed,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Other => "Skipped",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One performance measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub scenario: String,
    pub metric: String,
    pub category: Category,
    pub duration_ms: f64,
    pub status: String,
    pub run_id: String,
    pub branch: String,
    pub commit: String,
    pub timestamp_utc: Timestamp,
}

impl Sample {
    /// True when the recorded status is `passed`, compared case-insensitively.
    pub fn is_passed(&self) -> bool {
        self.status.eq_ignore_ascii_case("passed")
    }
}

/// One test execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSample {
    pub test_name: String,
    pub run_id: String,
    pub outcome: Outcome,
    pub succeeded_on_retry: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_summary: Option<String>,
    pub timestamp_utc: Timestamp,
}
