//! Sort specifications for the metric, flaky-test and error-cluster tables.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::collate::{locale_cmp, numeric_cmp};
use crate::clusters::ErrorCluster;
use crate::outcomes::TestIdentitySummary;
use crate::perf::MetricGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }
}

/// A sortable column.
pub trait ColumnKey: Copy + Eq {
    /// Whether the column holds text. Text columns start ascending, magnitude
    /// columns start descending.
    fn is_text(self) -> bool;

    fn default_direction(self) -> SortDirection {
        if self.is_text() {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

/// A (key, direction) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sort<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: ColumnKey> Sort<K> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            direction: key.default_direction(),
        }
    }

    pub fn with_direction(key: K, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Same key flips the direction; a new key starts at its default.
    pub fn toggled(self, key: K) -> Self {
        if key == self.key {
            Self {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            Self::new(key)
        }
    }
}

impl<K: ColumnKey + Default> Default for Sort<K> {
    fn default() -> Self {
        Self::new(K::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortKey(pub String);

impl fmt::Display for UnknownSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort key '{}'", self.0)
    }
}

impl std::error::Error for UnknownSortKey {}

macro_rules! column_names {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = UnknownSortKey;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(UnknownSortKey(other.to_string())),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Metric table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Scenario,
    Metric,
    Average,
    P50,
    P95,
    StdDev,
    Max,
    Samples,
    Delta,
    Trend,
    #[default]
    Last,
}

column_names!(SortKey {
    Scenario => "scenario",
    Metric => "metric",
    Average => "average",
    P50 => "p50",
    P95 => "p95",
    StdDev => "std_dev",
    Max => "max",
    Samples => "samples",
    Delta => "delta",
    Trend => "trend",
    Last => "last",
});

impl ColumnKey for SortKey {
    fn is_text(self) -> bool {
        matches!(self, Self::Scenario | Self::Metric)
    }
}

impl SortKey {
    fn number(self, g: &MetricGroup) -> Option<f64> {
        match self {
            Self::Scenario | Self::Metric => None,
            Self::Average => Some(g.average),
            Self::P50 => Some(g.p50),
            Self::P95 => Some(g.p95),
            Self::StdDev => Some(g.std_dev),
            Self::Max => Some(g.max),
            Self::Samples => Some(g.sample_count() as f64),
            Self::Delta => g.delta,
            Self::Trend => g.trend_slope,
            Self::Last => Some(g.last_duration()),
        }
    }

    pub fn compare(self, a: &MetricGroup, b: &MetricGroup) -> Ordering {
        match self {
            Self::Scenario => locale_cmp(&a.label, &b.label)
                .then_with(|| locale_cmp(&a.scenario, &b.scenario)),
            Self::Metric => locale_cmp(&a.metric, &b.metric),
            _ => numeric_cmp(self.number(a), self.number(b)),
        }
    }
}

pub type SortSpec = Sort<SortKey>;

/// Flaky-test table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlakySortKey {
    Name,
    Total,
    Passed,
    #[default]
    Failed,
    RetrySaved,
    PassRate,
    LastSeen,
}

column_names!(FlakySortKey {
    Name => "name",
    Total => "total",
    Passed => "passed",
    Failed => "failed",
    RetrySaved => "retry_saved",
    PassRate => "pass_rate",
    LastSeen => "last_seen",
});

impl ColumnKey for FlakySortKey {
    fn is_text(self) -> bool {
        matches!(self, Self::Name)
    }
}

impl FlakySortKey {
    pub fn compare(self, a: &TestIdentitySummary, b: &TestIdentitySummary) -> Ordering {
        match self {
            Self::Name => locale_cmp(&a.test_name, &b.test_name),
            Self::Total => a.counts.total.cmp(&b.counts.total),
            Self::Passed => a.counts.passed.cmp(&b.counts.passed),
            Self::Failed => a.counts.failed.cmp(&b.counts.failed),
            Self::RetrySaved => a.counts.retry_saved.cmp(&b.counts.retry_saved),
            Self::PassRate => a.pass_rate.total_cmp(&b.pass_rate),
            Self::LastSeen => a.last_seen.cmp(&b.last_seen),
        }
    }
}

pub type FlakySort = Sort<FlakySortKey>;

/// Error-cluster table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterSortKey {
    Error,
    #[default]
    Count,
    Test,
}

column_names!(ClusterSortKey {
    Error => "error",
    Count => "count",
    Test => "test",
});

impl ColumnKey for ClusterSortKey {
    fn is_text(self) -> bool {
        !matches!(self, Self::Count)
    }
}

impl ClusterSortKey {
    pub fn compare(self, a: &ErrorCluster, b: &ErrorCluster) -> Ordering {
        match self {
            Self::Error => locale_cmp(&a.summary, &b.summary)
                .then_with(|| locale_cmp(&a.error_key, &b.error_key)),
            Self::Count => a.count.cmp(&b.count),
            Self::Test => locale_cmp(&a.latest_test, &b.latest_test),
        }
    }
}

pub type ClusterSort = Sort<ClusterSortKey>;

pub fn sort_groups(groups: &mut [&MetricGroup], sort: &SortSpec) {
    groups.sort_by(|a, b| sort.direction.apply(sort.key.compare(a, b)));
}

pub fn sort_flaky(rows: &mut [TestIdentitySummary], sort: &FlakySort) {
    rows.sort_by(|a, b| sort.direction.apply(sort.key.compare(a, b)));
}

/// Reorder clusters for display without recomputing them.
pub fn sort_clusters(rows: &mut [ErrorCluster], sort: &ClusterSort) {
    rows.sort_by(|a, b| sort.direction.apply(sort.key.compare(a, b)));
}
