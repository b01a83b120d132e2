//! Performance aggregator: samples into per-(scenario, metric) groups.

pub mod label;
pub mod palette;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::BoardConfig;
use crate::model::{Category, Sample};
use crate::stats;

pub use label::scenario_label;
pub use palette::color_for_key;

/// Scenario key shared by every sample of a merged metric.
pub const MERGED_SCENARIO_KEY: &str = "*";

/// Display scenario for merged groups.
pub const MERGED_SCENARIO_LABEL: &str = "All scenarios";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfOptions {
    pub merged_metrics: Vec<String>,
}

impl Default for PerfOptions {
    fn default() -> Self {
        BoardConfig::default().perf_options()
    }
}

impl BoardConfig {
    pub fn perf_options(&self) -> PerfOptions {
        PerfOptions {
            merged_metrics: self.merged_metrics.clone(),
        }
    }
}

impl PerfOptions {
    fn is_merged(&self, metric: &str) -> bool {
        self.merged_metrics.iter().any(|m| m == metric)
    }

    /// Scenario part of the group key for a sample.
    pub fn scenario_key<'a>(&self, sample: &'a Sample) -> &'a str {
        if self.is_merged(&sample.metric) {
            MERGED_SCENARIO_KEY
        } else {
            &sample.scenario
        }
    }

    pub fn group_key(&self, sample: &Sample) -> String {
        format!("{}::{}", self.scenario_key(sample), sample.metric)
    }
}

/// All samples sharing one group key, with their summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricGroup {
    pub key: String,
    pub scenario: String,
    pub label: String,
    pub metric: String,
    pub category: Category,
    /// Time-ordered.
    pub samples: Vec<Sample>,
    /// Value-ordered; only used for percentile lookups.
    #[serde(skip)]
    pub durations: Vec<f64>,
    pub last: Sample,
    pub p50: f64,
    pub p95: f64,
    pub average: f64,
    pub std_dev: f64,
    pub max: f64,
    pub delta: Option<f64>,
    pub trend_slope: Option<f64>,
    pub color: &'static str,
}

impl MetricGroup {
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn last_duration(&self) -> f64 {
        self.last.duration_ms
    }

    pub fn is_merged(&self) -> bool {
        self.key.starts_with(&format!("{MERGED_SCENARIO_KEY}::"))
    }

    /// `"<label> / <metric>"`, as shown in selectors and chart titles.
    pub fn title(&self) -> String {
        format!("{} / {}", self.label, self.metric)
    }

    fn build(key: String, mut samples: Vec<Sample>, merged: bool) -> Option<Self> {
        // stable: equal timestamps keep file order
        samples.sort_by(|a, b| a.timestamp_utc.cmp(&b.timestamp_utc));
        let last = samples.last()?.clone();

        let by_time: Vec<f64> = samples.iter().map(|s| s.duration_ms).collect();
        let mut durations = by_time.clone();
        durations.sort_by(|a, b| a.total_cmp(b));

        let delta = match by_time.as_slice() {
            [.., prev, cur] => Some(cur - prev),
            _ => None,
        };

        let (scenario, label) = if merged {
            (
                MERGED_SCENARIO_LABEL.to_string(),
                MERGED_SCENARIO_LABEL.to_string(),
            )
        } else {
            (last.scenario.clone(), scenario_label(&last.scenario))
        };

        Some(Self {
            color: color_for_key(&key),
            scenario,
            label,
            metric: last.metric.clone(),
            category: last.category,
            p50: stats::percentile(&durations, 50.0),
            p95: stats::percentile(&durations, 95.0),
            average: stats::average(&by_time),
            std_dev: stats::std_dev(&by_time),
            max: stats::max_sorted(&durations),
            trend_slope: stats::trend_slope(&by_time),
            delta,
            key,
            durations,
            last,
            samples,
        })
    }
}

/// Group and summarize a batch. Output is ordered by key, one group per key.
pub fn aggregate(samples: &[Sample], opts: &PerfOptions) -> Vec<MetricGroup> {
    let mut buckets: BTreeMap<String, (bool, Vec<Sample>)> = BTreeMap::new();
    for s in samples {
        let merged = opts.is_merged(&s.metric);
        buckets
            .entry(opts.group_key(s))
            .or_insert_with(|| (merged, Vec::new()))
            .1
            .push(s.clone());
    }

    let groups: Vec<MetricGroup> = buckets
        .into_iter()
        .filter_map(|(key, (merged, samples))| MetricGroup::build(key, samples, merged))
        .collect();
    tracing::debug!(
        samples = samples.len(),
        groups = groups.len(),
        "aggregated performance samples"
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Timestamp;
    use chrono::{TimeZone, Utc};

    fn sample(scenario: &str, metric: &str, ms: f64, run: &str, secs: i64) -> Sample {
        Sample {
            scenario: scenario.into(),
            metric: metric.into(),
            category: Category::Medium,
            duration_ms: ms,
            status: "Passed".into(),
            run_id: run.into(),
            branch: "main".into(),
            commit: "abcdef1234".into(),
            timestamp_utc: Timestamp::new(Utc.timestamp_opt(secs, 0).unwrap()),
        }
    }

    #[test]
    fn login_submit_summary() {
        let batch = vec![
            sample("Login", "submit", 100.0, "r1", 1),
            sample("Login", "submit", 300.0, "r2", 2),
            sample("Login", "submit", 200.0, "r3", 3),
        ];
        let groups = aggregate(&batch, &PerfOptions::default());
        assert_eq!(groups.len(), 1);
        let g = &groups[0];
        assert_eq!(g.key, "Login::submit");
        assert_eq!(g.durations, vec![100.0, 200.0, 300.0]);
        assert_eq!(g.p50, 200.0);
        assert_eq!(g.max, 300.0);
        assert_eq!(g.delta, Some(-100.0));
        assert_eq!(g.average, 200.0);
        assert_eq!(g.last.run_id, "r3");
        assert_eq!(g.trend_slope, Some(50.0));
    }

    #[test]
    fn samples_are_time_ordered() {
        let batch = vec![
            sample("A", "m", 3.0, "r3", 30),
            sample("A", "m", 1.0, "r1", 10),
            sample("A", "m", 2.0, "r2", 20),
        ];
        let g = &aggregate(&batch, &PerfOptions::default())[0];
        let runs: Vec<_> = g.samples.iter().map(|s| s.run_id.as_str()).collect();
        assert_eq!(runs, vec!["r1", "r2", "r3"]);
        assert_eq!(g.delta, Some(1.0));
    }

    #[test]
    fn undated_samples_lead_the_series() {
        let undated = |ms: f64, run: &str| Sample {
            timestamp_utc: Timestamp::INVALID,
            ..sample("A", "m", ms, run, 0)
        };
        let batch = vec![
            sample("A", "m", 40.0, "r2", 20),
            undated(500.0, "x1"),
            sample("A", "m", 10.0, "r1", 10),
            undated(700.0, "x2"),
        ];
        let g = &aggregate(&batch, &PerfOptions::default())[0];
        let runs: Vec<_> = g.samples.iter().map(|s| s.run_id.as_str()).collect();
        assert_eq!(runs, vec!["x1", "x2", "r1", "r2"]);
        assert_eq!(g.last.run_id, "r2");
        assert_eq!(g.last_duration(), 40.0);
        assert_eq!(g.delta, Some(30.0));
        assert_eq!(g.sample_count(), 4);
        assert_eq!(g.max, 700.0);
    }

    #[test]
    fn singleton_has_no_delta_or_slope() {
        let g = &aggregate(&[sample("A", "m", 9.0, "r1", 1)], &PerfOptions::default())[0];
        assert_eq!(g.delta, None);
        assert_eq!(g.trend_slope, None);
        assert_eq!(g.std_dev, 0.0);
        assert_eq!(g.p95, 9.0);
    }

    #[test]
    fn launch_metric_merges_across_scenarios() {
        let batch = vec![
            sample("Login", "app.launch", 900.0, "r1", 1),
            sample("Cart", "app.launch", 1100.0, "r1", 2),
            sample("Login", "submit", 10.0, "r1", 3),
            sample("Cart", "submit", 20.0, "r1", 4),
        ];
        let groups = aggregate(&batch, &PerfOptions::default());
        let keys: Vec<_> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["*::app.launch", "Cart::submit", "Login::submit"]);
        let launch = &groups[0];
        assert_eq!(launch.sample_count(), 2);
        assert!(launch.is_merged());
        assert_eq!(launch.scenario, MERGED_SCENARIO_LABEL);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let batch = vec![
            sample("A", "m", 3.0, "r3", 30),
            sample("B", "m", 1.0, "r1", 10),
            sample("A", "app.launch", 2.0, "r2", 20),
        ];
        let opts = PerfOptions::default();
        assert_eq!(aggregate(&batch, &opts), aggregate(&batch, &opts));
    }

    #[test]
    fn category_comes_from_last_sample() {
        let mut early = sample("A", "m", 1.0, "r1", 1);
        early.category = Category::Cold;
        let mut late = sample("A", "m", 1.0, "r2", 2);
        late.category = Category::Hot;
        let g = &aggregate(&[late, early], &PerfOptions::default())[0];
        assert_eq!(g.category, Category::Hot);
    }
}
