//! Headline numbers for the performance board.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::model::{Sample, Timestamp};
use crate::perf::MetricGroup;
use crate::stats;

const UNKNOWN: &str = "unknown";
const SHORT_COMMIT_LEN: usize = 7;

/// Card describing the chronologically latest run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestRun {
    pub run_id: String,
    pub branch: String,
    pub commit: String,
    pub status: String,
    pub timestamp: Timestamp,
    /// Nearest-rank p50 of every duration recorded for this run.
    pub p50: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub sample_count: usize,
    pub group_count: usize,
    pub run_count: usize,
    /// Whole-number percentage of samples whose status is `passed`.
    pub success_rate: u32,
    pub latest_run: Option<LatestRun>,
}

fn or_unknown(s: &str) -> String {
    if s.is_empty() {
        UNKNOWN.to_string()
    } else {
        s.to_string()
    }
}

fn short_commit(commit: &str) -> String {
    if commit.is_empty() {
        return UNKNOWN.to_string();
    }
    commit.chars().take(SHORT_COMMIT_LEN).collect()
}

fn latest_run(samples: &[Sample]) -> Option<LatestRun> {
    // later-or-equal: the last of several equally recent samples wins
    let latest = samples
        .iter()
        .reduce(|best, s| if s.timestamp_utc >= best.timestamp_utc { s } else { best })?;
    let mut durations: Vec<f64> = samples
        .iter()
        .filter(|s| s.run_id == latest.run_id)
        .map(|s| s.duration_ms)
        .collect();
    durations.sort_by(|a, b| a.total_cmp(b));
    Some(LatestRun {
        run_id: latest.run_id.clone(),
        branch: or_unknown(&latest.branch),
        commit: short_commit(&latest.commit),
        status: or_unknown(&latest.status),
        timestamp: latest.timestamp_utc,
        p50: stats::percentile(&durations, 50.0),
    })
}

pub fn overview(samples: &[Sample], groups: &[MetricGroup]) -> Overview {
    let runs: BTreeSet<&str> = samples.iter().map(|s| s.run_id.as_str()).collect();
    let passed = samples.iter().filter(|s| s.is_passed()).count();
    let success_rate = if samples.is_empty() {
        0
    } else {
        (passed as f64 * 100.0 / samples.len() as f64).round() as u32
    };
    Overview {
        sample_count: samples.len(),
        group_count: groups.len(),
        run_count: runs.len(),
        success_rate,
        latest_run: latest_run(samples),
    }
}
