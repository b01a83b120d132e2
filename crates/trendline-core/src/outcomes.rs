//! Test outcome aggregator: per-run and per-test counters, flaky candidates.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::model::{Outcome, Sample, TestSample, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OutcomeCounts {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub retry_saved: usize,
}

impl OutcomeCounts {
    fn record(&mut self, t: &TestSample) {
        self.total += 1;
        match t.outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Other => self.skipped += 1,
        }
        if t.succeeded_on_retry {
            self.retry_saved += 1;
        }
    }

    /// `passed / total`, 0 when there were no executions.
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    Succeeded,
    FinishedWithWarnings,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Succeeded => "Succeeded",
            Self::FinishedWithWarnings => "Finished with warnings",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    #[serde(flatten)]
    pub counts: OutcomeCounts,
    pub latest: Timestamp,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestIdentitySummary {
    pub test_name: String,
    #[serde(flatten)]
    pub counts: OutcomeCounts,
    pub last_outcome: Outcome,
    pub last_seen: Timestamp,
    pub pass_rate: f64,
}

impl TestIdentitySummary {
    /// At least one failure or one retry-induced success.
    pub fn is_flaky(&self) -> bool {
        self.counts.failed > 0 || self.counts.retry_saved > 0
    }
}

struct RunAcc {
    counts: OutcomeCounts,
    latest: Timestamp,
}

/// Per-run counters, ordered by latest timestamp ascending.
///
/// `perf` contributes status, branch and commit for the same run ids; pass an
/// empty slice when the performance stream is unavailable.
pub fn summarize_runs(tests: &[TestSample], perf: &[Sample]) -> Vec<RunSummary> {
    let mut runs: BTreeMap<&str, RunAcc> = BTreeMap::new();
    for t in tests {
        let acc = runs.entry(t.run_id.as_str()).or_insert_with(|| RunAcc {
            counts: OutcomeCounts::default(),
            latest: t.timestamp_utc,
        });
        acc.counts.record(t);
        if t.timestamp_utc > acc.latest {
            acc.latest = t.timestamp_utc;
        }
    }

    let mut perf_by_run: HashMap<&str, Vec<&Sample>> = HashMap::new();
    for s in perf {
        perf_by_run.entry(s.run_id.as_str()).or_default().push(s);
    }

    let mut out: Vec<RunSummary> = runs
        .into_iter()
        .map(|(run_id, acc)| {
            let run_perf = perf_by_run.get(run_id).map(Vec::as_slice).unwrap_or(&[]);
            let perf_warning = run_perf
                .iter()
                .any(|s| !s.status.is_empty() && !s.is_passed());
            let status = if acc.counts.failed == 0 && !perf_warning {
                RunStatus::Succeeded
            } else {
                RunStatus::FinishedWithWarnings
            };
            let newest = run_perf.iter().max_by_key(|s| s.timestamp_utc);
            RunSummary {
                run_id: run_id.to_string(),
                counts: acc.counts,
                latest: acc.latest,
                status,
                branch: newest.map(|s| s.branch.clone()).filter(|b| !b.is_empty()),
                commit: newest.map(|s| s.commit.clone()).filter(|c| !c.is_empty()),
            }
        })
        .collect();
    out.sort_by(|a, b| a.latest.cmp(&b.latest));
    out
}

struct TestAcc {
    counts: OutcomeCounts,
    last_outcome: Outcome,
    last_seen: Timestamp,
}

/// Per-test counters, ordered by test name.
///
/// The last outcome follows a later-or-equal rule: among samples with the same
/// timestamp, the one processed last wins.
pub fn summarize_tests(tests: &[TestSample]) -> Vec<TestIdentitySummary> {
    let mut ids: BTreeMap<&str, TestAcc> = BTreeMap::new();
    for t in tests {
        let acc = ids.entry(t.test_name.as_str()).or_insert_with(|| TestAcc {
            counts: OutcomeCounts::default(),
            last_outcome: t.outcome,
            last_seen: t.timestamp_utc,
        });
        acc.counts.record(t);
        if t.timestamp_utc >= acc.last_seen {
            acc.last_seen = t.timestamp_utc;
            acc.last_outcome = t.outcome;
        }
    }
    ids.into_iter()
        .map(|(name, acc)| TestIdentitySummary {
            test_name: name.to_string(),
            pass_rate: acc.counts.pass_rate(),
            counts: acc.counts,
            last_outcome: acc.last_outcome,
            last_seen: acc.last_seen,
        })
        .collect()
}

/// Identities with at least one failure or retry-saved run, in input order.
/// Ranking and truncation belong to [`crate::view::rank_flaky`].
pub fn flaky_candidates(identities: &[TestIdentitySummary]) -> Vec<TestIdentitySummary> {
    identities.iter().filter(|i| i.is_flaky()).cloned().collect()
}
