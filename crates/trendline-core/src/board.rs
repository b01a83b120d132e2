//! Loading both streams into boards, independently.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::clusters::{cluster_errors, ErrorCluster};
use crate::config::BoardConfig;
use crate::errors::{LoadError, Stream};
use crate::model::{Sample, TestSample};
use crate::normalize::{parse_samples, parse_test_samples};
use crate::outcomes::{summarize_runs, summarize_tests, RunSummary, TestIdentitySummary};
use crate::overview::{overview, Overview};
use crate::perf::{aggregate, MetricGroup};
use crate::source::RecordSource;

/// Content hash of a fetched batch, so callers can skip identical refreshes.
pub fn batch_fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerfBoard {
    pub source: String,
    pub fingerprint: String,
    #[serde(skip)]
    pub samples: Vec<Sample>,
    pub overview: Overview,
    pub groups: Vec<MetricGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestBoard {
    pub source: String,
    pub fingerprint: String,
    #[serde(skip)]
    pub samples: Vec<TestSample>,
    pub identities: Vec<TestIdentitySummary>,
    pub clusters: Vec<ErrorCluster>,
}

pub fn build_perf_board(
    text: &str,
    source: &str,
    cfg: &BoardConfig,
) -> Result<PerfBoard, LoadError> {
    let samples = parse_samples(text);
    if samples.is_empty() {
        return Err(LoadError::SourceEmpty {
            stream: Stream::Performance,
            source_name: source.to_string(),
        });
    }
    let groups = aggregate(&samples, &cfg.perf_options());
    Ok(PerfBoard {
        source: source.to_string(),
        fingerprint: batch_fingerprint(text),
        overview: overview(&samples, &groups),
        samples,
        groups,
    })
}

pub fn build_test_board(
    text: &str,
    source: &str,
    cfg: &BoardConfig,
) -> Result<TestBoard, LoadError> {
    let samples = parse_test_samples(text);
    if samples.is_empty() {
        return Err(LoadError::SourceEmpty {
            stream: Stream::Tests,
            source_name: source.to_string(),
        });
    }
    Ok(TestBoard {
        source: source.to_string(),
        fingerprint: batch_fingerprint(text),
        identities: summarize_tests(&samples),
        clusters: cluster_errors(&samples, cfg.cluster_limit),
        samples,
    })
}

async fn fetch(source: &dyn RecordSource, stream: Stream) -> Result<String, LoadError> {
    source
        .fetch_text()
        .await
        .map_err(|e| LoadError::SourceUnavailable {
            stream,
            source_name: source.describe(),
            message: format!("{e:#}"),
        })
}

fn logged<T>(result: Result<T, LoadError>) -> Result<T, LoadError> {
    if let Err(e) = &result {
        tracing::warn!(stream = %e.stream(), error = %e, "stream failed to load");
    }
    result
}

pub async fn load_perf_board(
    source: &dyn RecordSource,
    cfg: &BoardConfig,
) -> Result<PerfBoard, LoadError> {
    let result = match fetch(source, Stream::Performance).await {
        Ok(text) => build_perf_board(&text, &source.describe(), cfg),
        Err(e) => Err(e),
    };
    logged(result)
}

pub async fn load_test_board(
    source: &dyn RecordSource,
    cfg: &BoardConfig,
) -> Result<TestBoard, LoadError> {
    let result = match fetch(source, Stream::Tests).await {
        Ok(text) => build_test_board(&text, &source.describe(), cfg),
        Err(e) => Err(e),
    };
    logged(result)
}

/// Outcome of one refresh. Each stream succeeds or fails on its own.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub perf: Result<PerfBoard, LoadError>,
    pub tests: Result<TestBoard, LoadError>,
}

impl Snapshot {
    /// Run history. Performance samples, when present, supply each run's
    /// branch and commit and can downgrade its status.
    pub fn runs(&self) -> Result<Vec<RunSummary>, &LoadError> {
        let tests = self.tests.as_ref()?;
        Ok(summarize_runs(&tests.samples, self.perf_samples()))
    }

    /// Performance samples, empty when that stream failed.
    pub fn perf_samples(&self) -> &[Sample] {
        self.perf
            .as_ref()
            .map(|p| p.samples.as_slice())
            .unwrap_or(&[])
    }

    pub fn failures(&self) -> Vec<&LoadError> {
        [self.perf.as_ref().err(), self.tests.as_ref().err()]
            .into_iter()
            .flatten()
            .collect()
    }

    pub fn all_failed(&self) -> bool {
        self.perf.is_err() && self.tests.is_err()
    }
}

/// Load both streams concurrently.
pub async fn refresh(
    perf: &dyn RecordSource,
    tests: &dyn RecordSource,
    cfg: &BoardConfig,
) -> Snapshot {
    let (perf, tests) = tokio::join!(load_perf_board(perf, cfg), load_test_board(tests, cfg));
    tracing::info!(
        perf_groups = perf.as_ref().map(|b| b.groups.len()).unwrap_or(0),
        test_identities = tests.as_ref().map(|b| b.identities.len()).unwrap_or(0),
        failed_streams = perf.is_err() as usize + tests.is_err() as usize,
        "refresh complete"
    );
    Snapshot { perf, tests }
}
