//! Error clusterer: failures grouped by their error signature.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{TestSample, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorCluster {
    pub error_key: String,
    /// Summary text of the most recent occurrence.
    pub summary: String,
    pub count: usize,
    pub latest_test: String,
    pub latest_seen: Timestamp,
}

/// Cluster samples carrying both an error key and a summary.
///
/// Ranked by count descending (ties by key) and truncated to `limit`.
pub fn cluster_errors(tests: &[TestSample], limit: usize) -> Vec<ErrorCluster> {
    let mut clusters: BTreeMap<&str, ErrorCluster> = BTreeMap::new();
    let mut excluded = 0usize;
    for t in tests {
        let (Some(key), Some(summary)) = (t.error_key.as_deref(), t.error_summary.as_deref())
        else {
            excluded += 1;
            continue;
        };
        let c = clusters.entry(key).or_insert_with(|| ErrorCluster {
            error_key: key.to_string(),
            summary: summary.to_string(),
            count: 0,
            latest_test: t.test_name.clone(),
            latest_seen: t.timestamp_utc,
        });
        c.count += 1;
        if t.timestamp_utc >= c.latest_seen {
            c.latest_seen = t.timestamp_utc;
            c.latest_test = t.test_name.clone();
            c.summary = summary.to_string();
        }
    }

    let mut out: Vec<ErrorCluster> = clusters.into_values().collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    tracing::debug!(
        clusters = out.len(),
        excluded,
        limit,
        "clustered error signatures"
    );
    out.truncate(limit);
    out
}
