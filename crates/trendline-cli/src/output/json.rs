use serde::Serialize;
use serde_json::{Map, Value};
use trendline_core::chart::ChartSeries;
use trendline_core::clusters::ErrorCluster;
use trendline_core::outcomes::{RunSummary, TestIdentitySummary};
use trendline_core::overview::Overview;
use trendline_core::view::GroupView;
use trendline_core::{LoadError, Renderer, Stream};

use super::Output;

#[derive(Serialize)]
struct Failure {
    stream: Stream,
    empty: bool,
    message: String,
}

/// Collects sections into one JSON object keyed by section name.
#[derive(Default)]
pub struct JsonRenderer {
    doc: Map<String, Value>,
    failures: Vec<Failure>,
    error: Option<serde_json::Error>,
}

impl JsonRenderer {
    fn put<T: Serialize + ?Sized>(&mut self, section: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(v) => {
                self.doc.insert(section.to_string(), v);
            }
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
    }
}

impl Renderer for JsonRenderer {
    fn render_summary(&mut self, overview: &Overview) {
        self.put("summary", overview);
    }

    fn render_groups(&mut self, view: &GroupView<'_>) {
        self.put("metrics", view);
    }

    fn render_trend_charts(&mut self, series: &[ChartSeries]) {
        self.put("charts", series);
    }

    fn render_run_history(&mut self, runs: &[RunSummary]) {
        self.put("runs", runs);
    }

    fn render_flaky_tests(&mut self, rows: &[TestIdentitySummary]) {
        self.put("flaky", rows);
    }

    fn render_error_clusters(&mut self, rows: &[ErrorCluster]) {
        self.put("errors", rows);
    }

    fn render_failure(&mut self, error: &LoadError) {
        self.failures.push(Failure {
            stream: error.stream(),
            empty: error.is_empty_source(),
            message: error.to_string(),
        });
    }
}

impl Output for JsonRenderer {
    fn as_renderer(&mut self) -> &mut dyn Renderer {
        self
    }

    fn finish(mut self: Box<Self>) -> anyhow::Result<String> {
        if let Some(e) = self.error.take() {
            return Err(e.into());
        }
        let failures = std::mem::take(&mut self.failures);
        self.put("failures", &failures);
        Ok(serde_json::to_string_pretty(&self.doc)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_always_present() {
        let out = Box::new(JsonRenderer::default()).finish().unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["failures"], serde_json::json!([]));
    }

    #[test]
    fn failure_entries_name_the_stream() {
        let mut r = JsonRenderer::default();
        r.render_failure(&LoadError::SourceEmpty {
            stream: Stream::Tests,
            source_name: "t.ndjson".into(),
        });
        let v: Value = serde_json::from_str(&Box::new(r).finish().unwrap()).unwrap();
        assert_eq!(v["failures"][0]["stream"], "tests");
        assert_eq!(v["failures"][0]["empty"], true);
    }
}
