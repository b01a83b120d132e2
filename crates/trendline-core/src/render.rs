//! Presentation seam between the engine and whatever draws the board.

use crate::board::Snapshot;
use crate::chart::{chart_series, ChartSeries};
use crate::clusters::ErrorCluster;
use crate::config::BoardConfig;
use crate::errors::LoadError;
use crate::outcomes::{flaky_candidates, summarize_runs, RunSummary, TestIdentitySummary};
use crate::overview::Overview;
use crate::view::{chart_keys, query, rank_flaky, sort_clusters, GroupView, ViewState};

/// Receives ready-to-draw structures. Implementations hold no engine state.
pub trait Renderer {
    fn render_summary(&mut self, overview: &Overview);
    fn render_groups(&mut self, view: &GroupView<'_>);
    fn render_trend_charts(&mut self, series: &[ChartSeries]);
    fn render_run_history(&mut self, runs: &[RunSummary]);
    fn render_flaky_tests(&mut self, rows: &[TestIdentitySummary]);
    fn render_error_clusters(&mut self, rows: &[ErrorCluster]);
    /// Called once per stream that failed to load.
    fn render_failure(&mut self, error: &LoadError);
}

/// Drive `renderer` through every section of the board.
///
/// A failed stream yields one `render_failure` call and the other stream's
/// sections are still rendered.
pub fn present(
    snapshot: &Snapshot,
    state: &ViewState,
    cfg: &BoardConfig,
    renderer: &mut dyn Renderer,
) {
    match &snapshot.perf {
        Ok(board) => {
            renderer.render_summary(&board.overview);
            let view = query(&board.groups, state);
            renderer.render_groups(&view);
            let charted = chart_keys(&view, &board.groups, state);
            renderer.render_trend_charts(&chart_series(&charted, state.window));
        }
        Err(e) => renderer.render_failure(e),
    }

    match &snapshot.tests {
        Ok(board) => {
            let runs = summarize_runs(&board.samples, snapshot.perf_samples());
            renderer.render_run_history(&runs);
            let flaky = rank_flaky(
                flaky_candidates(&board.identities),
                &state.flaky_sort,
                cfg.flaky_limit,
            );
            renderer.render_flaky_tests(&flaky);
            let mut clusters = board.clusters.clone();
            sort_clusters(&mut clusters, &state.cluster_sort);
            renderer.render_error_clusters(&clusters);
        }
        Err(e) => renderer.render_failure(e),
    }
}
