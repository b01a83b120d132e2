//! View query engine.
//!
//! Everything here is a pure function of already-aggregated groups and an
//! immutable [`ViewState`]. Interactions return a new state instead of
//! mutating shared fields, so filter/sort/selection logic is testable without
//! any UI.

mod collate;
mod sort;

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::chart::{self, ChartSeries, Frame};
use crate::config::BoardConfig;
use crate::model::Sample;
use crate::outcomes::TestIdentitySummary;
use crate::perf::MetricGroup;

pub use collate::{locale_cmp, numeric_cmp};
pub use sort::{
    sort_clusters, sort_flaky, sort_groups, ClusterSort, ClusterSortKey, ColumnKey, FlakySort,
    FlakySortKey, Sort, SortDirection, SortKey, SortSpec, UnknownSortKey,
};

/// How many of the most recent samples a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    #[default]
    All,
    Last(usize),
}

impl FromStr for Window {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<usize>()
            .map(Self::Last)
            .map_err(|_| format!("invalid window '{s}': expected a sample count or 'all'"))
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Last(n) => write!(f, "{n}"),
        }
    }
}

/// Presentation state carried between interactions.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ViewState {
    pub filter: String,
    pub sort: SortSpec,
    pub selected: Option<String>,
    pub highlighted: BTreeSet<String>,
    pub window: Window,
    pub flaky_sort: FlakySort,
    pub cluster_sort: ClusterSort,
}

impl ViewState {
    pub fn from_config(cfg: &BoardConfig) -> Self {
        let sort = match cfg.default_direction {
            Some(dir) => SortSpec::with_direction(cfg.default_sort, dir),
            None => SortSpec::new(cfg.default_sort),
        };
        Self {
            sort,
            window: cfg.window(),
            ..Self::default()
        }
    }

    pub fn with_filter(self, filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            ..self
        }
    }

    pub fn toggle_sort(self, key: SortKey) -> Self {
        Self {
            sort: self.sort.toggled(key),
            ..self
        }
    }

    pub fn select(self, key: impl Into<String>) -> Self {
        Self {
            selected: Some(key.into()),
            ..self
        }
    }

    pub fn clear_selection(self) -> Self {
        Self {
            selected: None,
            ..self
        }
    }

    pub fn toggle_highlight(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.highlighted.remove(&key) {
            self.highlighted.insert(key);
        }
        self
    }

    pub fn with_window(self, window: Window) -> Self {
        Self { window, ..self }
    }

    pub fn toggle_flaky_sort(self, key: FlakySortKey) -> Self {
        Self {
            flaky_sort: self.flaky_sort.toggled(key),
            ..self
        }
    }

    pub fn toggle_cluster_sort(self, key: ClusterSortKey) -> Self {
        Self {
            cluster_sort: self.cluster_sort.toggled(key),
            ..self
        }
    }
}

/// One visible table row with its inline sparkline.
#[derive(Debug, Clone, Serialize)]
pub struct GroupRow<'a> {
    #[serde(flatten)]
    pub group: &'a MetricGroup,
    pub sparkline: ChartSeries,
}

impl<'a> GroupRow<'a> {
    /// Sparklines cover the whole series; the chart window only applies to
    /// the focus chart.
    pub fn new(group: &'a MetricGroup) -> Self {
        Self {
            group,
            sparkline: chart::series(group, Window::All, Frame::sparkline()),
        }
    }
}

/// Result of one query: the visible rows and the effective selection.
#[derive(Debug, Clone, Serialize)]
pub struct GroupView<'a> {
    pub rows: Vec<GroupRow<'a>>,
    pub selected: Option<&'a MetricGroup>,
}

impl GroupView<'_> {
    pub fn selected_key(&self) -> Option<&str> {
        self.selected.map(|g| g.key.as_str())
    }
}

fn matches(group: &MetricGroup, term: &str) -> bool {
    [&group.scenario, &group.label, &group.metric]
        .iter()
        .any(|field| field.to_lowercase().contains(term))
}

/// Case-insensitive substring filter over scenario, label and metric.
pub fn filter_groups<'a>(groups: &'a [MetricGroup], filter: &str) -> Vec<&'a MetricGroup> {
    let term = filter.trim().to_lowercase();
    if term.is_empty() {
        return groups.iter().collect();
    }
    groups.iter().filter(|g| matches(g, &term)).collect()
}

/// Explicit selection when it is still visible, otherwise the first row.
pub fn resolve_selection<'a>(
    rows: &[&'a MetricGroup],
    selected: Option<&str>,
) -> Option<&'a MetricGroup> {
    selected
        .and_then(|key| rows.iter().find(|g| g.key == key))
        .or_else(|| rows.first())
        .copied()
}

pub fn query<'a>(groups: &'a [MetricGroup], state: &ViewState) -> GroupView<'a> {
    let mut rows = filter_groups(groups, &state.filter);
    sort_groups(&mut rows, &state.sort);
    let selected = resolve_selection(&rows, state.selected.as_deref());
    GroupView {
        rows: rows.into_iter().map(GroupRow::new).collect(),
        selected,
    }
}

/// Flaky table rows: candidates ordered by `sort`, first `limit` kept.
pub fn rank_flaky(
    mut candidates: Vec<TestIdentitySummary>,
    sort: &FlakySort,
    limit: usize,
) -> Vec<TestIdentitySummary> {
    sort_flaky(&mut candidates, sort);
    candidates.truncate(limit);
    candidates
}

/// Most recent samples of a time-ordered series.
pub fn window_samples(samples: &[Sample], window: Window) -> &[Sample] {
    match window {
        Window::All => samples,
        Window::Last(n) => &samples[samples.len().saturating_sub(n)..],
    }
}

/// Keys to chart: the effective selection first, then highlighted groups
/// that exist in `groups`, without duplicates.
pub fn chart_keys<'a>(
    view: &GroupView<'a>,
    groups: &'a [MetricGroup],
    state: &ViewState,
) -> Vec<&'a MetricGroup> {
    let mut out: Vec<&MetricGroup> = view.selected.into_iter().collect();
    for key in &state.highlighted {
        if out.iter().any(|g| &g.key == key) {
            continue;
        }
        if let Some(g) = groups.iter().find(|g| &g.key == key) {
            out.push(g);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Timestamp};
    use crate::perf::{aggregate, PerfOptions};
    use chrono::{TimeZone, Utc};

    fn sample(scenario: &str, metric: &str, ms: f64, secs: i64) -> Sample {
        Sample {
            scenario: scenario.into(),
            metric: metric.into(),
            category: Category::Medium,
            duration_ms: ms,
            status: "Passed".into(),
            run_id: format!("r{secs}"),
            branch: String::new(),
            commit: String::new(),
            timestamp_utc: Timestamp::new(Utc.timestamp_opt(secs, 0).unwrap()),
        }
    }

    fn groups() -> Vec<MetricGroup> {
        let batch = vec![
            sample("CheckoutFeature.PayWithCard", "submit", 120.0, 1),
            sample("CheckoutFeature.PayWithCard", "submit", 80.0, 2),
            sample("LoginFeature.SignIn", "render", 300.0, 1),
            sample("Search.Query", "render", 40.0, 1),
            sample("Search.Query", "render", 60.0, 2),
            sample("Search.Query", "render", 90.0, 3),
        ];
        aggregate(&batch, &PerfOptions::default())
    }

    fn keys(view: &GroupView<'_>) -> Vec<String> {
        view.rows.iter().map(|r| r.group.key.clone()).collect()
    }

    #[test]
    fn default_sort_is_last_duration_descending() {
        let groups = groups();
        let view = query(&groups, &ViewState::default());
        assert_eq!(
            keys(&view),
            vec![
                "LoginFeature.SignIn::render",
                "Search.Query::render",
                "CheckoutFeature.PayWithCard::submit",
            ]
        );
        assert_eq!(view.selected_key(), Some("LoginFeature.SignIn::render"));
    }

    #[test]
    fn filter_matches_humanized_label() {
        let groups = groups();
        let state = ViewState::default().with_filter("  pay with ");
        let view = query(&groups, &state);
        assert_eq!(keys(&view), vec!["CheckoutFeature.PayWithCard::submit"]);

        let state = ViewState::default().with_filter("RENDER");
        assert_eq!(query(&groups, &state).rows.len(), 2);

        let state = ViewState::default().with_filter("   ");
        assert_eq!(query(&groups, &state).rows.len(), 3);
    }

    #[test]
    fn missing_delta_sorts_last_descending_first_ascending() {
        let groups = groups();
        let state = ViewState::default().toggle_sort(SortKey::Delta);
        let desc = keys(&query(&groups, &state));
        assert_eq!(desc.last().unwrap(), "LoginFeature.SignIn::render");

        let state = state.toggle_sort(SortKey::Delta);
        assert_eq!(state.sort.direction, SortDirection::Asc);
        let asc = keys(&query(&groups, &state));
        assert_eq!(asc.first().unwrap(), "LoginFeature.SignIn::render");
    }

    #[test]
    fn scenario_sort_is_ascending_by_label() {
        let groups = groups();
        let state = ViewState::default().toggle_sort(SortKey::Scenario);
        assert_eq!(
            keys(&query(&groups, &state)),
            vec![
                "CheckoutFeature.PayWithCard::submit",
                "LoginFeature.SignIn::render",
                "Search.Query::render",
            ]
        );
    }

    #[test]
    fn selection_falls_back_when_filtered_out() {
        let groups = groups();
        let state = ViewState::default()
            .select("CheckoutFeature.PayWithCard::submit")
            .with_filter("search");
        let view = query(&groups, &state);
        assert_eq!(view.selected_key(), Some("Search.Query::render"));

        let state = state.with_filter("");
        let view = query(&groups, &state);
        assert_eq!(view.selected_key(), Some("CheckoutFeature.PayWithCard::submit"));

        let state = state.with_filter("nothing matches");
        assert!(query(&groups, &state).selected.is_none());
    }

    #[test]
    fn window_keeps_most_recent() {
        let groups = groups();
        let search = groups.iter().find(|g| g.key == "Search.Query::render").unwrap();
        let last_two = window_samples(&search.samples, Window::Last(2));
        let values: Vec<_> = last_two.iter().map(|s| s.duration_ms).collect();
        assert_eq!(values, vec![60.0, 90.0]);
        assert_eq!(window_samples(&search.samples, Window::Last(99)).len(), 3);
        assert_eq!(window_samples(&search.samples, Window::All).len(), 3);
    }

    #[test]
    fn every_row_carries_a_full_length_sparkline() {
        let groups = groups();
        let state = ViewState::default().with_window(Window::Last(1));
        let view = query(&groups, &state);
        for row in &view.rows {
            assert_eq!(row.sparkline.key, row.group.key);
            assert_eq!(row.sparkline.frame, Frame::sparkline());
            assert_eq!(row.sparkline.points.len(), row.group.sample_count());
        }

        let json = serde_json::to_value(&view).unwrap();
        let search = json["rows"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["key"] == "Search.Query::render")
            .unwrap();
        assert_eq!(search["p50"], 60.0);
        assert_eq!(search["sparkline"]["points"].as_array().unwrap().len(), 3);
        assert_eq!(search["sparkline"]["frame"]["width"], 120.0);
    }

    #[test]
    fn flaky_table_is_ranked_then_cut() {
        use crate::model::{Outcome, TestSample};
        use crate::outcomes::{flaky_candidates, summarize_tests};

        let mut batch = Vec::new();
        for i in 0..20 {
            for f in 0..=i {
                batch.push(TestSample {
                    test_name: format!("T{i:02}"),
                    run_id: "r".into(),
                    outcome: Outcome::Failed,
                    succeeded_on_retry: false,
                    error_key: None,
                    error_summary: None,
                    timestamp_utc: Timestamp::new(Utc.timestamp_opt(f, 0).unwrap()),
                });
            }
        }
        let candidates = flaky_candidates(&summarize_tests(&batch));

        let top = rank_flaky(candidates.clone(), &FlakySort::default(), 12);
        assert_eq!(top.len(), 12);
        assert_eq!(top[0].test_name, "T19");

        let by_name = rank_flaky(
            candidates,
            &FlakySort::default().toggled(FlakySortKey::Name),
            3,
        );
        let names: Vec<_> = by_name.iter().map(|i| i.test_name.as_str()).collect();
        assert_eq!(names, vec!["T00", "T01", "T02"]);
    }

    #[test]
    fn window_parses() {
        assert_eq!("all".parse::<Window>(), Ok(Window::All));
        assert_eq!("25".parse::<Window>(), Ok(Window::Last(25)));
        assert!("-1".parse::<Window>().is_err());
    }

    #[test]
    fn highlights_follow_selection_without_duplicates() {
        let groups = groups();
        let state = ViewState::default()
            .toggle_highlight("Search.Query::render")
            .toggle_highlight("LoginFeature.SignIn::render")
            .toggle_highlight("gone::metric");
        let view = query(&groups, &state);
        let charted: Vec<_> = chart_keys(&view, &groups, &state)
            .iter()
            .map(|g| g.key.as_str())
            .collect();
        assert_eq!(
            charted,
            vec!["LoginFeature.SignIn::render", "Search.Query::render"]
        );

        let state = state.toggle_highlight("Search.Query::render");
        assert!(!state.highlighted.contains("Search.Query::render"));
    }

    #[test]
    fn query_does_not_touch_input() {
        let groups = groups();
        let before = groups.clone();
        let _ = query(&groups, &ViewState::default().toggle_sort(SortKey::P95));
        assert_eq!(groups, before);
    }

    #[test]
    fn from_config_honours_direction_override() {
        let cfg = BoardConfig {
            default_sort: SortKey::Max,
            default_direction: Some(SortDirection::Asc),
            chart_window: Some(10),
            ..BoardConfig::default()
        };
        let state = ViewState::from_config(&cfg);
        assert_eq!(state.sort, Sort::with_direction(SortKey::Max, SortDirection::Asc));
        assert_eq!(state.window, Window::Last(10));
    }
}
