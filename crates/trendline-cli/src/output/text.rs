use trendline_core::chart::ChartSeries;
use trendline_core::clusters::ErrorCluster;
use trendline_core::outcomes::{RunSummary, TestIdentitySummary};
use trendline_core::overview::Overview;
use trendline_core::view::GroupView;
use trendline_core::{LoadError, Renderer, Timestamp};

use super::Output;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Plain-text tables for terminals and CI logs.
#[derive(Default)]
pub struct TextRenderer {
    out: String,
}

impl TextRenderer {
    fn line(&mut self, s: impl AsRef<str>) {
        self.out.push_str(s.as_ref());
        self.out.push('\n');
    }

    fn heading(&mut self, title: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.line(title);
        self.line("-".repeat(title.chars().count()));
    }
}

fn ms(value: f64) -> String {
    format!("{}", value.round())
}

fn signed_ms(value: Option<f64>) -> String {
    match value {
        Some(v) if v > 0.0 => format!("+{}", v.round()),
        Some(v) => format!("{}", v.round()),
        None => "--".to_string(),
    }
}

fn when(ts: &Timestamp) -> String {
    ts.as_datetime()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "--".to_string())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// One block character per sample, scaled like the chart frame.
fn sparkline(series: &ChartSeries) -> String {
    let range = (series.max - series.min).max(1.0);
    series
        .points
        .iter()
        .map(|p| {
            let level = ((p.value - series.min) / range * (BARS.len() - 1) as f64).round();
            BARS[(level.max(0.0) as usize).min(BARS.len() - 1)]
        })
        .collect()
}

impl Renderer for TextRenderer {
    fn render_summary(&mut self, o: &Overview) {
        self.heading("Summary");
        self.line(format!(
            "samples {}  groups {}  runs {}  success {}%",
            o.sample_count, o.group_count, o.run_count, o.success_rate
        ));
        match &o.latest_run {
            Some(run) => self.line(format!(
                "latest run {} on {} @ {} ({}) {}  p50 {} ms",
                run.run_id,
                run.branch,
                run.commit,
                run.status,
                when(&run.timestamp),
                ms(run.p50)
            )),
            None => self.line("No data yet."),
        }
    }

    fn render_groups(&mut self, view: &GroupView<'_>) {
        self.heading("Metrics");
        if view.rows.is_empty() {
            self.line("No data");
            return;
        }
        self.line(format!(
            "  {:<36} {:<16} {:<6} {:>5} {:>7} {:>7} {:>7} {:>7} {:>7} {:>7} {:>7} {:>7}  {}",
            "scenario", "metric", "cat", "n", "last", "p50", "p95", "avg", "stddev", "max", "delta",
            "trend", "history"
        ));
        let selected = view.selected_key();
        for row in &view.rows {
            let g = row.group;
            let marker = if Some(g.key.as_str()) == selected { '>' } else { ' ' };
            self.line(format!(
                "{marker} {:<36} {:<16} {:<6} {:>5} {:>7} {:>7} {:>7} {:>7} {:>7} {:>7} {:>7} {:>7}  {}",
                truncate(&g.label, 36),
                truncate(&g.metric, 16),
                g.category.as_str(),
                g.sample_count(),
                ms(g.last_duration()),
                ms(g.p50),
                ms(g.p95),
                ms(g.average),
                ms(g.std_dev),
                ms(g.max),
                signed_ms(g.delta),
                signed_ms(g.trend_slope),
                sparkline(&row.sparkline),
            ));
        }
    }

    fn render_trend_charts(&mut self, series: &[ChartSeries]) {
        self.heading("Trends");
        if series.is_empty() {
            self.line("No samples for this metric.");
            return;
        }
        for s in series {
            let trend = match &s.trend {
                Some(t) => format!("{} ms/day", signed_ms(Some(t.slope_per_day))),
                None => "--".to_string(),
            };
            self.line(format!("{} [{}]", s.title, s.key));
            self.line(format!(
                "  {}  {}..{} ms  trend {}",
                sparkline(s),
                ms(s.min),
                ms(s.max),
                trend
            ));
        }
    }

    fn render_run_history(&mut self, runs: &[RunSummary]) {
        self.heading("Runs");
        if runs.is_empty() {
            self.line("No data");
            return;
        }
        self.line(format!(
            "{:<20} {:<24} {:>5} {:>6} {:>6} {:>7} {:>5}  {:<16} {:<7} {}",
            "run", "status", "total", "passed", "failed", "skipped", "retry", "branch", "commit",
            "latest"
        ));
        for r in runs {
            self.line(format!(
                "{:<20} {:<24} {:>5} {:>6} {:>6} {:>7} {:>5}  {:<16} {:<7} {}",
                truncate(&r.run_id, 20),
                r.status.to_string(),
                r.counts.total,
                r.counts.passed,
                r.counts.failed,
                r.counts.skipped,
                r.counts.retry_saved,
                truncate(r.branch.as_deref().unwrap_or("--"), 16),
                r.commit
                    .as_deref()
                    .map(|c| c.chars().take(7).collect::<String>())
                    .unwrap_or_else(|| "--".to_string()),
                when(&r.latest),
            ));
        }
    }

    fn render_flaky_tests(&mut self, rows: &[TestIdentitySummary]) {
        self.heading("Flaky tests");
        if rows.is_empty() {
            self.line("No flaky tests.");
            return;
        }
        self.line(format!(
            "{:<48} {:>5} {:>6} {:>6} {:>5} {:>6}  {:<8} {}",
            "test", "total", "passed", "failed", "retry", "rate", "last", "seen"
        ));
        for t in rows {
            self.line(format!(
                "{:<48} {:>5} {:>6} {:>6} {:>5} {:>5.0}%  {:<8} {}",
                truncate(&t.test_name, 48),
                t.counts.total,
                t.counts.passed,
                t.counts.failed,
                t.counts.retry_saved,
                t.pass_rate * 100.0,
                t.last_outcome.as_str(),
                when(&t.last_seen),
            ));
        }
    }

    fn render_error_clusters(&mut self, rows: &[ErrorCluster]) {
        self.heading("Errors");
        if rows.is_empty() {
            self.line("No errors.");
            return;
        }
        for c in rows {
            self.line(format!(
                "{:>5}x {:<24} {}",
                c.count,
                truncate(&c.error_key, 24),
                truncate(&c.summary, 72)
            ));
            self.line(format!(
                "       latest {} at {}",
                c.latest_test,
                when(&c.latest_seen)
            ));
        }
    }

    fn render_failure(&mut self, error: &LoadError) {
        let title = format!("{} stream", error.stream());
        self.heading(&title);
        self.line(format!("! {error}"));
    }
}

impl Output for TextRenderer {
    fn as_renderer(&mut self) -> &mut dyn Renderer {
        self
    }

    fn finish(self: Box<Self>) -> anyhow::Result<String> {
        Ok(self.out)
    }
}
