//! Chart-ready series: sample values mapped into a padded drawing frame.

use serde::Serialize;

use crate::model::Sample;
use crate::perf::MetricGroup;
use crate::stats::{self, TrendLine};
use crate::view::{window_samples, Window};

/// Drawing area in abstract units; the renderer scales it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Frame {
    /// Inline table sparkline.
    pub fn sparkline() -> Self {
        Self {
            width: 120.0,
            height: 40.0,
            padding: 0.0,
        }
    }

    /// Focus chart for the selected group.
    pub fn focus() -> Self {
        Self {
            width: 800.0,
            height: 260.0,
            padding: 28.0,
        }
    }

    fn inner_width(&self) -> f64 {
        (self.width - self.padding * 2.0).max(0.0)
    }

    fn inner_height(&self) -> f64 {
        (self.height - self.padding * 2.0).max(0.0)
    }

    fn x(&self, fraction: f64) -> f64 {
        self.padding + fraction * self.inner_width()
    }

    /// Value scaled against `[min, max]`; ranges under 1 ms stretch to 1.
    fn y(&self, value: f64, min: f64, max: f64) -> f64 {
        let range = (max - min).max(1.0);
        self.padding + self.inner_height() - (value - min) / range * self.inner_height()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// Regression line drawn across the full chart width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendOverlay {
    pub start: ChartPoint,
    pub end: ChartPoint,
    /// Milliseconds of duration per day of wall-clock time.
    pub slope_per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub key: String,
    pub title: String,
    pub color: &'static str,
    pub frame: Frame,
    pub min: f64,
    pub max: f64,
    pub points: Vec<ChartPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendOverlay>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn bounds(samples: &[Sample]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    samples.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
        (lo.min(s.duration_ms), hi.max(s.duration_ms))
    })
}

/// Points for a time-ordered series, evenly spaced along x.
pub fn line_chart(samples: &[Sample], frame: Frame) -> Vec<ChartPoint> {
    let (min, max) = bounds(samples);
    let steps = samples.len().saturating_sub(1).max(1) as f64;
    samples
        .iter()
        .enumerate()
        .map(|(i, s)| ChartPoint {
            x: frame.x(i as f64 / steps),
            y: frame.y(s.duration_ms, min, max),
            value: s.duration_ms,
        })
        .collect()
}

const MS_PER_DAY: f64 = 86_400_000.0;

/// Least-squares fit of duration against timestamp. Samples without a valid
/// timestamp are left out.
pub fn trend_overlay(samples: &[Sample], frame: Frame) -> Option<TrendOverlay> {
    let fit: Vec<(f64, f64)> = samples
        .iter()
        .filter_map(|s| Some((s.timestamp_utc.epoch_ms()? as f64, s.duration_ms)))
        .collect();
    let line: TrendLine = stats::trend_line(&fit)?;
    let first = fit.first()?.0;
    let last = fit.last()?.0;
    let (min, max) = bounds(samples);
    let point = |fraction: f64, at: f64| {
        let value = line.at(at);
        ChartPoint {
            x: frame.x(fraction),
            y: frame.y(value, min, max),
            value,
        }
    };
    Some(TrendOverlay {
        start: point(0.0, first),
        end: point(1.0, last),
        slope_per_day: line.slope * MS_PER_DAY,
    })
}

pub fn series(group: &MetricGroup, window: Window, frame: Frame) -> ChartSeries {
    let samples = window_samples(&group.samples, window);
    let (min, max) = bounds(samples);
    ChartSeries {
        key: group.key.clone(),
        title: group.title(),
        color: group.color,
        frame,
        min,
        max,
        points: line_chart(samples, frame),
        trend: trend_overlay(samples, frame),
    }
}

/// One focus-frame series per charted group, in the given order.
pub fn chart_series(groups: &[&MetricGroup], window: Window) -> Vec<ChartSeries> {
    groups
        .iter()
        .map(|g| series(g, window, Frame::focus()))
        .collect()
}
