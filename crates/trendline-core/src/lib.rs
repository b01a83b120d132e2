//! Aggregation and trend analysis for CI performance and test-outcome streams.
//!
//! Two NDJSON streams go in (performance samples and test executions), boards
//! of grouped statistics, run history, flaky candidates and error clusters
//! come out. Everything past the loaders is a pure function of its input.

pub mod board;
pub mod chart;
pub mod clusters;
pub mod config;
pub mod errors;
pub mod model;
pub mod normalize;
pub mod outcomes;
pub mod overview;
pub mod perf;
pub mod render;
pub mod source;
pub mod stats;
pub mod view;

// Convenience re-exports
pub use board::{refresh, PerfBoard, Snapshot, TestBoard};
pub use config::BoardConfig;
pub use errors::{ConfigError, LoadError, Stream};
pub use model::{Category, Outcome, Sample, TestSample, Timestamp};
pub use render::{present, Renderer};
pub use source::{FileSource, RecordSource, StaticSource};
pub use view::{ViewState, Window};
