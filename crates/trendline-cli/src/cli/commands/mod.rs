use std::path::Path;

use trendline_core::view::{ColumnKey, Sort};
use trendline_core::{BoardConfig, FileSource, ViewState};

use super::args::*;
use crate::output::Output;

pub mod chart;
pub mod errors;
pub mod flaky;
pub mod metrics;
pub mod report;
pub mod runs;
pub mod summary;

/// Picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG: &str = "trendline.yaml";

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let cfg = load_config(&cli.global)?;
    let ctx = Context {
        global: cli.global,
        cfg,
    };
    match cli.cmd {
        Command::Summary => summary::run(&ctx).await,
        Command::Metrics(args) => metrics::run(&ctx, args).await,
        Command::Chart(args) => chart::run(&ctx, args).await,
        Command::Runs => runs::run(&ctx).await,
        Command::Flaky(args) => flaky::run(&ctx, args).await,
        Command::Errors(args) => errors::run(&ctx, args).await,
        Command::Report(args) => report::run(&ctx, args).await,
    }
}

pub struct Context {
    pub global: GlobalArgs,
    pub cfg: BoardConfig,
}

impl Context {
    pub fn perf_source(&self) -> FileSource {
        FileSource::new(&self.global.perf)
    }

    pub fn test_source(&self) -> FileSource {
        FileSource::new(&self.global.tests)
    }

    pub fn output(&self) -> Box<dyn Output> {
        crate::output::for_format(self.global.format)
    }

    pub fn view_state(&self) -> ViewState {
        ViewState::from_config(&self.cfg)
    }
}

fn load_config(global: &GlobalArgs) -> anyhow::Result<BoardConfig> {
    if let Some(path) = &global.config {
        return Ok(BoardConfig::load(path)?);
    }
    let fallback = Path::new(DEFAULT_CONFIG);
    if fallback.is_file() {
        tracing::debug!(path = DEFAULT_CONFIG, "using config from working directory");
        return Ok(BoardConfig::load(fallback)?);
    }
    Ok(BoardConfig::default())
}

/// `--sort` picks a column at its default direction unless it is already the
/// active one; `--toggle` then flips whatever is active.
pub(crate) fn resort<K: ColumnKey>(current: Sort<K>, key: Option<K>, toggle: bool) -> Sort<K> {
    let sort = match key {
        Some(k) if k != current.key => Sort::new(k),
        _ => current,
    };
    if toggle {
        sort.toggled(sort.key)
    } else {
        sort
    }
}

pub(crate) fn table_state(state: ViewState, args: &MetricsArgs) -> ViewState {
    let state = ViewState {
        sort: resort(state.sort, args.sort, args.toggle),
        ..state
    };
    match &args.filter {
        Some(f) => state.with_filter(f.as_str()),
        None => state,
    }
}

pub(crate) fn emit(out: Box<dyn Output>) -> anyhow::Result<()> {
    println!("{}", out.finish()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendline_core::view::{SortDirection, SortKey, SortSpec};

    #[test]
    fn resort_keeps_active_direction() {
        let current = SortSpec::default();
        assert_eq!(resort(current, Some(SortKey::Last), false), current);
        assert_eq!(
            resort(current, Some(SortKey::Last), true).direction,
            SortDirection::Asc
        );
        assert_eq!(
            resort(current, Some(SortKey::Metric), false),
            Sort::with_direction(SortKey::Metric, SortDirection::Asc)
        );
        assert_eq!(
            resort(current, Some(SortKey::Metric), true).direction,
            SortDirection::Desc
        );
        assert_eq!(resort(current, None, true).direction, SortDirection::Asc);
    }

    #[test]
    fn table_state_applies_filter() {
        let args = MetricsArgs {
            filter: Some("login".into()),
            ..MetricsArgs::default()
        };
        let state = table_state(ViewState::default(), &args);
        assert_eq!(state.filter, "login");
    }
}
