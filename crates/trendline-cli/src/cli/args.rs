use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use trendline_core::view::{ClusterSortKey, FlakySortKey, SortKey};
use trendline_core::Window;

#[derive(Parser)]
#[command(
    name = "trendline",
    version,
    about = "Performance trends, run history and flaky tests from CI NDJSON streams"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Performance stream (NDJSON)
    #[arg(
        long,
        global = true,
        default_value = "data/perf.ndjson",
        env = "TRENDLINE_PERF"
    )]
    pub perf: PathBuf,

    /// Test-outcome stream (NDJSON)
    #[arg(
        long,
        global = true,
        default_value = "data/tests.ndjson",
        env = "TRENDLINE_TESTS"
    )]
    pub tests: PathBuf,

    /// Board configuration (YAML)
    #[arg(long, global = true, env = "TRENDLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Overview card: sample, group and run counts plus the latest run
    Summary,
    /// Grouped metric table
    Metrics(MetricsArgs),
    /// Chart series for the selected group and highlights
    Chart(ChartArgs),
    /// Per-run test outcome history
    Runs,
    /// Flaky-test candidates
    Flaky(FlakyArgs),
    /// Most frequent error signatures
    Errors(ErrorsArgs),
    /// Every section of the board
    Report(ReportArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct MetricsArgs {
    /// Case-insensitive substring over scenario, label and metric
    #[arg(long)]
    pub filter: Option<String>,

    /// Sort column (scenario, metric, average, p50, p95, std_dev, max, samples, delta, trend, last)
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Flip the direction of the sort column
    #[arg(long)]
    pub toggle: bool,
}

#[derive(Args, Clone, Debug, Default)]
pub struct ChartArgs {
    /// Group key to chart, e.g. `Login::submit`; defaults to the first row
    #[arg(long)]
    pub key: Option<String>,

    /// Additional group keys to chart alongside
    #[arg(long)]
    pub highlight: Vec<String>,

    /// Most recent samples per series, or `all`
    #[arg(long)]
    pub window: Option<Window>,

    #[command(flatten)]
    pub table: MetricsArgs,
}

#[derive(Args, Clone, Debug, Default)]
pub struct FlakyArgs {
    /// Sort column (name, total, passed, failed, retry_saved, pass_rate, last_seen)
    #[arg(long)]
    pub sort: Option<FlakySortKey>,

    #[arg(long)]
    pub toggle: bool,
}

#[derive(Args, Clone, Debug, Default)]
pub struct ErrorsArgs {
    /// Sort column (error, count, test)
    #[arg(long)]
    pub sort: Option<ClusterSortKey>,

    #[arg(long)]
    pub toggle: bool,
}

// flaky and error tables keep their configured order in the report
#[derive(Args, Clone, Debug, Default)]
pub struct ReportArgs {
    #[command(flatten)]
    pub chart: ChartArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_args_after_subcommand() {
        let cli = Cli::try_parse_from([
            "trendline",
            "metrics",
            "--sort",
            "p95",
            "--toggle",
            "--perf",
            "x.ndjson",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.global.perf, PathBuf::from("x.ndjson"));
        assert_eq!(cli.global.format, OutputFormat::Json);
        match cli.cmd {
            Command::Metrics(args) => {
                assert_eq!(args.sort, Some(SortKey::P95));
                assert!(args.toggle);
            }
            _ => panic!("expected metrics"),
        }
    }

    #[test]
    fn chart_window_and_highlights() {
        let cli = Cli::try_parse_from([
            "trendline",
            "chart",
            "--highlight",
            "a::m",
            "--highlight",
            "b::m",
            "--window",
            "all",
        ])
        .unwrap();
        match cli.cmd {
            Command::Chart(args) => {
                assert_eq!(args.highlight, vec!["a::m", "b::m"]);
                assert_eq!(args.window, Some(Window::All));
            }
            _ => panic!("expected chart"),
        }
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        assert!(Cli::try_parse_from(["trendline", "flaky", "--sort", "speed"]).is_err());
    }
}
