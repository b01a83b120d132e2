use trendline_core::{present, refresh};

use super::chart::chart_state;
use super::{emit, Context};
use crate::cli::args::ReportArgs;
use crate::exit_codes::{EXIT_LOAD_FAILED, EXIT_SUCCESS};
use crate::output::Output;

pub async fn run(ctx: &Context, args: ReportArgs) -> anyhow::Result<i32> {
    let snapshot = refresh(&ctx.perf_source(), &ctx.test_source(), &ctx.cfg).await;
    let state = chart_state(ctx.view_state(), &args.chart);
    let mut out = ctx.output();
    present(&snapshot, &state, &ctx.cfg, out.as_renderer());
    emit(out)?;
    if snapshot.all_failed() {
        Ok(EXIT_LOAD_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}
