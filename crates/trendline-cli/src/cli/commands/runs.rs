use trendline_core::{refresh, Renderer};

use super::{emit, Context};
use crate::exit_codes::{EXIT_LOAD_FAILED, EXIT_SUCCESS};

/// Performance samples only enrich the history, so their absence is not fatal.
pub async fn run(ctx: &Context) -> anyhow::Result<i32> {
    let snapshot = refresh(&ctx.perf_source(), &ctx.test_source(), &ctx.cfg).await;
    let mut out = ctx.output();
    let code = match snapshot.runs() {
        Ok(runs) => {
            out.render_run_history(&runs);
            EXIT_SUCCESS
        }
        Err(e) => {
            out.render_failure(e);
            EXIT_LOAD_FAILED
        }
    };
    emit(out)?;
    Ok(code)
}
