use trendline_core::board::load_perf_board;
use trendline_core::view::query;
use trendline_core::Renderer;

use super::{emit, table_state, Context};
use crate::cli::args::MetricsArgs;
use crate::exit_codes::{EXIT_LOAD_FAILED, EXIT_SUCCESS};

pub async fn run(ctx: &Context, args: MetricsArgs) -> anyhow::Result<i32> {
    let board = load_perf_board(&ctx.perf_source(), &ctx.cfg).await;
    let state = table_state(ctx.view_state(), &args);
    let mut out = ctx.output();
    let code = match &board {
        Ok(board) => {
            let view = query(&board.groups, &state);
            tracing::debug!(
                rows = view.rows.len(),
                sort = %state.sort.key,
                "metric table"
            );
            out.render_groups(&view);
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
