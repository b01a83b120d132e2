use trendline_core::board::load_perf_board;
use trendline_core::Renderer;

use super::{emit, Context};
use crate::exit_codes::{EXIT_LOAD_FAILED, EXIT_SUCCESS};

pub async fn run(ctx: &Context) -> anyhow::Result<i32> {
    let board = load_perf_board(&ctx.perf_source(), &ctx.cfg).await;
    let mut out = ctx.output();
    let code = match &board {
        Ok(board) => {
            out.render_summary(&board.overview);
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
