use trendline_core::board::load_test_board;
use trendline_core::outcomes::flaky_candidates;
use trendline_core::view::rank_flaky;
use trendline_core::Renderer;

use super::{emit, resort, Context};
use crate::cli::args::FlakyArgs;
use crate::exit_codes::{EXIT_LOAD_FAILED, EXIT_SUCCESS};

pub async fn run(ctx: &Context, args: FlakyArgs) -> anyhow::Result<i32> {
    let board = load_test_board(&ctx.test_source(), &ctx.cfg).await;
    let sort = resort(ctx.view_state().flaky_sort, args.sort, args.toggle);
    let mut out = ctx.output();
    let code = match &board {
        Ok(board) => {
            let rows = rank_flaky(
                flaky_candidates(&board.identities),
                &sort,
                ctx.cfg.flaky_limit,
            );
            out.render_flaky_tests(&rows);
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
