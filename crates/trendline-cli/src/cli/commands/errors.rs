use trendline_core::board::load_test_board;
use trendline_core::view::sort_clusters;
use trendline_core::Renderer;

use super::{emit, resort, Context};
use crate::cli::args::ErrorsArgs;
use crate::exit_codes::{EXIT_LOAD_FAILED, EXIT_SUCCESS};

pub async fn run(ctx: &Context, args: ErrorsArgs) -> anyhow::Result<i32> {
    let board = load_test_board(&ctx.test_source(), &ctx.cfg).await;
    let sort = resort(ctx.view_state().cluster_sort, args.sort, args.toggle);
    let mut out = ctx.output();
    let code = match board {
        Ok(board) => {
            let mut rows = board.clusters;
            sort_clusters(&mut rows, &sort);
            out.render_error_clusters(&rows);
            EXIT_SUCCESS
        }
        Err(e) => {
            out.render_failure(&e);
            EXIT_LOAD_FAILED
        }
    };
    emit(out)?;
    Ok(code)
}
