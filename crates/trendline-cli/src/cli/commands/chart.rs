use trendline_core::board::load_perf_board;
use trendline_core::chart::chart_series;
use trendline_core::view::{chart_keys, query};
use trendline_core::{Renderer, ViewState};

use super::{emit, table_state, Context};
use crate::cli::args::ChartArgs;
use crate::exit_codes::{EXIT_LOAD_FAILED, EXIT_SUCCESS};

/// Selection, highlights and window on top of the table state.
pub(crate) fn chart_state(state: ViewState, args: &ChartArgs) -> ViewState {
    let mut state = table_state(state, &args.table);
    if let Some(key) = &args.key {
        state = state.select(key.as_str());
    }
    for key in &args.highlight {
        state = state.toggle_highlight(key.as_str());
    }
    match args.window {
        Some(window) => state.with_window(window),
        None => state,
    }
}

pub async fn run(ctx: &Context, args: ChartArgs) -> anyhow::Result<i32> {
    let board = load_perf_board(&ctx.perf_source(), &ctx.cfg).await;
    let state = chart_state(ctx.view_state(), &args);
    let mut out = ctx.output();
    let code = match &board {
        Ok(board) => {
            let view = query(&board.groups, &state);
            if let (Some(wanted), Some(shown)) = (&state.selected, view.selected_key()) {
                if wanted != shown {
                    tracing::warn!(wanted = %wanted, shown, "selected group not visible, charting first row");
                }
            }
            let charted = chart_keys(&view, &board.groups, &state);
            out.render_trend_charts(&chart_series(&charted, state.window));
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
