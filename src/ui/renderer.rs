//! Top-level rendering coordinator.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → components → ANSI on stdout
//! ```

use crate::app::AppState;
use crate::ui::components;

/// Renders the plugin UI to stdout.
///
/// Computes the view model from application state at the current wall-clock
/// time and hands it to the layout renderer. Does not clear the screen; Zellij
/// redraws the pane from scratch on every render call.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let _span = tracing::trace_span!("render", rows, cols).entered();

    let now = chrono::Utc::now().timestamp();
    let viewmodel = state.compute_viewmodel(rows, cols, now);

    components::render_layout(&viewmodel, &state.theme, cols, rows);
}
