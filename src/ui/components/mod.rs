//! Composable UI component renderers.
//!
//! # Components
//!
//! - [`header`]: Title bar with counts, sort key and freshness
//! - [`footer`]: Status line and keybinding hints
//! - [`search`]: Search input box
//! - [`table`]: Game list (NAME, SIZE, COVER)
//! - [`empty`]: Empty state message in place of the table
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Search Bar - 3 lines, search mode only]
//! [Table Headers]
//! [Table Rows or Empty State]
//! [Blank padding to fill screen]
//! [Border]
//! [Status]
//! [Footer]
//! ```

mod empty;
mod footer;
mod header;
mod search;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::{Rgb, Theme};
use crate::ui::viewmodel::UIViewModel;

use empty::render_empty_state;
use footer::{render_footer, render_status};
use header::render_header;
use search::render_search_bar;
use table::{render_table_headers, render_table_rows};

/// Renders a horizontal border line at the specified row.
///
/// # Returns
///
/// The next available row position (row + 1)
fn render_border(row: usize, color: &Rgb, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the full layout for a view model.
///
/// The search box is drawn only when the view model carries one. The bottom
/// three rows always hold the border, the status line and the footer.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2; // Row 1 stays blank

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }
    current_row = render_table_headers(current_row, theme);

    if let Some(empty) = &vm.empty_state {
        render_empty_state(current_row, empty, theme, cols);
    } else {
        render_table_rows(current_row, &vm.display_items, theme, cols);
    }

    let footer_row = rows;
    let status_row = footer_row.saturating_sub(1);
    let border_row = status_row.saturating_sub(1);

    render_border(border_row, &theme.colors.border, cols);
    render_status(status_row, vm.status.as_ref(), theme, cols);
    render_footer(footer_row, &vm.footer, theme, cols);
}
