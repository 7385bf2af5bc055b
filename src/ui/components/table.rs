//! Table component renderer.
//!
//! Renders the game list as three columns: NAME, SIZE and COVER. The cover
//! column shows the cover path each row's handle was built with, so a forced
//! refresh is visible as a new `?v=` suffix on every row.

use crate::app::state::{NAME_COLUMN_WIDTH, SIZE_COLUMN_WIDTH};
use crate::ui::helpers::{self, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DisplayItem;

/// Renders the table column headers at the specified row.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_table_headers(row: usize, theme: &Theme) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!(
        "{:<name_w$}{:>size_w$}  {}",
        "NAME",
        "SIZE",
        "COVER",
        name_w = NAME_COLUMN_WIDTH,
        size_w = SIZE_COLUMN_WIDTH - 2,
    );
    print!("{}", Theme::reset());
    row + 1
}

/// Renders all table rows starting at the specified row.
///
/// # Returns
///
/// The next available row position (row + number of items)
pub fn render_table_rows(row: usize, items: &[DisplayItem], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_table_row(current_row, item, theme, cols);
    }
    current_row
}

/// Renders a single row.
///
/// # Styling Precedence
///
/// 1. Selection colors for the whole row (if `is_selected`)
/// 2. Fuzzy match highlights in the NAME column
/// 3. Column colors: `text_normal`, `size_fg`, `text_dim`
///
/// The row is padded to the full terminal width so the selection background
/// covers it.
fn render_table_row(row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let restore = |column_color: &crate::ui::theme::Rgb| {
        if item.is_selected {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(column_color));
        }
    };

    restore(&theme.colors.text_normal);
    helpers::render_highlighted_text(
        &item.name,
        &item.highlight_ranges,
        theme,
        item.is_selected,
    );
    let name_len = item.name.chars().count();
    print!("{}", " ".repeat(NAME_COLUMN_WIDTH.saturating_sub(name_len)));

    restore(&theme.colors.size_fg);
    print!("{:>width$}  ", item.size, width = SIZE_COLUMN_WIDTH - 2);

    restore(&theme.colors.text_dim);
    let cover_width = cols.saturating_sub(NAME_COLUMN_WIDTH + SIZE_COLUMN_WIDTH);
    let cover = helpers::truncate(&item.cover, cover_width);
    let cover_len = cover.chars().count();
    print!("{cover}");

    let line_len = NAME_COLUMN_WIDTH.max(name_len) + SIZE_COLUMN_WIDTH.max(item.size.len() + 2) + cover_len;
    print!("{}", " ".repeat(cols.saturating_sub(line_len)));

    print!("{}", Theme::reset());
    row + 1
}
