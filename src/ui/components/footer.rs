//! Footer and status line renderers.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FooterInfo, StatusInfo};

/// Renders the footer help bar at the specified row.
///
/// Keybinding hints are centered and dimmed. Text wider than the terminal is
/// truncated so the layout never wraps.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_footer(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let help_text: String = footer.keybindings.chars().take(cols).collect();
    let text_len = help_text.chars().count();
    let padding = (cols.saturating_sub(text_len)) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", " ".repeat(padding));
    print!("{help_text}");
    print!("{}", " ".repeat(cols.saturating_sub(padding + text_len)));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the status line, or a blank line when there is no status.
///
/// Errors use `error_fg`, everything else `text_normal`.
pub fn render_status(row: usize, status: Option<&StatusInfo>, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let Some(status) = status else {
        print!("{}", " ".repeat(cols));
        return row + 1;
    };

    let color = if status.is_error {
        &theme.colors.error_fg
    } else {
        &theme.colors.text_normal
    };
    let text: String = format!(" {}", status.text).chars().take(cols).collect();

    print!("{}", Theme::fg(color));
    print!("{text}");
    print!("{}", " ".repeat(cols.saturating_sub(text.chars().count())));
    print!("{}", Theme::reset());
    row + 1
}
