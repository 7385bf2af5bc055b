//! Shared rendering utilities and helpers.
//!
//! Cursor positioning and highlighted text output used by every component,
//! plus the small string formatters the view model relies on.

use crate::ui::theme::Theme;

/// Positions the cursor at a specific row and column.
///
/// Uses ANSI escape sequence `\u{1b}[{row};{col}H` to move the cursor.
/// Coordinates are 1-indexed (row 1 = first row, col 1 = first column).
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Renders text with highlighted character ranges for fuzzy matches.
///
/// Ranges are `(start, end)` character indices, exclusive end. Ranges past the
/// end of `text` are clipped, so ranges computed on an untruncated name can be
/// applied to its truncated form. When `is_selected` is `true` no highlighting
/// is applied, to avoid fighting the selection background.
pub fn render_highlighted_text(
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
) {
    if ranges.is_empty() || is_selected {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.clamp(current_pos, chars.len());
        let end = end.clamp(start, chars.len());

        let normal_section: String = chars[current_pos..start].iter().collect();
        print!("{normal_section}");

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    let remaining: String = chars[current_pos..].iter().collect();
    print!("{remaining}");
}

/// Truncates `text` to at most `max` characters, ending in `...` when cut.
///
/// ```rust
/// use gameshelf::ui::helpers::truncate;
///
/// assert_eq!(truncate("Doom", 10), "Doom");
/// assert_eq!(truncate("The Elder Scrolls", 10), "The Eld...");
/// ```
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Formats an elapsed number of seconds as a coarse age.
///
/// ```rust
/// use gameshelf::ui::helpers::format_age;
///
/// assert_eq!(format_age(12), "just now");
/// assert_eq!(format_age(125), "2m ago");
/// assert_eq!(format_age(7200), "2h ago");
/// assert_eq!(format_age(200_000), "2d ago");
/// ```
#[must_use]
pub fn format_age(seconds: i64) -> String {
    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s => format!("{}d ago", s / 86_400),
    }
}
