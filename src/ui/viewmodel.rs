//! View model types representing renderable UI state.
//!
//! View models are created by `AppState::compute_viewmodel()` and consumed by
//! the renderer. They contain no business logic, only display-ready strings.
//! Every per-row string is copied from the item's visual handle, so a row
//! never re-derives its name, size or cover path.

/// Complete UI view model for rendering.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    /// Visible rows inside the scroll window.
    pub display_items: Vec<DisplayItem>,

    /// Index of the selected row within `display_items`.
    pub selected_index: usize,

    pub header: HeaderInfo,

    pub footer: FooterInfo,

    /// Shown in place of the table when no row is visible.
    pub empty_state: Option<EmptyState>,

    /// Present while in search mode.
    pub search_bar: Option<SearchBarInfo>,

    pub status: Option<StatusInfo>,
}

/// One game row: NAME, SIZE and COVER columns.
#[derive(Debug, Clone)]
pub struct DisplayItem {
    /// Display name, truncated to the NAME column.
    pub name: String,

    /// Human-readable archive size.
    pub size: String,

    /// Cover path (with cache suffix once versioned), or `-` when the game has no cover.
    pub cover: String,

    pub is_selected: bool,

    /// Character ranges to highlight for the current query.
    ///
    /// Each tuple is `(start_index, end_index)` in character indices into the
    /// untruncated name.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone)]
pub struct HeaderInfo {
    /// Title with counts, sort key and freshness.
    pub title: String,

    /// Drawn in the refreshing color while a forced refresh is in flight.
    pub refreshing: bool,
}

#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Keybinding help text for the current mode.
    pub keybindings: String,
}

/// Message shown when no row is visible.
#[derive(Debug, Clone)]
pub struct EmptyState {
    /// Primary message (e.g., "No matches").
    pub message: String,

    /// Secondary hint (e.g., "Press ESC to clear the search").
    pub subtitle: String,
}

#[derive(Debug, Clone)]
pub struct SearchBarInfo {
    /// Query text as typed.
    pub query: String,

    /// Whether keystrokes currently edit the query; draws a cursor.
    pub is_typing: bool,
}

#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub text: String,
    pub is_error: bool,
}
