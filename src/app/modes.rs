//! Input mode state types.
//!
//! The browser is either in **Normal** mode (navigation, sorting, refresh,
//! download) or in **Search** mode, where focus is either on the query input
//! or on the filtered results.
//!
//! ```rust
//! use gameshelf::app::modes::{InputMode, SearchFocus};
//!
//! let mode = InputMode::Search(SearchFocus::Typing);
//! assert!(mode.is_search());
//! assert!(mode.is_typing());
//! assert!(!InputMode::Normal.is_search());
//! ```

/// Focus state within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Keystrokes edit the query.
    ///
    /// Accepts character input, backspace, and enter (download the selection).
    Typing,

    /// Keystrokes move through the filtered rows.
    ///
    /// Accepts j/k for movement, enter to download, and / to return to Typing.
    Navigating,
}

/// Current input handling mode.
///
/// Controls which keybindings are active, whether the search bar is drawn,
/// and the footer hint text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigation and command mode.
    ///
    /// Available keybindings: j/k (navigate), / (search), 1-4 and o (sort),
    /// r (refresh), enter (download), q (quit).
    #[default]
    Normal,

    /// Search mode with the given focus.
    Search(SearchFocus),
}

impl InputMode {
    /// Returns `true` in either search focus.
    #[must_use]
    pub const fn is_search(self) -> bool {
        matches!(self, Self::Search(_))
    }

    /// Returns `true` while keystrokes edit the query.
    #[must_use]
    pub const fn is_typing(self) -> bool {
        matches!(self, Self::Search(SearchFocus::Typing))
    }
}
