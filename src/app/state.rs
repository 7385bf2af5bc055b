//! Application state management and view model computation.
//!
//! [`AppState`] is the single owner of the catalog core ([`ItemStore`],
//! [`ViewEngine`], [`RefreshCoordinator`]) plus the transient UI state around
//! it: input mode, raw search text, selection cursor and status line.
//!
//! # Selection
//!
//! The cursor indexes the *visible* rows in display order. Hidden rows keep
//! their slot in the display order but are skipped by navigation. Whenever the
//! view changes, the cursor follows the previously selected item if it is
//! still visible and is clamped otherwise.
//!
//! # View Model Computation
//!
//! [`AppState::compute_viewmodel`] turns the state into a
//! [`UIViewModel`], handling windowing, fuzzy match highlighting, and the
//! empty-state variants (refreshing, unavailable, no matches, empty shelf).

use super::actions::Action;
use super::modes::InputMode;
use crate::catalog::{FetchRequest, ItemStore, LoadOutcome, RefreshCoordinator, SortKey, ViewEngine, VisualHandle};
use crate::domain::{ItemId, ItemRecord};
use crate::remote::{decode_catalog, endpoints};
use crate::ui::helpers::{format_age, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    DisplayItem, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo, StatusInfo, UIViewModel,
};
use fuzzy_matcher::skim::SkimMatcherV2;

/// Width of the NAME column, including the gap before SIZE.
pub const NAME_COLUMN_WIDTH: usize = 42;

/// Width of the SIZE column, including the gap before COVER.
pub const SIZE_COLUMN_WIDTH: usize = 12;

/// Rows used by chrome in normal mode: blank, header, border, column
/// headers, border, status, footer.
const NORMAL_CHROME_ROWS: usize = 7;

/// Search mode adds the three-line search box.
const SEARCH_CHROME_ROWS: usize = NORMAL_CHROME_ROWS + 3;

/// Default catalog server when none is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// One-line message shown above the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Central application state container.
///
/// Mutated only by the event handler. The catalog core is reachable through
/// public fields so the shim and tests can observe it, but every mutation of
/// the store goes through [`RefreshCoordinator`].
#[derive(Debug, Clone)]
pub struct AppState {
    /// Records and their visual handles.
    pub store: ItemStore,

    /// Sort key, normalized query and derived view.
    pub view: ViewEngine,

    /// Refresh lock and cache version.
    pub refresh: RefreshCoordinator,

    /// Zero-based index of the selected row among the visible rows.
    pub selected_index: usize,

    /// Current input handling mode.
    pub input_mode: InputMode,

    /// Search text exactly as typed.
    ///
    /// The view engine holds the trimmed, lower-cased form used for matching.
    pub search_query: String,

    /// Color scheme for UI rendering.
    pub theme: Theme,

    /// Catalog server base URL without a trailing slash.
    pub server_url: String,

    /// Directory downloads are written to, relative to the host working directory.
    pub download_dir: String,

    /// Seconds between incidental reloads, if enabled.
    pub reload_interval: Option<u64>,

    /// Set once Zellij has granted web and command access.
    pub permissions_granted: bool,

    /// Latest status message, if any.
    pub status: Option<StatusLine>,
}

impl AppState {
    /// Creates an empty browser pointed at `server_url`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gameshelf::{AppState, Theme};
    ///
    /// let state = AppState::new(Theme::default(), "http://games.local/");
    /// assert_eq!(state.server_url, "http://games.local");
    /// assert_eq!(state.selected_index, 0);
    /// assert!(state.store.is_empty());
    /// ```
    #[must_use]
    pub fn new(theme: Theme, server_url: impl Into<String>) -> Self {
        let server_url: String = server_url.into();
        Self {
            store: ItemStore::new(),
            view: ViewEngine::new(),
            refresh: RefreshCoordinator::new(),
            selected_index: 0,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme,
            server_url: server_url.trim_end_matches('/').to_string(),
            download_dir: ".".to_string(),
            reload_interval: None,
            permissions_granted: false,
            status: None,
        }
    }

    /// Number of rows currently passing the search filter.
    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.view.view().visible_count
    }

    /// Id of the selected row, if any row is visible.
    #[must_use]
    pub fn selected_id(&self) -> Option<&ItemId> {
        self.view.view().visible_ids().nth(self.selected_index)
    }

    /// Record and handle of the selected row.
    #[must_use]
    pub fn selected_item(&self) -> Option<(&ItemRecord, &VisualHandle)> {
        self.selected_id().and_then(|id| self.store.get(id))
    }

    /// Moves selection cursor down by one visible row, wrapping to top if at end.
    pub fn move_selection_down(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % len;
    }

    /// Moves selection cursor up by one visible row, wrapping to bottom if at start.
    pub fn move_selection_up(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = len - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        self.selected_index = if len == 0 {
            0
        } else {
            self.selected_index.min(len - 1)
        };
    }

    /// Points the cursor at `id` if it is visible, otherwise clamps it.
    fn reselect(&mut self, id: Option<&ItemId>) {
        let position = id.and_then(|id| {
            self.view
                .view()
                .visible_ids()
                .position(|visible| visible == id)
        });

        match position {
            Some(position) => self.selected_index = position,
            None => self.clamp_selection(),
        }
    }

    /// Re-filters the view from [`Self::search_query`].
    ///
    /// # Tracing
    ///
    /// Creates a debug-level span with item count, query length and sort key.
    pub fn apply_search_filter(&mut self) {
        let _span = tracing::debug_span!("apply_search_filter",
            total_items = self.store.len(),
            query_len = self.search_query.len(),
            sort_key = self.view.sort_key().as_str()
        )
        .entered();

        let keep = self.selected_id().cloned();
        self.view.set_search(&self.search_query, &self.store);
        self.reselect(keep.as_ref());

        tracing::debug!(visible_count = self.visible_len(), "search filter applied");
    }

    /// Clears the query, making every row visible again in the current order.
    pub fn clear_search(&mut self) {
        let keep = self.selected_id().cloned();
        self.search_query.clear();
        self.view.clear_search(&self.store);
        self.reselect(keep.as_ref());
    }

    /// Changes the sort key, keeping the cursor on the same item.
    pub fn set_sort(&mut self, key: SortKey) {
        let keep = self.selected_id().cloned();
        self.view.set_sort(key, &self.store);
        self.reselect(keep.as_ref());
        tracing::debug!(sort_key = key.as_str(), "sort key changed");
    }

    /// Starts a catalog load and returns the request to issue.
    ///
    /// Returns `None` if `force` is set while a forced refresh is in flight.
    pub fn catalog_request(&mut self, force: bool) -> Option<Action> {
        self.refresh.begin(force).map(|request| Action::FetchCatalog {
            url: endpoints::join(&self.server_url, &request.path()),
            request,
        })
    }

    /// Applies a catalog response to the store and view.
    ///
    /// `request` is the one [`Self::catalog_request`] issued. A forced
    /// completion also leaves search mode, since the coordinator cleared the
    /// query. The cursor follows the previously selected item.
    pub fn apply_catalog_response(
        &mut self,
        request: FetchRequest,
        status: u16,
        body: &[u8],
    ) -> LoadOutcome {
        let keep = self.selected_id().cloned();
        let first_load = self.refresh.last_loaded_at().is_none();
        let result = decode_catalog(status, body);
        let outcome = self
            .refresh
            .complete(request, result, &mut self.store, &mut self.view);

        match outcome {
            LoadOutcome::Replaced { items, failed, .. } => {
                self.search_query.clear();
                if self.input_mode.is_search() {
                    self.input_mode = InputMode::Normal;
                }
                self.status = Some(if failed {
                    StatusLine::error("Refresh failed: catalog unavailable")
                } else {
                    StatusLine::info(format!("Refreshed: {items} games"))
                });
            }
            LoadOutcome::Merged { added, failed, .. } => {
                if failed {
                    self.status = Some(StatusLine::error("Could not load catalog"));
                } else if added > 0 && !first_load {
                    self.status = Some(StatusLine::info(format!("{added} new games")));
                }
            }
            LoadOutcome::Rejected | LoadOutcome::Stale => {}
        }

        self.reselect(keep.as_ref());
        outcome
    }

    /// Builds the download action for the selected row.
    #[must_use]
    pub fn download_action(&self) -> Option<Action> {
        let (record, handle) = self.selected_item()?;
        let destination = format!(
            "{}/{}",
            self.download_dir.trim_end_matches('/'),
            endpoints::download_file_name(&record.name)
        );

        Some(Action::Download {
            id: record.id.clone(),
            url: endpoints::join(&self.server_url, handle.download_path()),
            destination,
        })
    }

    /// Computes a renderable UI view model from current state and terminal dimensions.
    ///
    /// # Parameters
    ///
    /// * `rows` - Terminal height in character cells
    /// * `cols` - Terminal width in character cells
    /// * `now` - Current Unix time, used for the "refreshed ... ago" header
    ///
    /// # Windowing Algorithm
    ///
    /// 1. Calculate available rows after subtracting UI chrome
    /// 2. Center window around the selected visible row
    /// 3. Adjust window if near start/end to maximize visible items
    /// 4. Compute relative selection index within the window
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize, now: i64) -> UIViewModel {
        let visible: Vec<&ItemId> = self.view.view().visible_ids().collect();

        let mut display_items = vec![];
        let mut selected_display_index = 0;

        if !visible.is_empty() {
            let available_rows = self.calculate_available_rows(rows);

            let mut visible_start = self.selected_index.saturating_sub(available_rows / 2);
            let visible_end = (visible_start + available_rows).min(visible.len());

            let actual_count = visible_end - visible_start;
            if actual_count < available_rows && visible.len() >= available_rows {
                visible_start = visible_end.saturating_sub(available_rows);
            }

            let matcher = if self.view.query().is_empty() {
                None
            } else {
                Some(SkimMatcherV2::default())
            };

            display_items = visible[visible_start..visible_end]
                .iter()
                .enumerate()
                .filter_map(|(relative_idx, id)| {
                    let (record, handle) = self.store.get(id)?;
                    let absolute_idx = visible_start + relative_idx;
                    Some(self.compute_display_item(record, handle, absolute_idx, matcher.as_ref()))
                })
                .collect();

            selected_display_index = self.selected_index.saturating_sub(visible_start);
        }

        UIViewModel {
            display_items,
            selected_index: selected_display_index,
            header: self.compute_header(now),
            footer: self.compute_footer(cols),
            empty_state: self.compute_empty_state(),
            search_bar: self.compute_search_bar(),
            status: self.status.as_ref().map(|status| StatusInfo {
                text: status.text.clone(),
                is_error: status.is_error,
            }),
        }
    }

    fn compute_display_item(
        &self,
        record: &ItemRecord,
        handle: &VisualHandle,
        absolute_idx: usize,
        matcher: Option<&SkimMatcherV2>,
    ) -> DisplayItem {
        let name = truncate(handle.title(), NAME_COLUMN_WIDTH - 2);
        let cover = if record.has_cover {
            handle.cover_path().to_string()
        } else {
            "-".to_string()
        };

        let highlight_ranges =
            matcher.map_or_else(Vec::new, |m| self.compute_highlight_ranges(handle.title(), m));

        DisplayItem {
            name,
            size: handle.size_label().to_string(),
            cover,
            is_selected: absolute_idx == self.selected_index,
            highlight_ranges,
        }
    }

    /// Coalesces fuzzy match positions into `(start, end)` character ranges.
    fn compute_highlight_ranges(&self, text: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let Some((_score, indices)) = matcher.fuzzy_indices(text, self.view.query()) else {
            return vec![];
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }

    fn compute_header(&self, now: i64) -> HeaderInfo {
        let freshness = if self.refresh.is_refreshing() {
            "refreshing...".to_string()
        } else {
            self.refresh.last_loaded_at().map_or_else(
                || "not loaded".to_string(),
                |at| format!("refreshed {}", format_age(now - at)),
            )
        };

        HeaderInfo {
            title: format!(
                " GameShelf ({}/{}) | {} | {freshness} ",
                self.visible_len(),
                self.store.len(),
                self.view.sort_key().label(),
            ),
            refreshing: self.refresh.is_refreshing(),
        }
    }

    fn compute_footer(&self, cols: usize) -> FooterInfo {
        use crate::app::modes::SearchFocus;

        let keybindings = match self.input_mode {
            InputMode::Search(SearchFocus::Typing) => {
                "ESC: clear search  Enter: download  Ctrl+n/p: navigate  Type to filter"
            }
            InputMode::Search(SearchFocus::Navigating) => {
                "ESC: clear search  /: edit query  j/k: navigate  Enter: download"
            }
            InputMode::Normal if cols < 80 => "j/k: move  /: search  o: sort  r: refresh  q: quit",
            InputMode::Normal => {
                "j/k: navigate  /: search  1-4 o: sort  r: refresh  Enter: download  q: quit"
            }
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    fn compute_empty_state(&self) -> Option<EmptyState> {
        if !self.view.view().is_empty() {
            return None;
        }

        let (message, subtitle) = if !self.store.is_empty() {
            (
                "No matches".to_string(),
                format!("Nothing matches \"{}\". Press ESC to clear the search", self.view.query()),
            )
        } else if self.refresh.is_refreshing() {
            (
                "Refreshing catalog".to_string(),
                "Waiting for the server to rescan its library".to_string(),
            )
        } else if self.refresh.last_load_failed() {
            (
                "Catalog unavailable".to_string(),
                format!("Could not load {}. Press r to retry", self.server_url),
            )
        } else if self.refresh.last_loaded_at().is_none() {
            (
                "Loading catalog".to_string(),
                format!("Contacting {}", self.server_url),
            )
        } else {
            (
                "The shelf is empty".to_string(),
                "Press r to rescan the server library".to_string(),
            )
        };

        Some(EmptyState { message, subtitle })
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        self.input_mode.is_search().then(|| SearchBarInfo {
            query: self.search_query.clone(),
            is_typing: self.input_mode.is_typing(),
        })
    }

    const fn calculate_available_rows(&self, total_rows: usize) -> usize {
        match self.input_mode {
            InputMode::Normal => total_rows.saturating_sub(NORMAL_CHROME_ROWS),
            InputMode::Search(_) => total_rows.saturating_sub(SEARCH_CHROME_ROWS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CacheVersion;

    fn body(json: &str) -> Vec<u8> {
        json.as_bytes().to_vec()
    }

    fn plain() -> FetchRequest {
        FetchRequest {
            force: false,
            generation: CacheVersion::default(),
        }
    }

    fn forced(state: &mut AppState) -> FetchRequest {
        match state.catalog_request(true) {
            Some(Action::FetchCatalog { request, .. }) => request,
            other => panic!("expected a forced fetch, got {other:?}"),
        }
    }

    fn loaded() -> AppState {
        let mut state = AppState::new(Theme::default(), DEFAULT_SERVER_URL);
        state.apply_catalog_response(
            plain(),
            200,
            &body(
                r#"[
                {"id":"a","name":"Alpha","sizeBytes":100,"hasCover":true},
                {"id":"b","name":"Beta","sizeBytes":50},
                {"id":"c","name":"Charlie","sizeBytes":75}
            ]"#,
            ),
        );
        state
    }

    fn visible(state: &AppState) -> Vec<&str> {
        state.view.view().visible_ids().map(ItemId::as_str).collect()
    }

    #[test]
    fn selection_skips_hidden_rows() {
        let mut state = loaded();
        state.search_query = "lph".to_string();
        state.apply_search_filter();

        assert_eq!(visible(&state), ["a"]);
        state.move_selection_down();
        assert_eq!(state.selected_id().map(ItemId::as_str), Some("a"));
    }

    #[test]
    fn selection_wraps() {
        let mut state = loaded();
        state.move_selection_up();
        assert_eq!(state.selected_index, 2);
        state.move_selection_down();
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn sort_keeps_cursor_on_item() {
        let mut state = loaded();
        state.move_selection_down();
        assert_eq!(state.selected_id().map(ItemId::as_str), Some("b"));

        state.set_sort(SortKey::SizeDesc);
        assert_eq!(visible(&state), ["a", "c", "b"]);
        assert_eq!(state.selected_id().map(ItemId::as_str), Some("b"));
        assert_eq!(state.selected_index, 2);
    }

    #[test]
    fn catalog_request_targets_server() {
        let mut state = AppState::new(Theme::default(), "http://nas:9000/");
        assert_eq!(
            state.catalog_request(true),
            Some(Action::FetchCatalog {
                url: "http://nas:9000/api/games?forceRefresh=1".to_string(),
                request: FetchRequest {
                    force: true,
                    generation: CacheVersion::default(),
                },
            })
        );
        assert_eq!(state.catalog_request(true), None);
        assert!(state.catalog_request(false).is_some());
    }

    #[test]
    fn forced_response_leaves_search_mode() {
        let mut state = loaded();
        state.input_mode = InputMode::Search(crate::app::modes::SearchFocus::Typing);
        state.search_query = "alp".to_string();
        state.apply_search_filter();

        let request = forced(&mut state);
        let outcome = state.apply_catalog_response(
            request,
            200,
            &body(r#"[{"id":"b","name":"Beta","sizeBytes":50}]"#),
        );

        assert!(matches!(outcome, LoadOutcome::Replaced { items: 1, .. }));
        assert_eq!(state.input_mode, InputMode::Normal);
        assert!(state.search_query.is_empty());
        assert_eq!(visible(&state), ["b"]);
        assert_eq!(state.status, Some(StatusLine::info("Refreshed: 1 games")));
    }

    #[test]
    fn failed_response_reports_unavailable() {
        let mut state = AppState::new(Theme::default(), DEFAULT_SERVER_URL);
        state.apply_catalog_response(plain(), 503, b"");

        let vm = state.compute_viewmodel(24, 100, 0);
        let empty = vm.empty_state.expect("empty state");
        assert_eq!(empty.message, "Catalog unavailable");
        assert!(vm.status.is_some_and(|s| s.is_error));
    }

    #[test]
    fn empty_state_variants() {
        let mut state = AppState::new(Theme::default(), DEFAULT_SERVER_URL);
        let message = |s: &AppState| s.compute_viewmodel(24, 100, 0).empty_state.map(|e| e.message);

        assert_eq!(message(&state).as_deref(), Some("Loading catalog"));

        let request = forced(&mut state);
        assert_eq!(message(&state).as_deref(), Some("Refreshing catalog"));

        state.apply_catalog_response(request, 200, b"[]");
        assert_eq!(message(&state).as_deref(), Some("The shelf is empty"));

        let mut state = loaded();
        state.search_query = "zzz".to_string();
        state.apply_search_filter();
        assert_eq!(message(&state).as_deref(), Some("No matches"));
    }

    #[test]
    fn viewmodel_rows_come_from_handles() {
        let state = loaded();
        let vm = state.compute_viewmodel(24, 100, 0);

        let names: Vec<&str> = vm.display_items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Beta", "Charlie"]);
        assert_eq!(vm.display_items[0].size, "100.0 B");
        assert_eq!(vm.display_items[0].cover, "/covers/a");
        assert_eq!(vm.display_items[1].cover, "-");
        assert!(vm.display_items[0].is_selected);
        assert!(vm.empty_state.is_none());
    }

    #[test]
    fn header_reports_counts_and_age() {
        let mut state = loaded();
        state.search_query = "eta".to_string();
        state.apply_search_filter();

        let loaded_at = state.refresh.last_loaded_at().unwrap_or_default();
        let vm = state.compute_viewmodel(24, 100, loaded_at + 300);
        assert!(vm.header.title.contains("(1/3)"), "{}", vm.header.title);
        assert!(vm.header.title.contains("Name A-Z"));
        assert!(vm.header.title.contains("refreshed 5m ago"));
    }

    #[test]
    fn highlight_ranges_are_coalesced() {
        let mut state = loaded();
        state.search_query = "alp".to_string();
        state.apply_search_filter();

        let vm = state.compute_viewmodel(24, 100, 0);
        assert_eq!(vm.display_items[0].highlight_ranges, vec![(0, 3)]);
    }

    #[test]
    fn window_follows_selection() {
        let mut state = AppState::new(Theme::default(), DEFAULT_SERVER_URL);
        let records: Vec<String> = (0..30)
            .map(|i| format!(r#"{{"id":"g{i:02}","name":"Game {i:02}","sizeBytes":{i}}}"#))
            .collect();
        state.apply_catalog_response(plain(), 200, format!("[{}]", records.join(",")).as_bytes());

        state.selected_index = 29;
        let vm = state.compute_viewmodel(17, 100, 0);
        assert_eq!(vm.display_items.len(), 10);
        assert_eq!(vm.display_items.last().map(|i| i.name.as_str()), Some("Game 29"));
        assert_eq!(vm.selected_index, 9);
    }

    #[test]
    fn download_action_uses_sanitized_name() {
        let mut state = AppState::new(Theme::default(), DEFAULT_SERVER_URL);
        state.download_dir = "games/".to_string();
        state.apply_catalog_response(
            plain(),
            200,
            br#"[{"id":"hl 2","name":"Half-Life: Episode 2","sizeBytes":1}]"#,
        );

        assert_eq!(
            state.download_action(),
            Some(Action::Download {
                id: ItemId::from("hl 2"),
                url: "http://localhost:8080/download/hl%202".to_string(),
                destination: "games/Half-Life- Episode 2.zip".to_string(),
            })
        );
    }
}
