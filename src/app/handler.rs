//! Event handling and state transition logic.
//!
//! The handler is the only place that mutates [`AppState`]. The plugin shim
//! translates Zellij events (keys, web request results, command results,
//! timers, permission grants) into [`Event`]s, and executes the [`Action`]s
//! that come back.
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`
//! - **Search**: `SearchMode`, `FocusSearchBar`, `FocusResults`, `ExitSearch`,
//!   `Char`, `Backspace`, `Escape`
//! - **Ordering**: `SelectSort`, `CycleSort`
//! - **Catalog**: `RefreshRequested`, `ReloadTick`, `CatalogResponse`
//! - **Download**: `DownloadSelected`, `DownloadFinished`
//! - **System**: `PermissionsGranted`, `CloseFocus`
//!
//! # Example
//!
//! ```rust
//! use gameshelf::{handle_event, Action, AppState, Event, Theme};
//!
//! let mut state = AppState::new(Theme::default(), "http://localhost:8080");
//! let (render, actions) = handle_event(&mut state, &Event::PermissionsGranted)?;
//! assert!(render);
//! match actions.as_slice() {
//!     [Action::FetchCatalog { url, request }] => {
//!         assert_eq!(url, "http://localhost:8080/api/games");
//!         assert!(!request.force);
//!     }
//!     other => panic!("unexpected actions: {other:?}"),
//! }
//! # Ok::<(), gameshelf::ShelfError>(())
//! ```

use super::modes::{InputMode, SearchFocus};
use super::state::StatusLine;
use crate::app::{Action, AppState};
use crate::catalog::{FetchRequest, LoadOutcome, SortKey};
use crate::domain::error::Result;
use crate::domain::ItemId;

/// Events triggered by user input, host callbacks or timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves selection cursor down by one visible row (wraps to top).
    KeyDown,
    /// Moves selection cursor up by one visible row (wraps to bottom).
    KeyUp,
    /// Hides the plugin pane.
    CloseFocus,
    /// Enters search mode with typing focus.
    SearchMode,
    /// Focuses the search input field (from navigating mode).
    FocusSearchBar,
    /// Focuses the search results list (from typing mode).
    FocusResults,
    /// Exits search mode and clears the query.
    ExitSearch,
    /// Appends a character to the search query.
    Char(char),
    /// Removes the last character from the search query.
    Backspace,
    /// Clears search query and returns to normal mode.
    Escape,

    /// Switches to the given sort key.
    SelectSort(SortKey),
    /// Switches to the next sort key.
    CycleSort,

    /// Asks for a forced refresh (server rescan + full rebuild).
    RefreshRequested,

    /// Zellij granted the permissions the plugin asked for.
    ///
    /// Triggers the initial catalog load and arms the reload timer.
    PermissionsGranted,

    /// The incidental reload timer fired.
    ReloadTick,

    /// A catalog request finished.
    CatalogResponse {
        /// The request this answers, as issued by [`Action::FetchCatalog`].
        request: FetchRequest,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: Vec<u8>,
    },

    /// Downloads the selected game.
    DownloadSelected,

    /// A download command exited.
    DownloadFinished {
        id: ItemId,
        /// Process exit code; `None` if it was killed.
        exit_code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Parameters
///
/// * `state` - Mutable reference to application state
/// * `event` - Event to process
///
/// # Returns
///
/// Whether the UI needs to be re-rendered, and the actions to execute in
/// sequence.
///
/// # Errors
///
/// Reserved for failures the shim must see; catalog and download failures are
/// absorbed into the status line and never surface here.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event type.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    match event {
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::SearchMode => {
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            state.clear_search();
            Ok((true, vec![]))
        }
        Event::FocusSearchBar => {
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusResults => {
            if state.search_query.trim().is_empty() {
                state.input_mode = InputMode::Normal;
                state.clear_search();
                return Ok((true, vec![]));
            }

            state.input_mode = InputMode::Search(SearchFocus::Navigating);
            Ok((true, vec![]))
        }
        Event::ExitSearch | Event::Escape => {
            tracing::debug!(query = %state.search_query, "leaving search");
            let was_searching = state.input_mode.is_search() || !state.search_query.is_empty();
            state.input_mode = InputMode::Normal;
            state.clear_search();
            Ok((was_searching, vec![]))
        }
        Event::Char(c) => {
            if !state.input_mode.is_typing() {
                return Ok((false, vec![]));
            }

            state.search_query.push(*c);
            tracing::trace!(query = %state.search_query, char = %c, "search query updated");
            state.apply_search_filter();

            Ok((true, vec![]))
        }
        Event::Backspace => {
            if !state.input_mode.is_typing() {
                return Ok((false, vec![]));
            }

            state.search_query.pop();
            state.apply_search_filter();

            Ok((true, vec![]))
        }
        Event::SelectSort(key) => {
            if state.view.sort_key() == *key {
                return Ok((false, vec![]));
            }
            state.set_sort(*key);
            Ok((true, vec![]))
        }
        Event::CycleSort => {
            state.set_sort(state.view.sort_key().cycle());
            Ok((true, vec![]))
        }
        Event::RefreshRequested => {
            if !state.permissions_granted {
                state.status = Some(StatusLine::error("Waiting for web access permission"));
                return Ok((true, vec![]));
            }

            state.catalog_request(true).map_or_else(
                || {
                    tracing::debug!("refresh already in flight");
                    Ok((false, vec![]))
                },
                |action| {
                    state.status = Some(StatusLine::info("Refreshing catalog..."));
                    Ok((true, vec![action]))
                },
            )
        }
        Event::PermissionsGranted => {
            tracing::info!(server_url = %state.server_url, "permissions granted, loading catalog");
            state.permissions_granted = true;

            let mut actions: Vec<Action> = state.catalog_request(false).into_iter().collect();
            if let Some(seconds) = state.reload_interval {
                actions.push(Action::ScheduleReload { seconds });
            }
            Ok((true, actions))
        }
        Event::ReloadTick => {
            let Some(seconds) = state.reload_interval else {
                return Ok((false, vec![]));
            };

            let mut actions = vec![];
            if state.refresh.is_refreshing() {
                tracing::debug!("refresh in flight, skipping incidental reload");
            } else if let Some(action) = state.catalog_request(false) {
                actions.push(action);
            }
            actions.push(Action::ScheduleReload { seconds });

            Ok((false, actions))
        }
        Event::CatalogResponse { request, status, body } => {
            let outcome = state.apply_catalog_response(*request, *status, body);
            tracing::debug!(?outcome, status, "catalog response applied");
            Ok((!matches!(outcome, LoadOutcome::Stale), vec![]))
        }
        Event::DownloadSelected => {
            let Some(action) = state.download_action() else {
                tracing::debug!("no game selected");
                return Ok((false, vec![]));
            };

            if let Action::Download { id, destination, .. } = &action {
                tracing::info!(item_id = %id, destination = %destination, "starting download");
                state.status = Some(StatusLine::info(format!("Downloading to {destination}...")));
            }
            Ok((true, vec![action]))
        }
        Event::DownloadFinished {
            id,
            exit_code,
            stderr,
        } => {
            let name = state
                .store
                .get(id)
                .map_or_else(|| id.to_string(), |(record, _)| record.name.clone());

            if *exit_code == Some(0) {
                tracing::info!(item_id = %id, "download finished");
                state.status = Some(StatusLine::info(format!("Downloaded {name}")));
            } else {
                let reason = stderr.lines().next().unwrap_or("curl failed").trim();
                tracing::warn!(item_id = %id, ?exit_code, stderr = %stderr, "download failed");
                state.status = Some(StatusLine::error(format!("Download of {name} failed: {reason}")));
            }
            Ok((true, vec![]))
        }
    }
}

/// Short event name for span fields; avoids logging response bodies.
const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::KeyDown => "key_down",
        Event::KeyUp => "key_up",
        Event::CloseFocus => "close_focus",
        Event::SearchMode => "search_mode",
        Event::FocusSearchBar => "focus_search_bar",
        Event::FocusResults => "focus_results",
        Event::ExitSearch => "exit_search",
        Event::Char(_) => "char",
        Event::Backspace => "backspace",
        Event::Escape => "escape",
        Event::SelectSort(_) => "select_sort",
        Event::CycleSort => "cycle_sort",
        Event::RefreshRequested => "refresh_requested",
        Event::PermissionsGranted => "permissions_granted",
        Event::ReloadTick => "reload_tick",
        Event::CatalogResponse { .. } => "catalog_response",
        Event::DownloadSelected => "download_selected",
        Event::DownloadFinished { .. } => "download_finished",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::DEFAULT_SERVER_URL;
    use crate::Theme;

    const CATALOG: &str = r#"[
        {"id":"a","name":"Alpha","sizeBytes":100},
        {"id":"b","name":"Beta","sizeBytes":50}
    ]"#;

    fn ready() -> AppState {
        let mut state = AppState::new(Theme::default(), DEFAULT_SERVER_URL);
        let (_, actions) = handle_event(&mut state, &Event::PermissionsGranted).unwrap();
        respond(&mut state, &actions, CATALOG);
        state
    }

    fn fetch_of(actions: &[Action]) -> FetchRequest {
        actions
            .iter()
            .find_map(|action| match action {
                Action::FetchCatalog { request, .. } => Some(*request),
                _ => None,
            })
            .expect("a catalog fetch")
    }

    fn respond(state: &mut AppState, actions: &[Action], json: &str) -> (bool, Vec<Action>) {
        let event = Event::CatalogResponse {
            request: fetch_of(actions),
            status: 200,
            body: json.as_bytes().to_vec(),
        };
        handle_event(state, &event).unwrap()
    }

    fn send(state: &mut AppState, event: Event) -> (bool, Vec<Action>) {
        handle_event(state, &event).unwrap()
    }

    fn visible(state: &AppState) -> Vec<String> {
        state
            .view
            .view()
            .visible_ids()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn typing_filters_and_escape_restores() {
        let mut state = ready();
        send(&mut state, Event::SearchMode);
        for c in "AL".chars() {
            send(&mut state, Event::Char(c));
        }
        assert_eq!(visible(&state), ["a"]);
        assert_eq!(state.view.query(), "al");

        send(&mut state, Event::Escape);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(visible(&state), ["a", "b"]);
    }

    #[test]
    fn chars_ignored_outside_typing() {
        let mut state = ready();
        assert_eq!(send(&mut state, Event::Char('x')), (false, vec![]));
        assert!(state.search_query.is_empty());
    }

    #[test]
    fn focus_results_with_blank_query_leaves_search() {
        let mut state = ready();
        send(&mut state, Event::SearchMode);
        send(&mut state, Event::Char(' '));
        send(&mut state, Event::FocusResults);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn sort_keys_reorder() {
        let mut state = ready();
        send(&mut state, Event::SelectSort(SortKey::SizeAsc));
        assert_eq!(visible(&state), ["b", "a"]);

        let (render, _) = send(&mut state, Event::SelectSort(SortKey::SizeAsc));
        assert!(!render);

        send(&mut state, Event::CycleSort);
        assert_eq!(state.view.sort_key(), SortKey::SizeDesc);
    }

    #[test]
    fn second_refresh_is_ignored_until_first_completes() {
        let mut state = ready();
        let (_, actions) = send(&mut state, Event::RefreshRequested);
        assert!(matches!(
            actions.as_slice(),
            [Action::FetchCatalog { url, request }]
                if url == "http://localhost:8080/api/games?forceRefresh=1" && request.force
        ));

        assert_eq!(send(&mut state, Event::RefreshRequested), (false, vec![]));

        respond(&mut state, &actions, CATALOG);
        assert!(!state.refresh.is_refreshing());
        assert_eq!(state.refresh.cache_version().get(), 1);

        let (_, actions) = send(&mut state, Event::RefreshRequested);
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn refresh_before_permissions_does_nothing() {
        let mut state = AppState::new(Theme::default(), DEFAULT_SERVER_URL);
        let (_, actions) = send(&mut state, Event::RefreshRequested);
        assert!(actions.is_empty());
        assert!(!state.refresh.is_refreshing());
    }

    #[test]
    fn reload_ticks_reschedule_and_skip_while_refreshing() {
        let mut state = ready();
        state.reload_interval = Some(60);

        let (_, actions) = send(&mut state, Event::ReloadTick);
        assert_eq!(actions.len(), 2);
        assert!(!fetch_of(&actions).force);
        assert_eq!(actions[1], Action::ScheduleReload { seconds: 60 });

        send(&mut state, Event::RefreshRequested);
        let (_, actions) = send(&mut state, Event::ReloadTick);
        assert_eq!(actions, vec![Action::ScheduleReload { seconds: 60 }]);
    }

    #[test]
    fn late_reload_answer_cannot_undo_a_refresh() {
        let mut state = ready();
        state.reload_interval = Some(60);

        let (_, tick) = send(&mut state, Event::ReloadTick);
        let (_, refresh) = send(&mut state, Event::RefreshRequested);
        respond(&mut state, &refresh, r#"[{"id":"b","name":"Beta","sizeBytes":50}]"#);

        let (render, _) = respond(&mut state, &tick, CATALOG);
        assert!(!render);
        assert_eq!(visible(&state), ["b"]);
        assert!(!state.store.has(&ItemId::from("a")));
    }

    #[test]
    fn permissions_arm_reload_timer() {
        let mut state = AppState::new(Theme::default(), DEFAULT_SERVER_URL);
        state.reload_interval = Some(300);
        let (_, actions) = send(&mut state, Event::PermissionsGranted);
        assert_eq!(actions.last(), Some(&Action::ScheduleReload { seconds: 300 }));
    }

    #[test]
    fn download_reports_outcome() {
        let mut state = ready();
        let (_, actions) = send(&mut state, Event::DownloadSelected);
        assert_eq!(
            actions,
            vec![Action::Download {
                id: ItemId::from("a"),
                url: "http://localhost:8080/download/a".to_string(),
                destination: "./Alpha.zip".to_string(),
            }]
        );

        send(
            &mut state,
            Event::DownloadFinished {
                id: ItemId::from("a"),
                exit_code: Some(22),
                stderr: "curl: (22) The requested URL returned error: 404\n".to_string(),
            },
        );
        let status = state.status.clone().unwrap();
        assert!(status.is_error);
        assert!(status.text.contains("Alpha"));
        assert!(status.text.ends_with("error: 404"));

        send(
            &mut state,
            Event::DownloadFinished {
                id: ItemId::from("a"),
                exit_code: Some(0),
                stderr: String::new(),
            },
        );
        assert_eq!(state.status, Some(StatusLine::info("Downloaded Alpha")));
    }

    #[test]
    fn download_with_nothing_visible_is_noop() {
        let mut state = ready();
        send(&mut state, Event::SearchMode);
        send(&mut state, Event::Char('z'));
        assert_eq!(send(&mut state, Event::DownloadSelected), (false, vec![]));
    }
}
