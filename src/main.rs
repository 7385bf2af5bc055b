//! Zellij plugin wrapper and entry point.
//!
//! This module is the thin integration layer between the GameShelf library
//! and the Zellij plugin system. It implements `ZellijPlugin`, translates
//! host events into library [`Event`]s and turns the returned [`Action`]s
//! into host calls.
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Register for Key, `WebRequestResult`, `RunCommandResult`,
//!    `Timer` and `PermissionRequestResult` events
//! 3. **Initial Load**: Fetch the catalog once permissions are granted
//! 4. **Periodic Reload**: Re-fetch on timer ticks when configured
//! 5. **Update**: Handle events, delegate to library layer
//! 6. **Render**: Call library render function
//!
//! # Result Routing
//!
//! Every web request and command carries a [`RequestTag`] in its context map.
//! Results without a recognised tag belong to someone else and are ignored.
//!
//! # Keybindings
//!
//! Global (all modes):
//! - `Ctrl+n`: Move down
//! - `Ctrl+p`: Move up
//!
//! In normal mode:
//! - `j`/`Down`: Move down
//! - `k`/`Up`: Move up
//! - `Enter`: Download selected game
//! - `/`: Enter search mode
//! - `r`: Refresh (server rescan)
//! - `1`-`4`: Sort by name A-Z, name Z-A, size ascending, size descending
//! - `o`: Cycle sort order
//! - `q`: Close plugin
//!
//! In search mode:
//! - Any character: Type into the query
//! - `Enter`: Move focus to results, then download
//! - `Esc`: Exit search
//! - `/`: Return to search input

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;

use gameshelf::catalog::SortKey;
use gameshelf::remote::RequestTag;
use gameshelf::{handle_event, Action, Config, Event, InputMode, SearchFocus};

register_plugin!(State);

/// Plugin state wrapper.
struct State {
    /// Core application state from library layer.
    app: gameshelf::AppState,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: gameshelf::initialize(&Config::default()),
        }
    }
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// # Permissions
    ///
    /// Requests:
    /// - `WebAccess`: Query the catalog server
    /// - `RunCommands`: Run `curl` for downloads
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        gameshelf::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(server_url = %config.server_url, reload_interval = ?config.reload_interval, "parsed configuration");
        self.app = gameshelf::initialize(&config);

        request_permission(&[PermissionType::WebAccess, PermissionType::RunCommands]);

        subscribe(&[
            EventType::Key,
            EventType::WebRequestResult,
            EventType::RunCommandResult,
            EventType::Timer,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Handles incoming Zellij events.
    ///
    /// Returns `true` if the UI should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                match RequestTag::from_context(&context) {
                    Some(RequestTag::Catalog(request)) => Event::CatalogResponse { request, status, body },
                    _ => {
                        tracing::debug!(status, "ignoring untagged web request result");
                        return false;
                    }
                }
            }
            zellij_tile::prelude::Event::RunCommandResult(exit_code, _stdout, stderr, context) => {
                match RequestTag::from_context(&context) {
                    Some(RequestTag::Download { id }) => Event::DownloadFinished {
                        id,
                        exit_code,
                        stderr: String::from_utf8_lossy(&stderr).into_owned(),
                    },
                    _ => {
                        tracing::debug!(exit_code = ?exit_code, "ignoring untagged command result");
                        return false;
                    }
                }
            }
            zellij_tile::prelude::Event::Timer(_) => Event::ReloadTick,
            zellij_tile::prelude::Event::PermissionRequestResult(PermissionStatus::Granted) => {
                Event::PermissionsGranted
            }
            zellij_tile::prelude::Event::PermissionRequestResult(PermissionStatus::Denied) => {
                tracing::warn!("permissions denied - catalog cannot be loaded");
                return false;
            }
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for a in actions {
                    Self::execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        gameshelf::ui::render(&self.app, rows, cols);
    }
}

impl State {
    /// Gets a string name for a Zellij event for logging purposes.
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::WebRequestResult(..) => "WebRequestResult".to_string(),
            zellij_tile::prelude::Event::RunCommandResult(..) => "RunCommandResult".to_string(),
            zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyDown);
        }
        if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyUp);
        }

        let mode = self.app.input_mode;

        if mode.is_search() {
            return Some(match key.bare_key {
                BareKey::Down => Event::KeyDown,
                BareKey::Up => Event::KeyUp,
                BareKey::Esc => Event::ExitSearch,
                BareKey::Enter if mode == InputMode::Search(SearchFocus::Typing) => {
                    Event::FocusResults
                }
                BareKey::Enter => Event::DownloadSelected,
                BareKey::Char('/') => Event::FocusSearchBar,
                BareKey::Backspace => Event::Backspace,
                BareKey::Char(c) => Event::Char(c),
                _ => return None,
            });
        }

        Some(match key.bare_key {
            BareKey::Down | BareKey::Char('j') => Event::KeyDown,
            BareKey::Up | BareKey::Char('k') => Event::KeyUp,
            BareKey::Esc => Event::Escape,
            BareKey::Enter => Event::DownloadSelected,
            BareKey::Char('/') => Event::SearchMode,
            BareKey::Char('r') => Event::RefreshRequested,
            BareKey::Char('o') => Event::CycleSort,
            BareKey::Char('q') => Event::CloseFocus,
            BareKey::Char(c @ '1'..='4') => {
                let index = (c as usize) - ('1' as usize);
                Event::SelectSort(SortKey::ALL[index])
            }
            _ => return None,
        })
    }

    /// Executes an action returned from event handling.
    ///
    /// Translates library actions to Zellij API calls.
    #[tracing::instrument(level = "debug")]
    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => hide_self(),
            Action::FetchCatalog { url, request } => {
                tracing::debug!(url = %url, force = request.force, generation = %request.generation, "fetching catalog");
                web_request(
                    url,
                    HttpVerb::Get,
                    BTreeMap::new(),
                    vec![],
                    RequestTag::Catalog(*request).to_context(),
                );
            }
            Action::Download { id, url, destination } => {
                tracing::debug!(id = %id, url = %url, destination = %destination, "starting download");
                run_command(
                    &["curl", "-fsSL", "--create-dirs", "-o", destination, url],
                    RequestTag::Download { id: id.clone() }.to_context(),
                );
            }
            Action::ScheduleReload { seconds } => {
                #[allow(clippy::cast_precision_loss)]
                set_timeout(*seconds as f64);
            }
        }
    }
}
