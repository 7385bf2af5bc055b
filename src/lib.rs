//! GameShelf: a Zellij plugin for browsing a game library server.
//!
//! GameShelf lists the games a catalog server exposes and lets the user:
//! - Sort by name or archive size
//! - Fuzzy-filter by name while keeping every row's slot in the sort order
//! - Force the server to rescan its library, with cover URLs versioned so a
//!   refreshed cover is never served from a stale cache
//! - Download a game's zip to the host filesystem

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Events, actions
//! │  - Event handling, selection, view model            │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Catalog Core  │   │ Remote        │
//! │ (ui/)         │   │ (catalog/)    │   │ (remote/)     │
//! │ - Rendering   │   │ - ItemStore   │   │ - Endpoints   │
//! │ - Theming     │   │ - ViewEngine  │   │ - Decoding    │
//! │ - Components  │   │ - Refresh     │   │ - Req. tags   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Sandbox paths (infrastructure/)                  │
//! │  - Error types, item model (domain/)                │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/gameshelf.wasm" {
//!         server_url "http://nas.local:8080"
//!         theme "catppuccin-mocha"
//!         reload_interval "300"
//!         download_dir "~/Games"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Flow
//!
//! 1. **Load**: parse config, initialize tracing, build `AppState`, request
//!    web and command permissions.
//! 2. **Permissions granted**: issue the initial catalog request and arm the
//!    reload timer.
//! 3. **Web request result**: decode the listing and hand it to the
//!    refresh coordinator, which merges or replaces the store.
//! 4. **Keys**: navigate, search, sort, refresh (`r`), download (`Enter`).
//!
//! # Example
//!
//! ```rust
//! use gameshelf::{handle_event, initialize, Action, Config, Event};
//!
//! let config = Config::default();
//! let mut state = initialize(&config);
//!
//! let (_, actions) = handle_event(&mut state, &Event::PermissionsGranted)?;
//! let Some(Action::FetchCatalog { request, .. }) = actions.first() else {
//!     panic!("expected the initial catalog fetch");
//! };
//! handle_event(&mut state, &Event::CatalogResponse {
//!     request: *request,
//!     status: 200,
//!     body: br#"[{"id":"doom","name":"DOOM","sizeBytes":2048}]"#.to_vec(),
//! })?;
//! assert_eq!(state.store.len(), 1);
//! # Ok::<(), gameshelf::ShelfError>(())
//! ```

pub mod app;
pub mod catalog;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod remote;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event, InputMode, SearchFocus};
pub use catalog::{CacheVersion, ItemStore, RefreshCoordinator, SortKey, ViewEngine};
pub use domain::{ItemId, ItemRecord, Result, ShelfError};
pub use ui::Theme;

use app::state::DEFAULT_SERVER_URL;
use std::collections::BTreeMap;

/// Plugin configuration parsed from Zellij's configuration system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Catalog server base URL, without a trailing slash.
    ///
    /// Default: `http://localhost:8080`
    pub server_url: String,

    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`. Ignored if
    /// `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. `~/` resolves to the host home.
    pub theme_file: Option<String>,

    /// Tracing filter directive, e.g. `debug` or `gameshelf=trace`.
    ///
    /// Default: `"info"`
    pub trace_level: Option<String>,

    /// Seconds between incidental reloads; `None` disables them.
    pub reload_interval: Option<u64>,

    /// Download directory relative to the host home.
    ///
    /// Default: `"."`
    pub download_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            theme_name: None,
            theme_file: None,
            trace_level: None,
            reload_interval: None,
            download_dir: ".".to_string(),
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// # Parsing Rules
    ///
    /// - `server_url`: trimmed, trailing `/` removed, blank falls back to the default
    /// - `reload_interval`: seconds as `u64`; `0` or unparsable disables reloads
    /// - `download_dir`: leading `~/` dropped, blank means `.`
    /// - `theme`, `theme_file`, `trace_level`: taken as-is when non-blank
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use gameshelf::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("server_url".to_string(), "http://nas:9000/".to_string());
    /// map.insert("reload_interval".to_string(), "120".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.server_url, "http://nas:9000");
    /// assert_eq!(config.reload_interval, Some(120));
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let non_blank = |key: &str| {
            config
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(String::from)
        };

        let server_url = non_blank("server_url")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let reload_interval = non_blank("reload_interval").and_then(|raw| {
            parse_reload_interval(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "periodic reload disabled");
                None
            })
        });

        let download_dir = non_blank("download_dir")
            .map_or_else(|| ".".to_string(), |dir| infrastructure::command_relative(&dir));

        Self {
            server_url,
            theme_name: non_blank("theme"),
            theme_file: non_blank("theme_file"),
            trace_level: non_blank("trace_level"),
            reload_interval,
            download_dir,
        }
    }
}

/// Parses a reload interval in whole seconds; `0` means disabled.
///
/// # Errors
///
/// Returns [`ShelfError::Config`] if the value is not a non-negative integer.
fn parse_reload_interval(raw: &str) -> Result<Option<u64>> {
    let seconds = raw
        .parse::<u64>()
        .map_err(|e| ShelfError::Config(format!("reload_interval {raw:?}: {e}")))?;
    Ok((seconds > 0).then_some(seconds))
}

/// Resolves the theme: file first, then built-in name, then the default.
///
/// Failures are logged and fall through to the default theme.
fn resolve_theme(config: &Config) -> Theme {
    if let Some(theme_file) = &config.theme_file {
        match Theme::from_file(infrastructure::expand_tilde(theme_file)) {
            Ok(theme) => return theme,
            Err(e) => {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
            }
        }
    } else if let Some(theme_name) = &config.theme_name {
        match Theme::from_name(theme_name) {
            Some(theme) => return theme,
            None => tracing::warn!(theme_name = %theme_name, "unknown theme, using default"),
        }
    }

    Theme::default()
}

/// Initializes the plugin state from configuration.
///
/// The returned state has an empty store; the first catalog request goes out
/// once Zellij grants permissions.
///
/// # Example
///
/// ```rust
/// use gameshelf::{initialize, Config};
///
/// let config = Config {
///     theme_name: Some("catppuccin-latte".to_string()),
///     reload_interval: Some(60),
///     ..Default::default()
/// };
///
/// let state = initialize(&config);
/// assert_eq!(state.theme.name, "catppuccin-latte");
/// assert_eq!(state.reload_interval, Some(60));
/// ```
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(server_url = %config.server_url, "initializing gameshelf plugin");

    let mut state = AppState::new(resolve_theme(config), config.server_url.clone());
    state.download_dir.clone_from(&config.download_dir);
    state.reload_interval = config.reload_interval;
    state
}
