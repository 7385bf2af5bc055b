//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler never talks to Zellij directly. It returns a list of
//! [`Action`]s and the plugin shim in `main.rs` turns each one into the
//! matching host call (`web_request`, `run_command`, `set_timeout`,
//! `hide_self`).
//!
//! # Example
//!
//! ```rust
//! use gameshelf::app::Action;
//! use gameshelf::catalog::{CacheVersion, FetchRequest};
//!
//! let actions = vec![
//!     Action::FetchCatalog {
//!         url: "http://localhost:8080/api/games".to_string(),
//!         request: FetchRequest { force: false, generation: CacheVersion::default() },
//!     },
//!     Action::ScheduleReload { seconds: 300 },
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::catalog::FetchRequest;
use crate::domain::ItemId;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    ///
    /// Sent when the user explicitly requests to exit the plugin (e.g., pressing 'q').
    CloseFocus,

    /// Issues a `GET` for the catalog listing.
    ///
    /// The result comes back later as a web request event tagged with
    /// `request`, so the handler can match it to the snapshot it was issued
    /// against.
    FetchCatalog {
        /// Absolute URL of the listing endpoint.
        url: String,
        /// Rescan flag and snapshot generation of this fetch.
        request: FetchRequest,
    },

    /// Downloads a game archive to the local filesystem.
    ///
    /// Executed as a `curl` command on the host; its exit status is reported
    /// back as a command result event.
    Download {
        /// Item being downloaded.
        id: ItemId,
        /// Absolute URL of the archive.
        url: String,
        /// Target file path relative to the host working directory.
        destination: String,
    },

    /// Arms the timer for the next incidental reload.
    ScheduleReload {
        /// Delay before the next tick.
        seconds: u64,
    },
}
