//! Load and forced-refresh orchestration.
//!
//! The coordinator is a two-state machine, `Idle` and `Refreshing`. A forced
//! load may only start from `Idle`; a second forced load while one is in
//! flight is dropped, not queued, and performs no network round-trip. Once
//! started, a refresh always runs to completion and returns to `Idle`
//! whatever the fetch produced.
//!
//! Because the plugin receives network results as later events, a load is
//! split into [`RefreshCoordinator::begin`] (guard + request) and
//! [`RefreshCoordinator::complete`] (apply result). [`RefreshCoordinator::load`]
//! runs both around a synchronous [`CatalogSource`].
//!
//! Every request records the snapshot generation it was issued against. A
//! plain result that comes back after a forced refresh replaced that snapshot
//! is dropped, so it cannot merge removed items back in.

use super::cache::CacheVersion;
use super::store::ItemStore;
use super::view::ViewEngine;
use crate::domain::{ItemRecord, Result};
use crate::remote::{endpoints, records_or_empty, CatalogSource};

/// Refresh lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    Refreshing,
}

/// A catalog fetch the caller must perform.
///
/// Hand it back unchanged to [`RefreshCoordinator::complete`] with the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Ask the server to rescan before listing.
    pub force: bool,
    /// Snapshot generation current when the request was issued.
    pub generation: CacheVersion,
}

impl FetchRequest {
    /// Path of the catalog endpoint for this request.
    #[must_use]
    pub fn path(&self) -> String {
        endpoints::catalog_path(self.force)
    }
}

/// What a load did to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A forced load was requested while another was in flight; nothing happened.
    Rejected,
    /// A result no longer applies to the current snapshot and was dropped:
    /// either a forced result with no refresh in flight, or a plain result
    /// issued before the last forced refresh.
    Stale,
    /// A forced load replaced the whole store.
    Replaced {
        items: usize,
        version: CacheVersion,
        /// The fetch failed and the empty list stands in for it.
        failed: bool,
    },
    /// A plain load merged unseen items into the store.
    Merged {
        added: usize,
        total: usize,
        /// The fetch failed and the empty list stands in for it.
        failed: bool,
    },
}

impl LoadOutcome {
    /// Returns `true` if the load applied an empty list in place of a failed fetch.
    #[must_use]
    pub const fn failed(&self) -> bool {
        matches!(
            self,
            Self::Replaced { failed: true, .. } | Self::Merged { failed: true, .. }
        )
    }
}

/// Serializes forced refreshes and applies fetch results to the store and view.
#[derive(Debug, Clone, Default)]
pub struct RefreshCoordinator {
    state: RefreshState,
    version: CacheVersion,
    last_loaded_at: Option<i64>,
    last_failed: bool,
}

impl RefreshCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a load.
    ///
    /// Returns the fetch to perform, or `None` if `force` is set while a
    /// forced refresh is already in flight. A forced start moves the
    /// coordinator to [`RefreshState::Refreshing`].
    pub fn begin(&mut self, force: bool) -> Option<FetchRequest> {
        if force {
            if self.state == RefreshState::Refreshing {
                tracing::debug!("refresh already in flight, ignoring request");
                return None;
            }
            self.state = RefreshState::Refreshing;
            tracing::info!("forced refresh started");
        }
        Some(FetchRequest {
            force,
            generation: self.version,
        })
    }

    /// Applies the result of a fetch started by [`Self::begin`].
    ///
    /// A failed fetch is applied as an empty list. On a forced load the cache
    /// version is bumped, the store is rebuilt, the search query is cleared
    /// and the coordinator returns to `Idle`. On a plain load only unseen
    /// items are added. Either way the view is recomputed.
    ///
    /// A forced result with no refresh in flight, or a plain result whose
    /// generation predates the current one, returns [`LoadOutcome::Stale`]
    /// without touching the store.
    pub fn complete(
        &mut self,
        request: FetchRequest,
        result: Result<Vec<ItemRecord>>,
        store: &mut ItemStore,
        view: &mut ViewEngine,
    ) -> LoadOutcome {
        let force = request.force;
        if force && self.state == RefreshState::Idle {
            tracing::debug!("forced result without a refresh in flight, dropping");
            return LoadOutcome::Stale;
        }
        if !force && request.generation < self.version {
            tracing::debug!(
                generation = %request.generation,
                cache_version = %self.version,
                "plain result predates the last forced refresh, dropping"
            );
            return LoadOutcome::Stale;
        }

        let (records, failed) = records_or_empty(result);
        self.last_failed = failed;
        self.last_loaded_at = Some(chrono::Utc::now().timestamp());

        if force {
            self.version = self.version.next();
            let items = store.replace_all(records, self.version);
            view.clear_search(store);
            self.state = RefreshState::Idle;

            tracing::info!(items, cache_version = %self.version, failed, "forced refresh complete");
            LoadOutcome::Replaced {
                items,
                version: self.version,
                failed,
            }
        } else {
            let added = store.merge_new(records, self.version);
            view.recompute(store);

            tracing::debug!(added, total = store.len(), failed, "catalog load complete");
            LoadOutcome::Merged {
                added,
                total: store.len(),
                failed,
            }
        }
    }

    /// Runs a complete load against a synchronous source.
    pub fn load<S>(
        &mut self,
        source: &mut S,
        force: bool,
        store: &mut ItemStore,
        view: &mut ViewEngine,
    ) -> LoadOutcome
    where
        S: CatalogSource + ?Sized,
    {
        let Some(request) = self.begin(force) else {
            return LoadOutcome::Rejected;
        };
        let result = source.list(request.force);
        self.complete(request, result, store, view)
    }

    #[must_use]
    pub const fn state(&self) -> RefreshState {
        self.state
    }

    /// Observational only: the lock itself lives in [`Self::begin`].
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.state == RefreshState::Refreshing
    }

    #[must_use]
    pub const fn cache_version(&self) -> CacheVersion {
        self.version
    }

    /// Unix timestamp of the last applied load, if any.
    #[must_use]
    pub const fn last_loaded_at(&self) -> Option<i64> {
        self.last_loaded_at
    }

    /// Whether the last applied load stood in for a failed fetch.
    #[must_use]
    pub const fn last_load_failed(&self) -> bool {
        self.last_failed
    }
}
