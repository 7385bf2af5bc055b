//! Catalog core: the item store, the view engine and the refresh coordinator.
//!
//! Ownership is split so that each piece of shared state has one writer:
//!
//! - [`store`]: [`ItemStore`] holds records and their visual handles. Only
//!   [`RefreshCoordinator`] mutates it.
//! - [`view`]: [`ViewEngine`] derives display order and visibility. It only
//!   reads the store.
//! - [`refresh`]: [`RefreshCoordinator`] serializes forced refreshes and
//!   applies fetch results.
//! - [`cache`]: [`CacheVersion`] tags cover URLs with a refresh generation.

pub mod cache;
pub mod refresh;
pub mod store;
pub mod view;

pub use cache::CacheVersion;
pub use refresh::{FetchRequest, LoadOutcome, RefreshCoordinator, RefreshState};
pub use store::{HandleId, ItemStore, VisualHandle};
pub use view::{compute_view, fuzzy_match, SortKey, ViewEngine, ViewState};
