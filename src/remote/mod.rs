//! Adapter for the external catalog server.
//!
//! The server is a collaborator, not part of this crate: it lists games at
//! `/api/games`, serves covers at `/covers/{id}` and zips at `/download/{id}`.
//! This module knows how to address it and how to read its answers.
//!
//! In the plugin, requests go out through Zellij's `web_request` and results
//! come back later as events. Each request carries a [`RequestTag`] in its
//! context map so the result can be routed to the right handler event.
//! [`CatalogSource`] is the synchronous seam used by
//! [`RefreshCoordinator::load`](crate::catalog::RefreshCoordinator::load).
//!
//! - [`endpoints`]: URL and filename construction
//! - [`response`]: Response decoding and failure degradation

pub mod endpoints;
pub mod response;

pub use response::{decode_catalog, records_or_empty};

use crate::catalog::{CacheVersion, FetchRequest};
use crate::domain::{ItemId, ItemRecord, Result};
use std::collections::BTreeMap;

/// Context key naming the kind of request.
const KIND_KEY: &str = "gameshelf";

/// Context key carrying the force-rescan flag of a catalog request.
const FORCE_KEY: &str = "force";

/// Context key carrying the snapshot generation of a catalog request.
const GENERATION_KEY: &str = "generation";

/// Context key carrying the item of a download.
const ID_KEY: &str = "id";

/// Something that can list the catalog synchronously.
///
/// Implementations report transport and decoding problems as errors; the
/// coordinator degrades them to an empty list.
pub trait CatalogSource {
    /// Lists the catalog, asking the server to rescan first when `force_rescan`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog could not be fetched or decoded.
    fn list(&mut self, force_rescan: bool) -> Result<Vec<ItemRecord>>;
}

/// Identifies which outstanding request an asynchronous result belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTag {
    /// A catalog listing, carrying the request to hand back to the coordinator.
    Catalog(FetchRequest),
    /// A game download run through `curl`.
    Download {
        /// Item being downloaded.
        id: ItemId,
    },
}

impl RequestTag {
    /// Serializes the tag into a Zellij request context map.
    #[must_use]
    pub fn to_context(&self) -> BTreeMap<String, String> {
        let mut context = BTreeMap::new();
        match self {
            Self::Catalog(request) => {
                context.insert(KIND_KEY.to_string(), "catalog".to_string());
                let flag = if request.force { "1" } else { "0" };
                context.insert(FORCE_KEY.to_string(), flag.to_string());
                context.insert(GENERATION_KEY.to_string(), request.generation.to_string());
            }
            Self::Download { id } => {
                context.insert(KIND_KEY.to_string(), "download".to_string());
                context.insert(ID_KEY.to_string(), id.to_string());
            }
        }
        context
    }

    /// Reads a tag back from a result's context map.
    ///
    /// Returns `None` for results this plugin did not request.
    #[must_use]
    pub fn from_context(context: &BTreeMap<String, String>) -> Option<Self> {
        match context.get(KIND_KEY).map(String::as_str) {
            Some("catalog") => {
                let generation = context.get(GENERATION_KEY)?.parse::<u64>().ok()?;
                Some(Self::Catalog(FetchRequest {
                    force: context.get(FORCE_KEY).is_some_and(|v| v == "1"),
                    generation: CacheVersion::from(generation),
                }))
            }
            Some("download") => context.get(ID_KEY).map(|id| Self::Download {
                id: ItemId::new(id.clone()),
            }),
            _ => None,
        }
    }
}
