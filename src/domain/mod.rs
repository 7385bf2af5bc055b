//! Domain layer for the GameShelf plugin.
//!
//! Holds the types shared by every other layer, independent of Zellij APIs and
//! of the catalog server's transport.
//!
//! - [`error`]: Error types and result aliases
//! - [`item`]: The catalog record as served by `/api/games`
//!
//! ```
//! use gameshelf::domain::{ItemRecord, Result};
//!
//! fn parse(json: &str) -> Result<Vec<ItemRecord>> {
//!     Ok(serde_json::from_str(json)?)
//! }
//!
//! let items = parse(r#"[{"id":"doom","name":"DOOM","sizeBytes":2048}]"#).unwrap();
//! assert_eq!(items[0].id.as_str(), "doom");
//! assert!(!items[0].has_cover);
//! ```

pub mod error;
pub mod item;

pub use error::{Result, ShelfError};
pub use item::{format_size, ItemId, ItemRecord};
