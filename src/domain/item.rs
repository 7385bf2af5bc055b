//! Catalog item model.
//!
//! An [`ItemRecord`] is one game as reported by the catalog server. Records are
//! read-only input: the plugin never edits them, it only keys its own state on
//! their [`ItemId`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit labels used by [`format_size`], in 1024 steps.
const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Stable, opaque identifier of a catalog item.
///
/// The server derives it from the game's directory name; the plugin only ever
/// compares it and embeds it in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wraps a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One catalog entry as returned by `GET /api/games`.
///
/// `name` and `size_bytes` may change between refreshes for the same `id`;
/// identity never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    pub size_bytes: u64,
    #[serde(default)]
    pub has_cover: bool,
}

impl ItemRecord {
    /// Creates a record without a cover.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            size_bytes,
            has_cover: false,
        }
    }

    /// Marks the record as having a cover image on the server.
    #[must_use]
    pub const fn with_cover(mut self) -> Self {
        self.has_cover = true;
        self
    }
}

/// Formats a byte count for display, e.g. `"1.5 GB"`.
///
/// Zero is rendered as `"0 B"`; everything else uses one decimal place and the
/// largest unit that keeps the value at or above 1.
///
/// ```
/// use gameshelf::domain::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// ```
#[must_use]
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.1} {}", SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_server_json() {
        let json = r#"{"id":"half-life-2","name":"Half-Life 2","sizeBytes":6442450944,"hasCover":true}"#;
        let record: ItemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, ItemId::from("half-life-2"));
        assert_eq!(record.name, "Half-Life 2");
        assert_eq!(record.size_bytes, 6_442_450_944);
        assert!(record.has_cover);
    }

    #[test]
    fn has_cover_is_optional() {
        let record: ItemRecord =
            serde_json::from_str(r#"{"id":"a","name":"Alpha","sizeBytes":1}"#).unwrap();
        assert!(!record.has_cover);
    }

    #[test]
    fn negative_size_is_rejected() {
        let result = serde_json::from_str::<ItemRecord>(r#"{"id":"a","name":"A","sizeBytes":-1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512.0 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(6_442_450_944), "6.0 GB");
        assert_eq!(format_size(3 * 1024_u64.pow(5)), "3072.0 TB");
    }
}
