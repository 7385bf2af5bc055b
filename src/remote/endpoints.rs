//! URL and filename construction for the catalog server's endpoints.
//!
//! Paths are built relative to the server root and joined with the configured
//! base URL only when a request is actually issued, so visual handles can hold
//! their cover path without knowing where the server lives.

use crate::catalog::CacheVersion;
use crate::domain::ItemId;

/// Catalog listing endpoint.
pub const CATALOG_PATH: &str = "/api/games";

/// Query string that asks the server to rescan its library before listing.
pub const FORCE_RESCAN_QUERY: &str = "forceRefresh=1";

/// Returns the catalog listing path, with the rescan flag when `force` is set.
///
/// ```
/// use gameshelf::remote::endpoints::catalog_path;
///
/// assert_eq!(catalog_path(false), "/api/games");
/// assert_eq!(catalog_path(true), "/api/games?forceRefresh=1");
/// ```
#[must_use]
pub fn catalog_path(force: bool) -> String {
    if force {
        format!("{CATALOG_PATH}?{FORCE_RESCAN_QUERY}")
    } else {
        CATALOG_PATH.to_string()
    }
}

/// Returns the cover image path for an item.
///
/// The `?v=` suffix is only added once the cache version has been bumped at
/// least once; before the first forced refresh every cover keeps its plain,
/// browser-cacheable path.
#[must_use]
pub fn cover_path(id: &ItemId, version: CacheVersion) -> String {
    let encoded = urlencoding::encode(id.as_str());
    if version.is_initial() {
        format!("/covers/{encoded}")
    } else {
        format!("/covers/{encoded}?v={version}")
    }
}

/// Returns the zip download path for an item.
#[must_use]
pub fn download_path(id: &ItemId) -> String {
    format!("/download/{}", urlencoding::encode(id.as_str()))
}

/// Joins a server base URL and an absolute path.
///
/// Trailing slashes on `base` are ignored so `http://host/` and `http://host`
/// behave the same.
#[must_use]
pub fn join(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

/// Builds the local file name for a downloaded game, mirroring the server's
/// `Content-Disposition` name: path separators and colons become `-`.
#[must_use]
pub fn download_file_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '-' } else { c })
        .collect();

    if sanitized.is_empty() {
        "download.zip".to_string()
    } else {
        format!("{sanitized}.zip")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_path_has_no_suffix_before_first_bump() {
        let id = ItemId::from("doom");
        assert_eq!(cover_path(&id, CacheVersion::default()), "/covers/doom");
    }

    #[test]
    fn cover_path_carries_version_after_bump() {
        let id = ItemId::from("doom");
        let version = CacheVersion::default().next().next();
        assert_eq!(cover_path(&id, version), "/covers/doom?v=2");
    }

    #[test]
    fn ids_are_percent_encoded() {
        let id = ItemId::from("half life/2?");
        assert_eq!(download_path(&id), "/download/half%20life%2F2%3F");
        assert_eq!(download_path(&ItemId::from("café")), "/download/caf%C3%A9");
        assert_eq!(
            cover_path(&ItemId::from("a-b_c.d~e!f*g'h(i)"), CacheVersion::default()),
            "/covers/a-b_c.d~e%21f%2Ag%27h%28i%29"
        );
    }

    #[test]
    fn join_ignores_trailing_slash() {
        assert_eq!(join("http://nas:8080/", "/api/games"), "http://nas:8080/api/games");
        assert_eq!(join("http://nas:8080", "/api/games"), "http://nas:8080/api/games");
    }

    #[test]
    fn download_file_name_is_sanitized() {
        assert_eq!(download_file_name("  Half-Life: Source "), "Half-Life- Source.zip");
        assert_eq!(download_file_name("AC/DC\\Live"), "AC-DC-Live.zip");
        assert_eq!(download_file_name("   "), "download.zip");
    }
}
