//! Error types for the GameShelf plugin.
//!
//! [`ShelfError`] is the single error type used across the crate, derived with
//! `thiserror`. The catalog core never surfaces these to its callers: fetch
//! errors are logged and degraded to an empty result before they reach the
//! [`RefreshCoordinator`](crate::catalog::RefreshCoordinator).

use thiserror::Error;

/// The main error type for GameShelf operations.
#[derive(Debug, Error)]
pub enum ShelfError {
    /// The catalog server answered with a non-200 status.
    #[error("HTTP error: server returned status {status}")]
    Http {
        /// Status code of the response.
        status: u16,
    },

    /// A response body could not be decoded as a catalog.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShelfError {
    /// Returns `true` for errors raised while talking to the catalog server.
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Decode(_))
    }
}

/// A specialized `Result` type for GameShelf operations.
pub type Result<T> = std::result::Result<T, ShelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_mentions_status() {
        let err = ShelfError::Http { status: 503 };
        assert_eq!(err.to_string(), "HTTP error: server returned status 503");
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn theme_error_is_not_a_fetch_failure() {
        assert!(!ShelfError::Theme("bad".to_string()).is_fetch_failure());
    }
}
