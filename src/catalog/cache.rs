//! Cover cache generation counter.

use std::fmt;

/// Generation of per-item cover resources.
///
/// Starts at zero and is bumped exactly once per completed forced refresh.
/// Handles created while the version is non-zero embed it in their cover URL,
/// so a refreshed cover is a new resource to any HTTP cache while covers
/// fetched before the bump stay valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheVersion(u64);

impl CacheVersion {
    /// Returns the following generation.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns `true` until the first bump.
    #[must_use]
    pub const fn is_initial(self) -> bool {
        self.0 == 0
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for CacheVersion {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CacheVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_initial_and_increments() {
        let v = CacheVersion::default();
        assert!(v.is_initial());
        let bumped = v.next();
        assert!(!bumped.is_initial());
        assert_eq!(bumped.get(), 1);
        assert!(bumped > v);
    }
}
