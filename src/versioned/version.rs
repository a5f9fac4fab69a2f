//! Version numbers and the per-collection version counter.

use super::error::{Result, VersionedError};

/// Identifies one snapshot of a collection's state.
///
/// Version `0` is the state a collection was constructed with. Every
/// successful mutation produces the next version.
pub type Version = u64;

/// The version counter owned by a single collection.
///
/// The counter only moves forward, one step per published mutation. It is
/// not shared between collections: two collections created side by side
/// both start at version `0`.
///
/// # Examples
///
/// ```rust
/// use fatnode::versioned::VersionCounter;
///
/// let mut counter = VersionCounter::new();
/// assert_eq!(counter.current(), 0);
/// assert_eq!(counter.advance(), 1);
/// assert!(counter.check(1).is_ok());
/// assert!(counter.check(2).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionCounter {
    current: Version,
}

impl VersionCounter {
    /// Creates a counter positioned at version `0`.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { current: 0 }
    }

    /// Returns the newest published version.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> Version {
        self.current
    }

    /// Publishes the next version and returns it.
    #[inline]
    pub const fn advance(&mut self) -> Version {
        self.current += 1;
        self.current
    }

    /// Returns the version about to be published, without publishing it.
    #[inline]
    #[must_use]
    pub const fn next(&self) -> Version {
        self.current + 1
    }

    /// Checks that `version` has already been published.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` is newer than
    /// [`current`](Self::current).
    #[inline]
    pub const fn check(&self, version: Version) -> Result<Version> {
        if version > self.current {
            Err(VersionedError::VersionNotFound(version))
        } else {
            Ok(version)
        }
    }
}
