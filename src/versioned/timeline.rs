//! Versioned cell with floor lookup.
//!
//! A [`Timeline`] is the "fat node" building block of every collection in
//! this module: instead of holding one value it holds the value of every
//! version at which it was written, and answers "what was the value at or
//! before version V" with a binary search.
//!
//! # Time Complexity
//!
//! | Operation | Complexity        |
//! |-----------|-------------------|
//! | `read`    | O(log entries)    |
//! | `write`   | O(1) amortized    |
//! | `latest`  | O(1)              |
//!
//! Most slots of a collection change rarely, so entries are stored inline
//! until the timeline grows past [`INLINE_ENTRIES`].

use smallvec::SmallVec;

use super::Version;
use super::error::{Result, VersionedError};

/// Number of entries a timeline stores without a heap allocation.
const INLINE_ENTRIES: usize = 2;

const ORDER_INVARIANT_PANIC_MESSAGE: &str =
    "Timeline::write: version is older than the latest entry";

/// A value together with the history of every version it was written at.
///
/// Entries are append-only. A write at a version equal to the latest entry
/// replaces that entry; collections rely on this while a batch operation is
/// still assembling the version it is about to publish.
///
/// # Examples
///
/// ```rust
/// use fatnode::versioned::Timeline;
///
/// let mut timeline = Timeline::starting_at(0, "a");
/// timeline.write(3, "b");
///
/// assert_eq!(timeline.read(0), Ok(&"a"));
/// assert_eq!(timeline.read(2), Ok(&"a"));
/// assert_eq!(timeline.read(3), Ok(&"b"));
/// assert_eq!(timeline.read(100), Ok(&"b"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Timeline<T> {
    entries: SmallVec<[(Version, T); INLINE_ENTRIES]>,
}

impl<T> Timeline<T> {
    /// Creates a timeline with no entries.
    ///
    /// Every read fails until the first write.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Creates a timeline whose first entry is `value` at `version`.
    #[inline]
    #[must_use]
    pub fn starting_at(version: Version, value: T) -> Self {
        let mut timeline = Self::new();
        timeline.entries.push((version, value));
        timeline
    }

    /// Returns the value of the latest entry at or before `version`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` precedes the
    /// first entry. Checking `version` against the owning collection's
    /// current version is the caller's job.
    pub fn read(&self, version: Version) -> Result<&T> {
        let position = self
            .entries
            .partition_point(|(entry_version, _)| *entry_version <= version);
        position
            .checked_sub(1)
            .map(|index| &self.entries[index].1)
            .ok_or(VersionedError::VersionNotFound(version))
    }

    /// Records `value` as the state at `version`.
    ///
    /// `version` must not be older than the latest entry. Writing at the
    /// latest entry's version replaces it.
    pub fn write(&mut self, version: Version, value: T) {
        match self.entries.last_mut() {
            Some((last_version, last_value)) if *last_version == version => {
                *last_value = value;
            }
            last => {
                debug_assert!(
                    last.is_none_or(|(last_version, _)| *last_version < version),
                    "{ORDER_INVARIANT_PANIC_MESSAGE}"
                );
                self.entries.push((version, value));
            }
        }
    }

    /// Returns the most recently written value.
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.entries.last().map(|(_, value)| value)
    }

    /// Returns the version of the first entry.
    #[inline]
    #[must_use]
    pub fn first_version(&self) -> Option<Version> {
        self.entries.first().map(|(version, _)| *version)
    }

    /// Returns the version of the latest entry.
    #[inline]
    #[must_use]
    pub fn last_version(&self) -> Option<Version> {
        self.entries.last().map(|(version, _)| *version)
    }

    /// Returns the number of recorded entries.
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been written yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in version order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Version, &T)> + '_ {
        self.entries.iter().map(|(version, value)| (*version, value))
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Timeline<T> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_map()
            .entries(self.entries.iter().map(|(version, value)| (version, value)))
            .finish()
    }
}
