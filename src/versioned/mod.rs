//! Multiversion (persistent-history) collections.
//!
//! This module provides collections that keep every state they have ever
//! been in. Each mutation publishes a new [`Version`]; any published version
//! can be read back at any time, while mutations always apply to the newest
//! one.
//!
//! - [`VersionedArray`]: indexable slots with a versioned length
//! - [`VersionedList`]: doubly linked list with versioned links
//! - [`VersionedMap`]: ordered map with tombstone deletion
//!
//! # Fat Nodes
//!
//! Nothing is copied when a new version is published. Every structural
//! element (an array slot, a list node's value and links, a map entry) is a
//! [`Timeline`] recording the value it had at each version where it
//! changed. Reading version `V` is a floor lookup: the entry with the
//! greatest version not above `V`.
//!
//! ```text
//! slot 3:  {0: None, 1: 40, 2: 42, 3: 36}
//! get(3, 0) = None   get(3, 1) = 40   get(3, 2) = 42   get(3) = 36
//! ```
//!
//! # Versions
//!
//! Each collection owns its own [`VersionCounter`], starting at `0`.
//! A successful mutation advances it by exactly one, batch operations
//! included. Validation always happens first, so a failed call leaves the
//! counter and every timeline untouched, and a call that would change
//! nothing publishes no version.
//!
//! Mutation requires `&mut self`; reads at any version only need `&self`
//! and may be shared freely.
//!
//! # Examples
//!
//! Every collection module carries its own examples; they build only with
//! the matching feature. The [`Timeline`] underneath them is always
//! available:
//!
//! ```rust
//! use fatnode::versioned::{Timeline, VersionCounter};
//!
//! let mut counter = VersionCounter::new();
//! let mut slot = Timeline::starting_at(counter.current(), None);
//! slot.write(counter.advance(), Some(40));
//! slot.write(counter.advance(), Some(42));
//!
//! assert_eq!(slot.read(0), Ok(&None));
//! assert_eq!(slot.read(1), Ok(&Some(40)));
//! assert_eq!(slot.read(counter.current()), Ok(&Some(42)));
//! assert!(counter.check(3).is_err());
//! ```

mod error;
mod timeline;
mod version;

#[cfg(feature = "array")]
mod array;
#[cfg(feature = "list")]
mod list;
#[cfg(feature = "map")]
mod map;

pub use error::ErrorKind;
pub use error::Result;
pub use error::VersionedError;
pub use timeline::Timeline;
pub use version::Version;
pub use version::VersionCounter;

#[cfg(feature = "array")]
pub use array::DEFAULT_CAPACITY;
#[cfg(feature = "array")]
pub use array::VersionedArray;
#[cfg(feature = "list")]
pub use list::VersionedList;
#[cfg(feature = "list")]
pub use list::VersionedListCursor;
#[cfg(feature = "list")]
pub use list::VersionedListIter;
#[cfg(feature = "map")]
pub use map::VersionedMap;
#[cfg(feature = "map")]
pub use map::VersionedMapIter;

// Shared reads are safe across threads whenever the element types are.
static_assertions::assert_impl_all!(Timeline<i32>: Send, Sync, Clone);
static_assertions::assert_impl_all!(VersionedError: Send, Sync, Copy, std::error::Error);
#[cfg(feature = "array")]
static_assertions::assert_impl_all!(VersionedArray<String>: Send, Sync, Clone);
#[cfg(feature = "list")]
static_assertions::assert_impl_all!(VersionedList<String>: Send, Sync, Clone);
#[cfg(feature = "map")]
static_assertions::assert_impl_all!(VersionedMap<String, String>: Send, Sync, Clone);
