//! # fatnode
//!
//! Multiversion in-memory collections built from fat-node timelines.
//!
//! ## Overview
//!
//! Every collection in this crate remembers each state it has ever been in.
//! Mutations publish a new version number; reads take an optional version
//! and reconstruct that snapshot with floor lookups instead of copies.
//!
//! - **`VersionedArray`**: fixed slots plus a versioned length
//! - **`VersionedList`**: doubly linked list whose links are versioned
//! - **`VersionedMap`**: ordered map with tombstone deletion
//!
//! ## Feature Flags
//!
//! - `array`: [`versioned::VersionedArray`]
//! - `list`: [`versioned::VersionedList`]
//! - `map`: [`versioned::VersionedMap`]
//!
//! All three are enabled by default.
//!
//! ## Example
//!
//! ```rust
//! # #[cfg(feature = "array")]
//! # {
//! use fatnode::prelude::*;
//!
//! let mut array = VersionedArray::with_capacity(5);
//! let version = array.set(3, 40).unwrap();
//! array.set(3, 42).unwrap();
//!
//! assert_eq!(array.get_at(3, version), Ok(Some(&40)));
//! assert_eq!(array.get(3), Ok(Some(&42)));
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the collections, the version types and the error types.
///
/// # Usage
///
/// ```rust
/// use fatnode::prelude::*;
/// ```
pub mod prelude {
    pub use crate::versioned::*;
}

pub mod versioned;
