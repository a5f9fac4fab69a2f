//! Error types for the versioned collections.
//!
//! Every fallible operation in this module returns [`VersionedError`].
//! Errors are raised by validation, which always runs before any timeline
//! is written, so a failed call never consumes a version.
//!
//! Each variant maps to a stable [`ErrorKind`] identifier that callers can
//! match on without depending on the exact message text.

use super::Version;

/// Stable identifiers for the failure modes of the versioned collections.
///
/// # Examples
///
/// ```rust
/// use fatnode::versioned::{ErrorKind, VersionCounter};
///
/// let counter = VersionCounter::new();
/// let error = counter.check(5).unwrap_err();
/// assert_eq!(error.kind(), ErrorKind::VersionNotFound);
/// assert_eq!(error.kind().as_str(), "VersionNotFound");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested version has not been produced yet.
    VersionNotFound,
    /// An array index outside the array's length at the requested version.
    IndexOutOfRange,
    /// A list index outside the list's bounds at the requested version.
    ListIndexOutOfRange,
    /// Removal from a collection that is empty at the current version.
    Underflow,
    /// A cursor was advanced past one of its ends.
    ElementNotFound,
    /// A mutation was attempted through a read-only view.
    UnsupportedOperation,
}

impl ErrorKind {
    /// Returns the identifier of this kind as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VersionNotFound => "VersionNotFound",
            Self::IndexOutOfRange => "IndexOutOfRange",
            Self::ListIndexOutOfRange => "ListIndexOutOfRange",
            Self::Underflow => "Underflow",
            Self::ElementNotFound => "ElementNotFound",
            Self::UnsupportedOperation => "UnsupportedOperation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Represents errors raised by the versioned collections.
///
/// # Examples
///
/// ```rust
/// use fatnode::versioned::VersionedError;
///
/// let error = VersionedError::Underflow;
/// assert_eq!(
///     format!("{error}"),
///     "Cannot remove element from empty collection"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VersionedError {
    /// The requested version is newer than the current version, or older
    /// than the first entry of the timeline that was read.
    #[error("Such version does not exist: {0}")]
    VersionNotFound(Version),

    /// An array index was not below the array's length.
    #[error("Array index out of bounds: index {index}, length {length}")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The array length at the version that was checked.
        length: usize,
    },

    /// A list index was outside the list's bounds.
    #[error("List index out of bounds: index {index}, size {size}")]
    ListIndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The list size at the version that was checked.
        size: usize,
    },

    /// Nothing to remove at the current version.
    #[error("Cannot remove element from empty collection")]
    Underflow,

    /// A cursor ran past the first or last element.
    #[error("Such element does not exist")]
    ElementNotFound,

    /// Mutation attempted through a cursor.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}

impl VersionedError {
    /// Returns the stable identifier of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::VersionNotFound(_) => ErrorKind::VersionNotFound,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::ListIndexOutOfRange { .. } => ErrorKind::ListIndexOutOfRange,
            Self::Underflow => ErrorKind::Underflow,
            Self::ElementNotFound => ErrorKind::ElementNotFound,
            Self::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
        }
    }
}

/// Result alias used throughout the versioned collections.
pub type Result<T> = std::result::Result<T, VersionedError>;
