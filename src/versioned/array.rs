//! Multiversion array.
//!
//! This module provides [`VersionedArray`], an array whose every slot is a
//! [`Timeline`]. Each successful `set`, `add` or `remove` publishes a new
//! version; any earlier version stays readable through the `*_at` methods.
//!
//! # Time Complexity
//!
//! | Operation | Complexity     |
//! |-----------|----------------|
//! | `get_at`  | O(log k)       |
//! | `set`     | O(1) amortized |
//! | `add`     | O(1) amortized |
//! | `remove`  | O(1) amortized |
//! | `len_at`  | O(log k)       |
//!
//! where `k` is the number of times the slot (or the length) was written.
//!
//! # Examples
//!
//! ```rust
//! use fatnode::versioned::VersionedArray;
//!
//! let mut array = VersionedArray::with_capacity(5);
//! array.set(3, 40).unwrap();
//! array.set(3, 42).unwrap();
//!
//! assert_eq!(array.get_at(3, 0), Ok(None));
//! assert_eq!(array.get_at(3, 1), Ok(Some(&40)));
//! assert_eq!(array.get(3), Ok(Some(&42)));
//! ```

use super::error::{Result, VersionedError};
use super::timeline::Timeline;
use super::version::{Version, VersionCounter};

/// Length of an array built with [`VersionedArray::new`].
pub const DEFAULT_CAPACITY: usize = 10;

/// An array that keeps every version it has ever been in.
///
/// Slots that were never written hold `None`. Removing the last element
/// only shortens the length; the slot's history is kept so earlier versions
/// still see it.
///
/// # Examples
///
/// ```rust
/// use fatnode::versioned::VersionedArray;
///
/// let mut array: VersionedArray<&str> = VersionedArray::new();
/// assert_eq!(array.len(), 10);
///
/// let version = array.add("Hello World!");
/// assert_eq!(version, 1);
/// assert_eq!(array.len(), 11);
/// assert_eq!(array.len_at(0), Ok(10));
/// ```
#[derive(Debug, Clone)]
pub struct VersionedArray<T> {
    counter: VersionCounter,
    slots: Vec<Timeline<Option<T>>>,
    length: Timeline<usize>,
}

impl<T> VersionedArray<T> {
    /// Creates an array of [`DEFAULT_CAPACITY`] empty slots.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an array of `capacity` empty slots at version `0`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fatnode::versioned::VersionedArray;
    ///
    /// let array: VersionedArray<i32> = VersionedArray::with_capacity(5);
    /// assert_eq!(array.len(), 5);
    /// assert_eq!(array.get(4), Ok(None));
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| Timeline::starting_at(0, None)).collect();
        Self {
            counter: VersionCounter::new(),
            slots,
            length: Timeline::starting_at(0, capacity),
        }
    }

    /// Creates an array holding `elements` at version `0`.
    #[must_use]
    pub fn from_vec(elements: Vec<T>) -> Self {
        let length = elements.len();
        let slots = elements
            .into_iter()
            .map(|element| Timeline::starting_at(0, Some(element)))
            .collect();
        Self {
            counter: VersionCounter::new(),
            slots,
            length: Timeline::starting_at(0, length),
        }
    }

    /// Returns the newest version of this array.
    #[inline]
    #[must_use]
    pub const fn current_version(&self) -> Version {
        self.counter.current()
    }

    /// Returns the length at the current version.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.length.latest().copied().unwrap_or_default()
    }

    /// Returns `true` if the array is empty at the current version.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the length at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` has not been
    /// published yet.
    pub fn len_at(&self, version: Version) -> Result<usize> {
        let version = self.counter.check(version)?;
        self.length.read(version).copied()
    }

    /// Returns `true` if the array was empty at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` has not been
    /// published yet.
    pub fn is_empty_at(&self, version: Version) -> Result<bool> {
        self.len_at(version).map(|length| length == 0)
    }

    /// Returns the element at `index` in the current version.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::IndexOutOfRange`] if `index` is not below
    /// the current length.
    #[inline]
    pub fn get(&self, index: usize) -> Result<Option<&T>> {
        self.get_at(index, self.counter.current())
    }

    /// Returns the element at `index` as it was at `version`.
    ///
    /// # Errors
    ///
    /// - [`VersionedError::VersionNotFound`] if `version` has not been
    ///   published yet.
    /// - [`VersionedError::IndexOutOfRange`] if `index` is not below the
    ///   length at `version`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fatnode::versioned::{ErrorKind, VersionedArray};
    ///
    /// let mut array = VersionedArray::with_capacity(2);
    /// array.set(0, 'a').unwrap();
    /// array.remove().unwrap();
    ///
    /// assert_eq!(array.get_at(1, 1), Ok(None));
    /// assert_eq!(array.get_at(1, 2).unwrap_err().kind(), ErrorKind::IndexOutOfRange);
    /// assert_eq!(array.get_at(0, 3).unwrap_err().kind(), ErrorKind::VersionNotFound);
    /// ```
    pub fn get_at(&self, index: usize, version: Version) -> Result<Option<&T>> {
        let length = self.len_at(version)?;
        if index >= length {
            return Err(VersionedError::IndexOutOfRange { index, length });
        }
        self.slots
            .get(index)
            .ok_or(VersionedError::IndexOutOfRange { index, length })?
            .read(version)
            .map(Option::as_ref)
    }

    /// Replaces the element at `index` and publishes a new version.
    ///
    /// Returns the published version.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::IndexOutOfRange`] if `index` is not below
    /// the current length. No version is published in that case.
    pub fn set(&mut self, index: usize, element: T) -> Result<Version> {
        let length = self.len();
        if index >= length {
            return Err(VersionedError::IndexOutOfRange { index, length });
        }
        let version = self.counter.advance();
        self.slots[index].write(version, Some(element));
        tracing::trace!(
            collection = "array",
            operation = "set",
            version,
            index,
            "published version"
        );
        Ok(version)
    }

    /// Appends `element` after the last element and publishes a new version.
    ///
    /// A backing slot is allocated when the array has never been this long.
    pub fn add(&mut self, element: T) -> Version {
        let length = self.len();
        if length >= self.slots.len() {
            self.slots.push(Timeline::new());
        }
        let version = self.counter.advance();
        self.slots[length].write(version, Some(element));
        self.length.write(version, length + 1);
        tracing::trace!(
            collection = "array",
            operation = "add",
            version,
            length = length + 1,
            "published version"
        );
        version
    }

    /// Removes the last element and publishes a new version.
    ///
    /// Only the length changes; the removed slot keeps its history.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::Underflow`] if the array is empty at the
    /// current version. No version is published in that case.
    pub fn remove(&mut self) -> Result<Version> {
        let length = self.len();
        if length == 0 {
            return Err(VersionedError::Underflow);
        }
        let version = self.counter.advance();
        self.length.write(version, length - 1);
        tracing::trace!(
            collection = "array",
            operation = "remove",
            version,
            length = length - 1,
            "published version"
        );
        Ok(version)
    }

    /// Iterates over the slots of `version` in index order.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` has not been
    /// published yet.
    pub fn iter_at(&self, version: Version) -> Result<impl Iterator<Item = Option<&T>> + '_> {
        let length = self.len_at(version)?;
        Ok(self.slots[..length]
            .iter()
            .map(move |slot| slot.read(version).ok().and_then(Option::as_ref)))
    }

    /// Iterates over the slots of the current version.
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        let version = self.counter.current();
        self.slots[..self.len()]
            .iter()
            .map(move |slot| slot.read(version).ok().and_then(Option::as_ref))
    }

    /// Returns the full history of the slot at `index`, if it was ever
    /// allocated.
    #[must_use]
    pub fn slot_history(&self, index: usize) -> Option<&Timeline<Option<T>>> {
        self.slots.get(index)
    }
}

impl<T: Clone> VersionedArray<T> {
    /// Copies the slots of `version` into a `Vec`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` has not been
    /// published yet.
    pub fn to_vec_at(&self, version: Version) -> Result<Vec<Option<T>>> {
        Ok(self.iter_at(version)?.map(Option::<&T>::cloned).collect())
    }

    /// Copies the slots of the current version into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Option<T>> {
        self.iter().map(Option::<&T>::cloned).collect()
    }
}

impl<T> Default for VersionedArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for VersionedArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> From<Vec<T>> for VersionedArray<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::from_vec(elements)
    }
}
