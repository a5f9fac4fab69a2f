//! Multiversion doubly linked list.
//!
//! This module provides [`VersionedList`], a doubly linked list in which
//! every node stores its value, successor and predecessor as [`Timeline`]s.
//! The list itself keeps timelines for its head, tail and size.
//!
//! # Structural Sharing
//!
//! An edit never copies nodes. Inserting or removing an element rewrites the
//! links of its two neighbours (and the head or tail when the edit happens at
//! an end) at the new version only. Every other node keeps its identity, and
//! every earlier version still walks the chain it had:
//!
//! ```text
//! version 0: a <-> b <-> c
//! version 1: a <-> c          (remove b: a.next and c.prev gain entries at 1)
//!
//! a.next = {0: b, 1: c}   c.prev = {0: b, 1: a}   b is untouched
//! ```
//!
//! Nodes live in an arena owned by the list and refer to one another by
//! index, so the back links are lookups rather than shared ownership.
//!
//! # Time Complexity
//!
//! Positional operations walk the chain of one version, starting from
//! whichever end is closer. Each step is a floor lookup in a link timeline.
//!
//! | Operation                  | Complexity        |
//! |----------------------------|-------------------|
//! | `add`, `remove_last`       | O(log k)          |
//! | `get`, `set`, `insert`     | O(n log k)        |
//! | `remove`, `remove_value`   | O(n log k)        |
//! | `contains`, `index_of`     | O(n log k)        |
//! | `len_at`                   | O(log k)          |
//!
//! # Examples
//!
//! ```rust
//! use fatnode::versioned::VersionedList;
//!
//! let mut list: VersionedList<char> = ('a'..='c').collect();
//! list.remove(1).unwrap();
//!
//! assert_eq!(list.to_vec(), vec!['a', 'c']);
//! assert_eq!(list.to_vec_at(0).unwrap(), vec!['a', 'b', 'c']);
//! ```

use std::fmt;

use super::error::{Result, VersionedError};
use super::timeline::Timeline;
use super::version::{Version, VersionCounter};

/// Position of a node in the list's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

/// A fat node: value and links, each with their full history.
#[derive(Debug, Clone)]
struct Node<T> {
    value: Timeline<T>,
    next: Timeline<Option<NodeId>>,
    prev: Timeline<Option<NodeId>>,
}

/// A doubly linked list that keeps every version it has ever been in.
///
/// Reads come in pairs: a plain method reading the current version and an
/// `*_at` method reading any published version. Mutations always apply to
/// the current version and publish exactly one new version, or none if they
/// change nothing.
///
/// # Examples
///
/// ```rust
/// use fatnode::versioned::VersionedList;
///
/// let mut list = VersionedList::new();
/// list.add("object");
/// list.add("object2");
/// list.add("object3");
///
/// assert!(list.remove_value(&"object2"));
/// assert_eq!(list.get(1), Ok(&"object3"));
/// assert_eq!(list.get_at(1, 2), Ok(&"object2"));
/// assert_eq!(list.current_version(), 4);
/// ```
#[derive(Clone)]
pub struct VersionedList<T> {
    counter: VersionCounter,
    nodes: Vec<Node<T>>,
    head: Timeline<Option<NodeId>>,
    tail: Timeline<Option<NodeId>>,
    length: Timeline<usize>,
}

impl<T> VersionedList<T> {
    /// Creates an empty list at version `0`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counter: VersionCounter::new(),
            nodes: Vec::new(),
            head: Timeline::starting_at(0, None),
            tail: Timeline::starting_at(0, None),
            length: Timeline::starting_at(0, 0),
        }
    }

    /// Returns the newest version of this list.
    #[inline]
    #[must_use]
    pub const fn current_version(&self) -> Version {
        self.counter.current()
    }

    // =========================================================================
    // Chain navigation (no version validation)
    // =========================================================================

    fn head_at(&self, version: Version) -> Option<NodeId> {
        self.head.read(version).ok().copied().flatten()
    }

    fn tail_at(&self, version: Version) -> Option<NodeId> {
        self.tail.read(version).ok().copied().flatten()
    }

    fn next_of(&self, node: NodeId, version: Version) -> Option<NodeId> {
        self.nodes[node.0].next.read(version).ok().copied().flatten()
    }

    fn prev_of(&self, node: NodeId, version: Version) -> Option<NodeId> {
        self.nodes[node.0].prev.read(version).ok().copied().flatten()
    }

    fn value_of(&self, node: NodeId, version: Version) -> Option<&T> {
        self.nodes[node.0].value.read(version).ok()
    }

    fn size_at(&self, version: Version) -> usize {
        self.length.read(version).copied().unwrap_or_default()
    }

    fn node_ids(&self, version: Version) -> NodeIds<'_, T> {
        NodeIds {
            list: self,
            version,
            front: self.head_at(version),
            back: self.tail_at(version),
            remaining: self.size_at(version),
        }
    }

    /// Finds the node at `index`, walking from the nearer end.
    fn node_at(&self, index: usize, version: Version) -> Option<NodeId> {
        let size = self.size_at(version);
        if index >= size {
            return None;
        }
        if index < size / 2 {
            self.node_ids(version).nth(index)
        } else {
            self.node_ids(version).nth_back(size - 1 - index)
        }
    }

    fn check_index(&self, index: usize, version: Version) -> Result<usize> {
        let size = self.size_at(version);
        if index < size {
            Ok(size)
        } else {
            Err(VersionedError::ListIndexOutOfRange { index, size })
        }
    }

    fn check_position(&self, index: usize, version: Version) -> Result<usize> {
        let size = self.size_at(version);
        if index <= size {
            Ok(size)
        } else {
            Err(VersionedError::ListIndexOutOfRange { index, size })
        }
    }

    // =========================================================================
    // Splicing at the version being built
    // =========================================================================

    /// Links a new node between `prev` and `next` at `version`.
    ///
    /// `prev` and `next` must be adjacent at `version`.
    fn link_between(
        &mut self,
        version: Version,
        prev: Option<NodeId>,
        next: Option<NodeId>,
        value: T,
    ) -> NodeId {
        let node = NodeId(self.nodes.len());
        self.nodes.push(Node {
            value: Timeline::starting_at(version, value),
            next: Timeline::starting_at(version, next),
            prev: Timeline::starting_at(version, prev),
        });
        match prev {
            Some(prev) => self.nodes[prev.0].next.write(version, Some(node)),
            None => self.head.write(version, Some(node)),
        }
        match next {
            Some(next) => self.nodes[next.0].prev.write(version, Some(node)),
            None => self.tail.write(version, Some(node)),
        }
        let size = self.size_at(version);
        self.length.write(version, size + 1);
        node
    }

    /// Splices `node` out of the chain at `version`.
    ///
    /// Only the neighbours' links change; `node` keeps its own history.
    fn unlink(&mut self, version: Version, node: NodeId) {
        let prev = self.prev_of(node, version);
        let next = self.next_of(node, version);
        match prev {
            Some(prev) => self.nodes[prev.0].next.write(version, next),
            None => self.head.write(version, next),
        }
        match next {
            Some(next) => self.nodes[next.0].prev.write(version, prev),
            None => self.tail.write(version, prev),
        }
        let size = self.size_at(version);
        self.length.write(version, size.saturating_sub(1));
    }

    fn append(&mut self, version: Version, value: T) -> NodeId {
        let tail = self.tail_at(version);
        self.link_between(version, tail, None, value)
    }

    fn published(&self, operation: &'static str, version: Version) {
        tracing::trace!(
            collection = "list",
            operation,
            version,
            size = self.size_at(version),
            "published version"
        );
    }

    fn unchanged(operation: &'static str) {
        tracing::debug!(collection = "list", operation, "no change, version not published");
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns the number of elements at the current version.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.size_at(self.counter.current())
    }

    /// Returns the number of elements at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` has not been
    /// published yet.
    pub fn len_at(&self, version: Version) -> Result<usize> {
        let version = self.counter.check(version)?;
        Ok(self.size_at(version))
    }

    /// Returns `true` if the list is empty at the current version.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the list was empty at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` has not been
    /// published yet.
    pub fn is_empty_at(&self, version: Version) -> Result<bool> {
        self.len_at(version).map(|size| size == 0)
    }

    /// Returns the element at `index` in the current version.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::ListIndexOutOfRange`] if `index` is not
    /// below the current size.
    #[inline]
    pub fn get(&self, index: usize) -> Result<&T> {
        self.get_at(index, self.counter.current())
    }

    /// Returns the element at `index` as it was at `version`.
    ///
    /// # Errors
    ///
    /// - [`VersionedError::VersionNotFound`] if `version` has not been
    ///   published yet.
    /// - [`VersionedError::ListIndexOutOfRange`] if `index` is not below the
    ///   size at `version`.
    pub fn get_at(&self, index: usize, version: Version) -> Result<&T> {
        let version = self.counter.check(version)?;
        let size = self.check_index(index, version)?;
        self.node_at(index, version)
            .and_then(|node| self.value_of(node, version))
            .ok_or(VersionedError::ListIndexOutOfRange { index, size })
    }

    /// Iterates over the elements of the current version.
    #[must_use]
    pub fn iter(&self) -> VersionedListIter<'_, T> {
        VersionedListIter {
            nodes: self.node_ids(self.counter.current()),
        }
    }

    /// Iterates over the elements of `version`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` has not been
    /// published yet.
    pub fn iter_at(&self, version: Version) -> Result<VersionedListIter<'_, T>> {
        let version = self.counter.check(version)?;
        Ok(VersionedListIter {
            nodes: self.node_ids(version),
        })
    }

    /// Opens a cursor on the current version, positioned before `index`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::ListIndexOutOfRange`] if `index` is greater
    /// than the current size.
    #[inline]
    pub fn cursor(&self, index: usize) -> Result<VersionedListCursor<'_, T>> {
        self.cursor_at(self.counter.current(), index)
    }

    /// Opens a cursor on `version`, positioned before `index`.
    ///
    /// The first call to
    /// [`next_element`](VersionedListCursor::next_element) returns the
    /// element at `index`.
    ///
    /// # Errors
    ///
    /// - [`VersionedError::VersionNotFound`] if `version` has not been
    ///   published yet.
    /// - [`VersionedError::ListIndexOutOfRange`] if `index` is greater than
    ///   the size at `version`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fatnode::versioned::VersionedList;
    ///
    /// let list: VersionedList<i32> = (0..5).collect();
    /// let mut cursor = list.cursor_at(0, 2).unwrap();
    /// assert_eq!(cursor.next_element(), Ok(&2));
    /// assert_eq!(cursor.previous_element(), Ok(&2));
    /// assert_eq!(cursor.previous_element(), Ok(&1));
    /// ```
    pub fn cursor_at(&self, version: Version, index: usize) -> Result<VersionedListCursor<'_, T>> {
        let version = self.counter.check(version)?;
        let size = self.check_position(index, version)?;
        Ok(VersionedListCursor {
            list: self,
            version,
            next: self.node_at(index, version),
            index,
            size,
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Appends `value` and publishes a new version.
    ///
    /// The new node's predecessor link and the old tail's successor link are
    /// written at the new version; older versions keep their tail.
    pub fn add(&mut self, value: T) -> Version {
        let version = self.counter.advance();
        self.append(version, value);
        self.published("add", version);
        version
    }

    /// Inserts `value` so that it ends up at `index`, and publishes a new
    /// version.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::ListIndexOutOfRange`] if `index` is greater
    /// than the current size. No version is published in that case.
    pub fn insert(&mut self, index: usize, value: T) -> Result<Version> {
        let current = self.counter.current();
        self.check_position(index, current)?;
        let next = self.node_at(index, current);
        let prev = match next {
            Some(next) => self.prev_of(next, current),
            None => self.tail_at(current),
        };
        let version = self.counter.advance();
        self.link_between(version, prev, next, value);
        self.published("insert", version);
        Ok(version)
    }

    /// Removes the element at `index` and publishes a new version.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::ListIndexOutOfRange`] if `index` is not
    /// below the current size. No version is published in that case.
    pub fn remove(&mut self, index: usize) -> Result<Version> {
        let current = self.counter.current();
        let size = self.check_index(index, current)?;
        let node = self
            .node_at(index, current)
            .ok_or(VersionedError::ListIndexOutOfRange { index, size })?;
        let version = self.counter.advance();
        self.unlink(version, node);
        self.published("remove", version);
        Ok(version)
    }

    /// Removes the last element and publishes a new version.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::Underflow`] if the list is empty. No version
    /// is published in that case.
    pub fn remove_last(&mut self) -> Result<Version> {
        let tail = self
            .tail_at(self.counter.current())
            .ok_or(VersionedError::Underflow)?;
        let version = self.counter.advance();
        self.unlink(version, tail);
        self.published("remove_last", version);
        Ok(version)
    }

    /// Replaces the element at `index` and publishes a new version.
    ///
    /// Only the target node's value timeline is written.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::ListIndexOutOfRange`] if `index` is not
    /// below the current size. No version is published in that case.
    pub fn set(&mut self, index: usize, value: T) -> Result<Version> {
        let current = self.counter.current();
        let size = self.check_index(index, current)?;
        let node = self
            .node_at(index, current)
            .ok_or(VersionedError::ListIndexOutOfRange { index, size })?;
        let version = self.counter.advance();
        self.nodes[node.0].value.write(version, value);
        self.published("set", version);
        Ok(version)
    }

    /// Appends every element of `values` under a single new version.
    ///
    /// Returns `false`, without publishing a version, if `values` is empty.
    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, values: I) -> bool {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            Self::unchanged("add_all");
            return false;
        }
        let version = self.counter.advance();
        for value in values {
            self.append(version, value);
        }
        self.published("add_all", version);
        true
    }

    /// Inserts every element of `values` starting at `index`, under a single
    /// new version.
    ///
    /// Returns `Ok(false)`, without publishing a version, if `values` is
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::ListIndexOutOfRange`] if `index` is greater
    /// than the current size.
    pub fn add_all_at<I: IntoIterator<Item = T>>(&mut self, index: usize, values: I) -> Result<bool> {
        let current = self.counter.current();
        self.check_position(index, current)?;
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            Self::unchanged("add_all_at");
            return Ok(false);
        }
        let next = self.node_at(index, current);
        let mut prev = match next {
            Some(next) => self.prev_of(next, current),
            None => self.tail_at(current),
        };
        let version = self.counter.advance();
        for value in values {
            prev = Some(self.link_between(version, prev, next, value));
        }
        self.published("add_all_at", version);
        Ok(true)
    }

    /// Unlinks every node in `targets` under a single new version.
    fn unlink_all(&mut self, operation: &'static str, targets: &[NodeId]) -> bool {
        if targets.is_empty() {
            Self::unchanged(operation);
            return false;
        }
        let version = self.counter.advance();
        for &node in targets {
            self.unlink(version, node);
        }
        self.published(operation, version);
        true
    }

    /// Removes every element of `self` and publishes a new version.
    ///
    /// Nodes are kept, so earlier versions can still be traversed.
    pub fn clear(&mut self) -> Version {
        let version = self.counter.advance();
        self.head.write(version, None);
        self.tail.write(version, None);
        self.length.write(version, 0);
        self.published("clear", version);
        version
    }

    /// Replaces every element with `function(element)` under a single new
    /// version.
    ///
    /// Returns `false`, without publishing a version, if the list is empty.
    pub fn replace_all<F>(&mut self, mut function: F) -> bool
    where
        F: FnMut(&T) -> T,
    {
        let current = self.counter.current();
        let updates: Vec<(NodeId, T)> = self
            .node_ids(current)
            .filter_map(|node| self.value_of(node, current).map(|value| (node, function(value))))
            .collect();
        if updates.is_empty() {
            Self::unchanged("replace_all");
            return false;
        }
        let version = self.counter.advance();
        for (node, value) in updates {
            self.nodes[node.0].value.write(version, value);
        }
        self.published("replace_all", version);
        true
    }
}

impl<T: PartialEq> VersionedList<T> {
    fn position_at(&self, value: &T, version: Version) -> Option<usize> {
        self.node_ids(version)
            .position(|node| self.value_of(node, version) == Some(value))
    }

    fn last_position_at(&self, value: &T, version: Version) -> Option<usize> {
        let size = self.size_at(version);
        self.node_ids(version)
            .rev()
            .position(|node| self.value_of(node, version) == Some(value))
            .map(|from_back| size - 1 - from_back)
    }

    /// Returns `true` if the current version contains `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.position_at(value, self.counter.current()).is_some()
    }

    /// Returns `true` if `version` contained `value`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` has not been
    /// published yet.
    pub fn contains_at(&self, value: &T, version: Version) -> Result<bool> {
        let version = self.counter.check(version)?;
        Ok(self.position_at(value, version).is_some())
    }

    /// Returns `true` if the current version contains every element of
    /// `values`.
    #[must_use]
    pub fn contains_all(&self, values: &[T]) -> bool {
        values.iter().all(|value| self.contains(value))
    }

    /// Returns `true` if `version` contained every element of `values`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` has not been
    /// published yet.
    pub fn contains_all_at(&self, values: &[T], version: Version) -> Result<bool> {
        let version = self.counter.check(version)?;
        Ok(values
            .iter()
            .all(|value| self.position_at(value, version).is_some()))
    }

    /// Returns the index of the first occurrence of `value` in the current
    /// version.
    #[must_use]
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.position_at(value, self.counter.current())
    }

    /// Returns the index of the first occurrence of `value` in `version`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` has not been
    /// published yet.
    pub fn index_of_at(&self, value: &T, version: Version) -> Result<Option<usize>> {
        let version = self.counter.check(version)?;
        Ok(self.position_at(value, version))
    }

    /// Returns the index of the last occurrence of `value` in the current
    /// version.
    #[must_use]
    pub fn last_index_of(&self, value: &T) -> Option<usize> {
        self.last_position_at(value, self.counter.current())
    }

    /// Returns the index of the last occurrence of `value` in `version`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` has not been
    /// published yet.
    pub fn last_index_of_at(&self, value: &T, version: Version) -> Result<Option<usize>> {
        let version = self.counter.check(version)?;
        Ok(self.last_position_at(value, version))
    }

    /// Removes the first occurrence of `value` and publishes a new version.
    ///
    /// Returns `false`, without publishing a version, if `value` is absent.
    pub fn remove_value(&mut self, value: &T) -> bool {
        let current = self.counter.current();
        let target = self
            .node_ids(current)
            .find(|&node| self.value_of(node, current) == Some(value));
        match target {
            Some(node) => self.unlink_all("remove_value", &[node]),
            None => {
                Self::unchanged("remove_value");
                false
            }
        }
    }

    /// Removes every element that is equal to one of `values`, under a
    /// single new version.
    ///
    /// Returns `false`, without publishing a version, if nothing matched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fatnode::versioned::VersionedList;
    ///
    /// let mut list: VersionedList<i32> = vec![1, 2, 1, 3].into_iter().collect();
    /// assert!(list.remove_all(&[1]));
    /// assert_eq!(list.to_vec(), vec![2, 3]);
    /// assert_eq!(list.current_version(), 1);
    ///
    /// assert!(!list.remove_all(&[7]));
    /// assert_eq!(list.current_version(), 1);
    /// ```
    pub fn remove_all(&mut self, values: &[T]) -> bool {
        let current = self.counter.current();
        let targets: Vec<NodeId> = self
            .node_ids(current)
            .filter(|&node| {
                self.value_of(node, current)
                    .is_some_and(|value| values.contains(value))
            })
            .collect();
        self.unlink_all("remove_all", &targets)
    }

    /// Keeps only the elements that are equal to one of `values`, under a
    /// single new version.
    ///
    /// Returns `false`, without publishing a version, if nothing was
    /// removed. An empty `values` slice leaves the list untouched.
    pub fn retain_all(&mut self, values: &[T]) -> bool {
        if values.is_empty() {
            Self::unchanged("retain_all");
            return false;
        }
        let current = self.counter.current();
        let targets: Vec<NodeId> = self
            .node_ids(current)
            .filter(|&node| {
                self.value_of(node, current)
                    .is_some_and(|value| !values.contains(value))
            })
            .collect();
        self.unlink_all("retain_all", &targets)
    }
}

impl<T: Clone> VersionedList<T> {
    /// Copies the elements of the current version into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Copies the elements of `version` into a `Vec`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::VersionNotFound`] if `version` has not been
    /// published yet.
    pub fn to_vec_at(&self, version: Version) -> Result<Vec<T>> {
        Ok(self.iter_at(version)?.cloned().collect())
    }

    /// Copies the elements in `from..to` of the current version.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::ListIndexOutOfRange`] unless
    /// `from <= to <= len()`.
    pub fn sub_list(&self, from: usize, to: usize) -> Result<Vec<T>> {
        self.sub_list_at(from, to, self.counter.current())
    }

    /// Copies the elements in `from..to` of `version`.
    ///
    /// # Errors
    ///
    /// - [`VersionedError::VersionNotFound`] if `version` has not been
    ///   published yet.
    /// - [`VersionedError::ListIndexOutOfRange`] unless
    ///   `from <= to <= len_at(version)`.
    pub fn sub_list_at(&self, from: usize, to: usize, version: Version) -> Result<Vec<T>> {
        let version = self.counter.check(version)?;
        let size = self.check_position(to, version)?;
        if from > to {
            return Err(VersionedError::ListIndexOutOfRange { index: from, size });
        }
        Ok(self
            .node_ids(version)
            .skip(from)
            .take(to - from)
            .filter_map(|node| self.value_of(node, version).cloned())
            .collect())
    }
}

impl<T> Default for VersionedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for VersionedList<T> {
    /// Builds a list whose elements all exist at version `0`.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for value in iter {
            list.append(0, value);
        }
        list
    }
}

impl<'a, T> IntoIterator for &'a VersionedList<T> {
    type Item = &'a T;
    type IntoIter = VersionedListIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for VersionedList<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("VersionedList")
            .field("version", &self.counter.current())
            .field("elements", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

// =============================================================================
// Iteration
// =============================================================================

/// Walks the node chain of one version from both ends.
struct NodeIds<'a, T> {
    list: &'a VersionedList<T>,
    version: Version,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<T> Iterator for NodeIds<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front?;
        self.front = self.list.next_of(node, self.version);
        self.remaining -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for NodeIds<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back?;
        self.back = self.list.prev_of(node, self.version);
        self.remaining -= 1;
        Some(node)
    }
}

/// An iterator over the elements of one version of a [`VersionedList`].
///
/// Created by [`VersionedList::iter`] and [`VersionedList::iter_at`].
pub struct VersionedListIter<'a, T> {
    nodes: NodeIds<'a, T>,
}

impl<'a, T> Iterator for VersionedListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.next()?;
        self.nodes.list.value_of(node, self.nodes.version)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

impl<T> DoubleEndedIterator for VersionedListIter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let node = self.nodes.next_back()?;
        self.nodes.list.value_of(node, self.nodes.version)
    }
}

impl<T> ExactSizeIterator for VersionedListIter<'_, T> {}

/// A bidirectional, read-only cursor over one version of a
/// [`VersionedList`].
///
/// The cursor sits between two elements. Moving past either end fails with
/// [`VersionedError::ElementNotFound`]; mutating through the cursor fails
/// with [`VersionedError::UnsupportedOperation`], since every mutation must
/// publish a version through the list itself.
pub struct VersionedListCursor<'a, T> {
    list: &'a VersionedList<T>,
    version: Version,
    next: Option<NodeId>,
    index: usize,
    size: usize,
}

impl<'a, T> VersionedListCursor<'a, T> {
    /// Returns the version this cursor reads.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Returns `true` if an element follows the cursor.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.index < self.size
    }

    /// Returns `true` if an element precedes the cursor.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// Returns the index of the element a call to
    /// [`next_element`](Self::next_element) would return.
    #[must_use]
    pub const fn next_index(&self) -> usize {
        self.index
    }

    /// Returns the index of the element a call to
    /// [`previous_element`](Self::previous_element) would return, or `None`
    /// at the front.
    #[must_use]
    pub const fn previous_index(&self) -> Option<usize> {
        self.index.checked_sub(1)
    }

    /// Moves forward past one element and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::ElementNotFound`] at the back of the list.
    pub fn next_element(&mut self) -> Result<&'a T> {
        if !self.has_next() {
            return Err(VersionedError::ElementNotFound);
        }
        let node = self.next.ok_or(VersionedError::ElementNotFound)?;
        let value = self
            .list
            .value_of(node, self.version)
            .ok_or(VersionedError::ElementNotFound)?;
        self.next = self.list.next_of(node, self.version);
        self.index += 1;
        Ok(value)
    }

    /// Moves backward past one element and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`VersionedError::ElementNotFound`] at the front of the list.
    pub fn previous_element(&mut self) -> Result<&'a T> {
        if !self.has_previous() {
            return Err(VersionedError::ElementNotFound);
        }
        let node = match self.next {
            Some(next) => self.list.prev_of(next, self.version),
            None => self.list.tail_at(self.version),
        }
        .ok_or(VersionedError::ElementNotFound)?;
        let value = self
            .list
            .value_of(node, self.version)
            .ok_or(VersionedError::ElementNotFound)?;
        self.next = Some(node);
        self.index -= 1;
        Ok(value)
    }

    /// Always fails: cursors cannot replace elements.
    ///
    /// # Errors
    ///
    /// Always returns [`VersionedError::UnsupportedOperation`].
    pub fn set(&mut self, _value: T) -> Result<()> {
        Err(VersionedError::UnsupportedOperation("set through a list cursor"))
    }

    /// Always fails: cursors cannot insert elements.
    ///
    /// # Errors
    ///
    /// Always returns [`VersionedError::UnsupportedOperation`].
    pub fn add(&mut self, _value: T) -> Result<()> {
        Err(VersionedError::UnsupportedOperation("add through a list cursor"))
    }

    /// Always fails: cursors cannot remove elements.
    ///
    /// # Errors
    ///
    /// Always returns [`VersionedError::UnsupportedOperation`].
    pub const fn remove(&mut self) -> Result<()> {
        Err(VersionedError::UnsupportedOperation("remove through a list cursor"))
    }
}
