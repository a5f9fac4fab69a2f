//! Multiversion ordered map with tombstone deletion.
//!
//! This module provides [`VersionedMap`]. Each key owns one node, created on
//! the key's first write and kept forever. A node is a [`Timeline`] whose
//! entries are either a live value or a tombstone, so removing a key never
//! evicts anything: earlier versions still see the value it had.
//!
//! Lookups that miss are not errors. `get` returns `None` and `contains_key`
//! returns `false`; only a request for an unpublished version fails.
//!
//! # Examples
//!
//! ```rust
//! use fatnode::versioned::VersionedMap;
//!
//! let mut map = VersionedMap::new();
//! map.put(0, "0");
//! map.put(0, "1");
//! map.remove(&0);
//!
//! assert_eq!(map.get_at(&0, 1), Ok(Some(&"0")));
//! assert_eq!(map.get_at(&0, 2), Ok(Some(&"1")));
//! assert_eq!(map.contains_key_at(&0, 2), Ok(true));
//! assert_eq!(map.contains_key_at(&0, 3), Ok(false));
//! ```

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use super::error::Result;
use super::timeline::Timeline;
use super::version::{Version, VersionCounter};

/// State of a key at one version.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryState<V> {
    Live(V),
    Tombstone,
}

/// All states a key has been in.
#[derive(Debug, Clone)]
struct MapNode<V> {
    states: Timeline<EntryState<V>>,
}

impl<V> MapNode<V> {
    fn new() -> Self {
        Self {
            states: Timeline::new(),
        }
    }

    fn live_at(&self, version: Version) -> Option<&V> {
        match self.states.read(version) {
            Ok(EntryState::Live(value)) => Some(value),
            Ok(EntryState::Tombstone) | Err(_) => None,
        }
    }

    /// Writes a live value, returning `true` if the key was not live before.
    fn revive(&mut self, version: Version, value: V) -> bool {
        let was_live = self.live_at(version).is_some();
        self.states.write(version, EntryState::Live(value));
        !was_live
    }

    /// Writes a tombstone, returning `true` if the key was live before.
    fn bury(&mut self, version: Version) -> bool {
        let was_live = self.live_at(version).is_some();
        if was_live {
            self.states.write(version, EntryState::Tombstone);
        }
        was_live
    }
}

/// An ordered map that keeps every version it has ever been in.
///
/// Keys are kept in their natural order, so [`iter`](Self::iter),
/// [`keys`](Self::keys) and [`values`](Self::values) are sorted by key.
///
/// # Examples
///
/// ```rust
/// use fatnode::versioned::VersionedMap;
///
/// let mut map = VersionedMap::new();
/// for key in 0..8 {
///     map.put(key, "object");
/// }
/// map.remove(&0);
///
/// assert_eq!(map.len(), 7);
/// assert_eq!(map.len_at(8), Ok(8));
/// ```
#[derive(Clone)]
pub struct VersionedMap<K, V> {
    counter: VersionCounter,
    nodes: BTreeMap<K, MapNode<V>>,
    length: Timeline<usize>,
}

impl<K: Ord, V> VersionedMap<K, V> {
    /// Creates an empty map at version `0`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counter: VersionCounter::new(),
            nodes: BTreeMap::new(),
            length: Timeline::starting_at(0, 0),
        }
    }

    /// Returns the newest version of this map.
    #[inline]
    #[must_use]
    pub const fn current_version(&self) -> Version {
        self.counter.current()
    }

    fn size_at(&self, version: Version) -> usize {
        self.length.read(version).copied().unwrap_or_default()
    }

    fn live_at<Q>(&self, key: &Q, version: Version) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.nodes.get(key).and_then(|node| node.live_at(version))
    }

    fn resize(&mut self, version: Version, grown: bool) {
        let size = self.size_at(version);
        let size = if grown {
            size + 1
        } else {
            size.saturating_sub(1)
        };
        self.length.write(version, size);
    }

    /// Makes `key` live with `value` at `version`, creating its node first if
    /// the key has never been written.
    fn store(&mut self, version: Version, key: K, value: V) {
        let revived = self
            .nodes
            .entry(key)
            .or_insert_with(MapNode::new)
            .revive(version, value);
        if revived {
            self.resize(version, true);
        }
    }

    /// Like [`store`](Self::store) for a key whose node already exists.
    fn store_existing<Q>(&mut self, version: Version, key: &Q, value: V)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let revived = self
            .nodes
            .get_mut(key)
            .is_some_and(|node| node.revive(version, value));
        if revived {
            self.resize(version, true);
        }
    }

    fn tombstone<Q>(&mut self, version: Version, key: &Q)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let buried = self
            .nodes
            .get_mut(key)
            .is_some_and(|node| node.bury(version));
        if buried {
            self.resize(version, false);
        }
    }

    fn published(&self, operation: &'static str, version: Version) {
        tracing::trace!(
            collection = "map",
            operation,
            version,
            size = self.size_at(version),
            "published version"
        );
    }

    fn unchanged(operation: &'static str) {
        tracing::debug!(collection = "map", operation, "no change, version not published");
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns the number of live keys at the current version.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.size_at(self.counter.current())
    }

    /// Returns the number of live keys at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionNotFound`](super::VersionedError::VersionNotFound)
    /// if `version` has not been published yet.
    pub fn len_at(&self, version: Version) -> Result<usize> {
        let version = self.counter.check(version)?;
        Ok(self.size_at(version))
    }

    /// Returns `true` if no key is live at the current version.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if no key was live at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionNotFound`](super::VersionedError::VersionNotFound)
    /// if `version` has not been published yet.
    pub fn is_empty_at(&self, version: Version) -> Result<bool> {
        self.len_at(version).map(|size| size == 0)
    }

    /// Returns the value of `key` at the current version.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.live_at(key, self.counter.current())
    }

    /// Returns the value `key` had at `version`.
    ///
    /// A key that was never written, or was removed at or before `version`,
    /// yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionNotFound`](super::VersionedError::VersionNotFound)
    /// if `version` has not been published yet.
    pub fn get_at<Q>(&self, key: &Q, version: Version) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let version = self.counter.check(version)?;
        Ok(self.live_at(key, version))
    }

    /// Returns the value of `key` at the current version, or `default`.
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    /// Returns the value `key` had at `version`, or `default`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionNotFound`](super::VersionedError::VersionNotFound)
    /// if `version` has not been published yet.
    pub fn get_or_at<'a, Q>(&'a self, key: &Q, default: &'a V, version: Version) -> Result<&'a V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Ok(self.get_at(key, version)?.unwrap_or(default))
    }

    /// Returns `true` if `key` is live at the current version.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns `true` if `key` was live at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionNotFound`](super::VersionedError::VersionNotFound)
    /// if `version` has not been published yet.
    pub fn contains_key_at<Q>(&self, key: &Q, version: Version) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_at(key, version).map(|value| value.is_some())
    }

    /// Iterates over the live entries of the current version in key order.
    #[must_use]
    pub fn iter(&self) -> VersionedMapIter<'_, K, V> {
        VersionedMapIter {
            nodes: self.nodes.iter(),
            version: self.counter.current(),
        }
    }

    /// Iterates over the entries that were live at `version`, in key order.
    ///
    /// # Errors
    ///
    /// Returns [`VersionNotFound`](super::VersionedError::VersionNotFound)
    /// if `version` has not been published yet.
    pub fn iter_at(&self, version: Version) -> Result<VersionedMapIter<'_, K, V>> {
        let version = self.counter.check(version)?;
        Ok(VersionedMapIter {
            nodes: self.nodes.iter(),
            version,
        })
    }

    /// Iterates over the live keys of the current version in order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Iterates over the keys that were live at `version`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`VersionNotFound`](super::VersionedError::VersionNotFound)
    /// if `version` has not been published yet.
    pub fn keys_at(&self, version: Version) -> Result<impl DoubleEndedIterator<Item = &K> + '_> {
        Ok(self.iter_at(version)?.map(|(key, _)| key))
    }

    /// Iterates over the live values of the current version in key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Iterates over the values that were live at `version`, in key order.
    ///
    /// # Errors
    ///
    /// Returns [`VersionNotFound`](super::VersionedError::VersionNotFound)
    /// if `version` has not been published yet.
    pub fn values_at(&self, version: Version) -> Result<impl DoubleEndedIterator<Item = &V> + '_> {
        Ok(self.iter_at(version)?.map(|(_, value)| value))
    }

    /// Returns every state `key` has been in, oldest first.
    ///
    /// `None` marks a removal. An unknown key has an empty history.
    pub fn history<Q>(&self, key: &Q) -> Vec<(Version, Option<&V>)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.nodes.get(key).map_or_else(Vec::new, |node| {
            node.states
                .iter()
                .map(|(version, state)| match state {
                    EntryState::Live(value) => (version, Some(value)),
                    EntryState::Tombstone => (version, None),
                })
                .collect()
        })
    }

    /// Removes every live key under a single new version.
    ///
    /// Returns `false`, without publishing a version, if the map is already
    /// empty.
    pub fn clear(&mut self) -> bool {
        if self.is_empty() {
            Self::unchanged("clear");
            return false;
        }
        let version = self.counter.advance();
        for node in self.nodes.values_mut() {
            node.bury(version);
        }
        self.length.write(version, 0);
        self.published("clear", version);
        true
    }

    /// Replaces the value of every live key with `function(key, value)`,
    /// under a single new version.
    ///
    /// Returns `false`, without publishing a version, if the map is empty.
    pub fn replace_all<F>(&mut self, mut function: F) -> bool
    where
        F: FnMut(&K, &V) -> V,
    {
        if self.is_empty() {
            Self::unchanged("replace_all");
            return false;
        }
        let current = self.counter.current();
        let version = self.counter.advance();
        for (key, node) in &mut self.nodes {
            let Some(value) = node.live_at(current).map(|value| function(key, value)) else {
                continue;
            };
            node.states.write(version, EntryState::Live(value));
        }
        self.published("replace_all", version);
        true
    }
}

impl<K: Ord, V: PartialEq> VersionedMap<K, V> {
    /// Returns `true` if some key maps to `value` at the current version.
    pub fn contains_value(&self, value: &V) -> bool {
        self.values().any(|candidate| candidate == value)
    }

    /// Returns `true` if some key mapped to `value` at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionNotFound`](super::VersionedError::VersionNotFound)
    /// if `version` has not been published yet.
    pub fn contains_value_at(&self, value: &V, version: Version) -> Result<bool> {
        Ok(self.values_at(version)?.any(|candidate| candidate == value))
    }

    /// Removes `key` if it currently maps to `value`.
    ///
    /// Returns `false`, without publishing a version, otherwise.
    pub fn remove_if_equals<Q>(&mut self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.get(key) != Some(value) {
            Self::unchanged("remove_if_equals");
            return false;
        }
        let version = self.counter.advance();
        self.tombstone(version, key);
        self.published("remove_if_equals", version);
        true
    }

    /// Replaces the value of `key` with `value` if it currently maps to
    /// `expected`.
    ///
    /// Returns `false`, without publishing a version, otherwise.
    pub fn replace_if_equals<Q>(&mut self, key: &Q, expected: &V, value: V) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.get(key) != Some(expected) {
            Self::unchanged("replace_if_equals");
            return false;
        }
        let version = self.counter.advance();
        self.store_existing(version, key, value);
        self.published("replace_if_equals", version);
        true
    }
}

impl<K: Ord, V: Clone> VersionedMap<K, V> {
    /// Maps `key` to `value` and publishes a new version.
    ///
    /// Returns the previous value, if the key was live.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.get(&key).cloned();
        let version = self.counter.advance();
        self.store(version, key, value);
        self.published("put", version);
        previous
    }

    /// Maps every `(key, value)` of `entries` under a single new version.
    ///
    /// Returns `false`, without publishing a version, if `entries` is empty.
    pub fn put_all<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) -> bool {
        let mut entries = entries.into_iter().peekable();
        if entries.peek().is_none() {
            Self::unchanged("put_all");
            return false;
        }
        let version = self.counter.advance();
        for (key, value) in entries {
            self.store(version, key, value);
        }
        self.published("put_all", version);
        true
    }

    /// Removes `key` by writing a tombstone, and publishes a new version.
    ///
    /// Returns the removed value. If the key is not live, nothing is
    /// published and `None` is returned.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(previous) = self.get(key).cloned() else {
            Self::unchanged("remove");
            return None;
        };
        let version = self.counter.advance();
        self.tombstone(version, key);
        self.published("remove", version);
        Some(previous)
    }

    /// Maps `key` to `value` unless the key is already live.
    ///
    /// Returns the existing value, in which case nothing is published.
    pub fn put_if_absent(&mut self, key: K, value: V) -> Option<V> {
        if let Some(existing) = self.get(&key) {
            Self::unchanged("put_if_absent");
            return Some(existing.clone());
        }
        let version = self.counter.advance();
        self.store(version, key, value);
        self.published("put_if_absent", version);
        None
    }

    /// Returns the live value of `key`, or computes, stores and returns one.
    ///
    /// The node for a new key is created before the value is written. If
    /// `function` returns `None`, nothing is published.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fatnode::versioned::VersionedMap;
    ///
    /// let mut map: VersionedMap<&str, usize> = VersionedMap::new();
    /// assert_eq!(map.compute_if_absent("four", |key| Some(key.len())), Some(4));
    /// assert_eq!(map.compute_if_absent("four", |_| Some(0)), Some(4));
    /// assert_eq!(map.current_version(), 1);
    /// ```
    pub fn compute_if_absent<F>(&mut self, key: K, function: F) -> Option<V>
    where
        F: FnOnce(&K) -> Option<V>,
    {
        if let Some(existing) = self.get(&key) {
            Self::unchanged("compute_if_absent");
            return Some(existing.clone());
        }
        let Some(value) = function(&key) else {
            Self::unchanged("compute_if_absent");
            return None;
        };
        let version = self.counter.advance();
        self.store(version, key, value.clone());
        self.published("compute_if_absent", version);
        Some(value)
    }

    /// Recomputes the value of a live `key` from its current value.
    ///
    /// `function` receives the stored key. A `None` result removes the key.
    /// Nothing is published if the key is not live.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fatnode::versioned::VersionedMap;
    ///
    /// let mut map: VersionedMap<String, usize> = VersionedMap::new();
    /// map.put("hits".to_string(), 1);
    /// assert_eq!(map.compute_if_present("hits", |_, hits| Some(hits + 1)), Some(2));
    /// assert_eq!(map.compute_if_present("misses", |_, hits| Some(hits + 1)), None);
    /// assert_eq!(map.current_version(), 2);
    /// ```
    pub fn compute_if_present<Q, F>(&mut self, key: &Q, function: F) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        F: FnOnce(&K, &V) -> Option<V>,
    {
        let version = self.counter.current();
        let live = self
            .nodes
            .get_key_value(key)
            .and_then(|(stored, node)| node.live_at(version).map(|current| (stored, current)));
        let Some((stored, current)) = live else {
            Self::unchanged("compute_if_present");
            return None;
        };
        let computed = function(stored, current);
        let version = self.counter.advance();
        match &computed {
            Some(value) => self.store_existing(version, key, value.clone()),
            None => self.tombstone(version, key),
        }
        self.published("compute_if_present", version);
        computed
    }

    /// Computes the value of `key` from its current value, if any.
    ///
    /// A `None` result removes the key. Nothing is published when the key
    /// was absent and `function` returns `None`.
    pub fn compute<F>(&mut self, key: K, function: F) -> Option<V>
    where
        F: FnOnce(&K, Option<&V>) -> Option<V>,
    {
        let current = self.get(&key);
        let was_live = current.is_some();
        let computed = function(&key, current);
        match (&computed, was_live) {
            (None, false) => {
                Self::unchanged("compute");
                return None;
            }
            (None, true) => {
                let version = self.counter.advance();
                self.tombstone(version, &key);
                self.published("compute", version);
            }
            (Some(value), _) => {
                let version = self.counter.advance();
                self.store(version, key, value.clone());
                self.published("compute", version);
            }
        }
        computed
    }

    /// Stores `value` for an absent `key`, or combines it with the live value
    /// through `function`.
    ///
    /// The node for a new key is created before the value is written. A
    /// `None` result from `function` removes the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fatnode::versioned::VersionedMap;
    ///
    /// let mut map: VersionedMap<&str, i32> = VersionedMap::new();
    /// map.merge("hits", 1, |old, new| Some(old + new));
    /// map.merge("hits", 1, |old, new| Some(old + new));
    /// assert_eq!(map.get("hits"), Some(&2));
    /// assert_eq!(map.get_at("hits", 1), Ok(Some(&1)));
    /// ```
    pub fn merge<F>(&mut self, key: K, value: V, function: F) -> Option<V>
    where
        F: FnOnce(&V, V) -> Option<V>,
    {
        let merged = match self.get(&key) {
            Some(current) => function(current, value),
            None => Some(value),
        };
        let version = self.counter.advance();
        match &merged {
            Some(value) => self.store(version, key, value.clone()),
            None => self.tombstone(version, &key),
        }
        self.published("merge", version);
        merged
    }

    /// Replaces the value of a live `key`.
    ///
    /// Returns the previous value. Nothing is published if the key is not
    /// live.
    pub fn replace<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(previous) = self.get(key).cloned() else {
            Self::unchanged("replace");
            return None;
        };
        let version = self.counter.advance();
        self.store_existing(version, key, value);
        self.published("replace", version);
        Some(previous)
    }
}

impl<K: Ord, V> Default for VersionedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for VersionedMap<K, V> {
    /// Builds a map whose entries all exist at version `0`.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.store(0, key, value);
        }
        map
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a VersionedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = VersionedMapIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for VersionedMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("VersionedMap")
            .field("version", &self.counter.current())
            .field("entries", &self.iter().collect::<BTreeMap<_, _>>())
            .finish()
    }
}

/// An iterator over the live entries of one version of a [`VersionedMap`],
/// in key order.
///
/// Created by [`VersionedMap::iter`] and [`VersionedMap::iter_at`].
pub struct VersionedMapIter<'a, K, V> {
    nodes: btree_map::Iter<'a, K, MapNode<V>>,
    version: Version,
}

impl<'a, K, V> Iterator for VersionedMapIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let version = self.version;
        self.nodes
            .find_map(|(key, node)| node.live_at(version).map(|value| (key, value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.nodes.size_hint().1)
    }
}

impl<K, V> DoubleEndedIterator for VersionedMapIter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let version = self.version;
        self.nodes
            .by_ref()
            .rev()
            .find_map(|(key, node)| node.live_at(version).map(|value| (key, value)))
    }
}
