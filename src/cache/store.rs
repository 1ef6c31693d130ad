//! Bounded Cache Module
//!
//! Main cache engine combining an insertion-ordered resident table with
//! LRU tracking and a write-through backing store.

use std::hash::Hash;

use indexmap::map::{IntoIter, Iter, Keys, Values};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::backing::{BackingStore, NullStore};
use crate::cache::{CacheStats, Capacity, RecencyList};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Bounded Cache ==
/// A map that keeps only its most recently used entries in memory and
/// writes every insert through to a backing store.
///
/// Reads of non-resident keys are served by [`BackingStore::fetch`] but
/// do not bring the key back into memory: residency only changes through
/// writes. Iteration, `len` and `contains_key` describe the resident
/// table alone.
///
/// Not thread-safe. Wrap the whole cache in one lock if it must be shared.
#[derive(Debug)]
pub struct BoundedCache<K, V, S = NullStore<K, V>> {
    /// Resident entries, in insertion order
    table: IndexMap<K, V>,
    /// Resident keys, most recently used first
    recency: RecencyList<K>,
    /// Resident entry limit
    capacity: Capacity,
    /// Write-through persistence
    backing: S,
    /// Performance statistics
    stats: CacheStats,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache whose evicted entries are simply dropped.
    pub fn without_backing(capacity: impl Into<Capacity>) -> Self {
        Self::new(NullStore::new(), capacity)
    }
}

impl<K, V, S> BoundedCache<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BackingStore<K, V>,
{
    // == Constructor ==
    /// Creates an empty cache in front of `backing`.
    ///
    /// # Arguments
    /// * `backing` - Store receiving every insert and answering misses
    /// * `capacity` - Resident entry limit; `0` means unbounded
    pub fn new(backing: S, capacity: impl Into<Capacity>) -> Self {
        let capacity = capacity.into();
        debug!(limit = ?capacity.limit(), "Created bounded cache");

        Self {
            table: IndexMap::new(),
            recency: RecencyList::new(),
            capacity,
            backing,
            stats: CacheStats::new(),
        }
    }

    /// Creates an empty cache using the resident limit from `config`.
    pub fn with_config(backing: S, config: &CacheConfig) -> Self {
        Self::new(backing, config.max_resident)
    }

    /// Creates a cache and inserts `entries` one at a time.
    ///
    /// Each pair goes through [`insert`](Self::insert), so initial contents
    /// are persisted and subject to eviction straight away.
    pub fn with_entries<I>(
        backing: S,
        capacity: impl Into<Capacity>,
        entries: I,
    ) -> Result<Self, S::Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut cache = Self::new(backing, capacity);
        cache.update(entries)?;
        Ok(cache)
    }

    // == Get ==
    /// Retrieves the value for `key`.
    ///
    /// Resident keys are answered from memory and become most recently
    /// used. Other keys are fetched from the backing store without being
    /// made resident.
    pub fn get(&mut self, key: &K) -> Result<V, S::Error> {
        if let Some(value) = self.table.get(key) {
            let value = value.clone();
            self.recency.promote(key);
            self.stats.record_memory_hit();
            return Ok(value);
        }

        match self.backing.fetch(key).map_err(CacheError::Backing)? {
            Some(value) => {
                trace!("Served non-resident key from backing store");
                self.stats.record_backing_hit();
                Ok(value)
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::NotFound)
            }
        }
    }

    /// Like [`get`](Self::get), but returns `default` instead of `NotFound`.
    ///
    /// Backing store failures still propagate.
    pub fn get_or(&mut self, key: &K, default: V) -> Result<V, S::Error> {
        match self.get(key) {
            Err(CacheError::NotFound) => Ok(default),
            other => other,
        }
    }

    // == Peek ==
    /// Returns the resident value for `key` without touching recency or
    /// the backing store.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.table.get(key)
    }

    // == Insert ==
    /// Stores a key-value pair.
    ///
    /// The backing store is written first. If that write fails the error
    /// is returned and memory is left exactly as it was. Otherwise the
    /// pair becomes resident and most recently used, and least recently
    /// used entries are evicted until the resident limit holds again.
    /// Evicted entries are not written a second time.
    ///
    /// Overwriting a resident key keeps its place in iteration order.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), S::Error> {
        if let Err(e) = self.backing.store(&key, &value) {
            warn!("Backing store write failed, insert aborted");
            return Err(CacheError::Backing(e));
        }
        self.stats.record_store();

        self.table.insert(key.clone(), value);
        self.recency.touch(key);
        self.enforce_capacity();
        Ok(())
    }

    // == Update ==
    /// Inserts every pair in iteration order, exactly as repeated
    /// [`insert`](Self::insert) calls would.
    ///
    /// Stops at the first failing write; earlier pairs stay applied.
    pub fn update<I>(&mut self, entries: I) -> Result<(), S::Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.insert(key, value)?;
        }
        Ok(())
    }

    // == Set Default ==
    /// Returns the resident value for `key`, or inserts `default`.
    ///
    /// Only memory is consulted: a key held solely by the backing store
    /// counts as absent and its stored value is overwritten with
    /// `default`. A resident hit does not change recency.
    pub fn set_default(&mut self, key: K, default: V) -> Result<V, S::Error> {
        if let Some(value) = self.table.get(&key) {
            return Ok(value.clone());
        }
        self.insert(key, default.clone())?;
        Ok(default)
    }

    // == Delete ==
    /// Removes a resident entry.
    ///
    /// Fails with `NotFound` if the key isn't resident. The backing store
    /// is not asked to forget the key.
    pub fn delete(&mut self, key: &K) -> Result<(), S::Error> {
        self.pop(key).map(|_| ())
    }

    // == Pop ==
    /// Removes a resident entry and returns its value.
    ///
    /// Never consults the backing store.
    pub fn pop(&mut self, key: &K) -> Result<V, S::Error> {
        let value = self.table.shift_remove(key).ok_or(CacheError::NotFound)?;
        self.recency.remove(key);
        Ok(value)
    }

    /// Like [`pop`](Self::pop), but returns `default` if the key isn't resident.
    pub fn pop_or(&mut self, key: &K, default: V) -> V {
        self.pop(key).unwrap_or(default)
    }

    /// Removes and returns the most recently inserted resident entry.
    pub fn pop_item(&mut self) -> Result<(K, V), S::Error> {
        let (key, value) = self.table.pop().ok_or(CacheError::NotFound)?;
        self.recency.remove(&key);
        Ok((key, value))
    }

    // == Clear ==
    /// Drops every resident entry. The backing store is untouched.
    pub fn clear(&mut self) {
        self.table.clear();
        self.recency.clear();
    }

    // == Enforce Capacity ==
    fn enforce_capacity(&mut self) {
        let Some(limit) = self.capacity.limit() else {
            return;
        };

        while self.table.len() > limit {
            let Some(victim) = self.recency.evict_oldest() else {
                break;
            };
            self.table.shift_remove(&victim);
            self.stats.record_eviction();
            debug!(
                resident = self.table.len(),
                limit, "Evicted least recently used entry"
            );
        }
    }
}

impl<K, V, S> BoundedCache<K, V, S>
where
    K: Eq + Hash,
{
    // == Contains ==
    /// True if `key` is resident. The backing store is not consulted.
    pub fn contains_key(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    // == Length ==
    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<K, V, S> BoundedCache<K, V, S> {
    // == Iteration ==
    /// Resident entries in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        self.table.keys()
    }

    pub fn values(&self) -> Values<'_, K, V> {
        self.table.values()
    }

    /// Resident keys from most to least recently used.
    pub fn recency(&self) -> impl Iterator<Item = &K> + '_ {
        self.recency.iter()
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    // == Backing Store Access ==
    pub fn backing(&self) -> &S {
        &self.backing
    }

    /// Mutable access to the store, e.g. to apply its own deletion policy.
    pub fn backing_mut(&mut self) -> &mut S {
        &mut self.backing
    }

    pub fn into_backing(self) -> S {
        self.backing
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_resident(self.table.len());
        stats
    }

    /// True when the recency list tracks exactly the resident keys.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool
    where
        K: Eq + Hash,
    {
        let tracked: std::collections::HashSet<&K> = self.recency.iter().collect();
        tracked.len() == self.recency.len()
            && tracked.len() == self.table.len()
            && self.table.keys().all(|k| tracked.contains(k))
    }
}

/// A copy holds the same resident entries and recency order with fresh
/// statistics. The store is cloned, so whether the two caches share
/// persisted data depends on the store.
impl<K, V, S> Clone for BoundedCache<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        let mut stats = CacheStats::new();
        stats.set_resident(self.table.len());

        Self {
            table: self.table.clone(),
            recency: self.recency.clone(),
            capacity: self.capacity,
            backing: self.backing.clone(),
            stats,
        }
    }
}

/// Compares resident contents only, ignoring order.
impl<K, V, S, S2> PartialEq<BoundedCache<K, V, S2>> for BoundedCache<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &BoundedCache<K, V, S2>) -> bool {
        self.table == other.table
    }
}

impl<'a, K, V, S> IntoIterator for &'a BoundedCache<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.iter()
    }
}

/// Consumes the cache, yielding resident entries in insertion order.
impl<K, V, S> IntoIterator for BoundedCache<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}
