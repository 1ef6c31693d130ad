//! Recency List Module
//!
//! Implements Least Recently Used ordering for resident keys.

use std::collections::VecDeque;

// == Recency List ==
/// Tracks access order of resident keys for LRU eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// A key appears at most once.
#[derive(Debug, Clone)]
pub struct RecencyList<K> {
    /// Order of keys by access time
    order: VecDeque<K>,
}

impl<K> Default for RecencyList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RecencyList<K> {
    // == Constructor ==
    /// Creates a new empty recency list.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if the list is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        self.order.pop_back()
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.back()
    }

    // == Iter ==
    /// Iterates from most to least recently used.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.order.iter()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<K: PartialEq> RecencyList<K> {
    // == Touch ==
    /// Marks a key as most recently used (moves to front).
    ///
    /// If key exists, removes it first then adds to front.
    /// If key is new, just adds to front.
    pub fn touch(&mut self, key: K) {
        self.remove(&key);
        self.order.push_front(key);
    }

    // == Promote ==
    /// Moves an already tracked key to the front.
    ///
    /// Returns false, leaving the list untouched, if the key isn't tracked.
    pub fn promote(&mut self, key: &K) -> bool {
        match self.order.iter().position(|k| k == key) {
            Some(0) => true,
            Some(index) => {
                if let Some(k) = self.order.remove(index) {
                    self.order.push_front(k);
                }
                true
            }
            None => false,
        }
    }

    // == Remove ==
    /// Removes a key from the list. Absent keys are ignored.
    pub fn remove(&mut self, key: &K) {
        if let Some(index) = self.order.iter().position(|k| k == key) {
            self.order.remove(index);
        }
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
