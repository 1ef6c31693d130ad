//! In-memory backing store

use std::collections::HashMap;
use std::convert::Infallible;
use std::hash::Hash;

use super::BackingStore;

// == Memory Store ==
/// An unbounded HashMap acting as the backing store.
///
/// Handy for tests and for layering a small LRU window over a larger
/// in-process table.
#[derive(Debug, Clone)]
pub struct MemoryStore<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for MemoryStore<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> MemoryStore<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    // == Discard ==
    /// Drops a key from the store, returning its value.
    ///
    /// The cache never calls this; it is the store's own deletion policy.
    pub fn discard(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }
}

impl<K, V> BackingStore<K, V> for MemoryStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    type Error = Infallible;

    fn store(&mut self, key: &K, value: &V) -> Result<(), Self::Error> {
        self.entries.insert(key.clone(), value.clone());
        Ok(())
    }

    fn fetch(&self, key: &K) -> Result<Option<V>, Self::Error> {
        Ok(self.entries.get(key).cloned())
    }
}
