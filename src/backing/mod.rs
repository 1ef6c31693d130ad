//! Backing Store Module
//!
//! The collaborator contract behind the resident table, plus sample stores.
//!
//! # Stores
//! - `NullStore` - Accepts writes and forgets them
//! - `MemoryStore` - Unbounded HashMap
//! - `FileStore` - One JSON file per key under a root directory

mod file;
mod memory;

use std::convert::Infallible;
use std::marker::PhantomData;

pub use file::{FileKey, FileStore, FileStoreError};
pub use memory::MemoryStore;

// == Backing Store ==
/// Logically unbounded persistence behind a [`BoundedCache`].
///
/// The cache only ever calls these two methods and never interprets
/// `Self::Error`; it is handed back to the caller as-is.
///
/// [`BoundedCache`]: crate::cache::BoundedCache
pub trait BackingStore<K, V> {
    /// Failure reported by the store
    type Error;

    /// Persists `value` under `key`, replacing any earlier value.
    fn store(&mut self, key: &K, value: &V) -> Result<(), Self::Error>;

    /// Retrieves the value stored under `key`.
    ///
    /// `Ok(None)` signals that the store has no such key.
    fn fetch(&self, key: &K) -> Result<Option<V>, Self::Error>;
}

impl<K, V, S: BackingStore<K, V> + ?Sized> BackingStore<K, V> for Box<S> {
    type Error = S::Error;

    fn store(&mut self, key: &K, value: &V) -> Result<(), Self::Error> {
        (**self).store(key, value)
    }

    fn fetch(&self, key: &K) -> Result<Option<V>, Self::Error> {
        (**self).fetch(key)
    }
}

// == Null Store ==
/// A store that discards writes and never finds anything.
///
/// A cache over it behaves like a plain bounded LRU map: evicted
/// entries are gone for good.
#[derive(Debug)]
pub struct NullStore<K, V> {
    _marker: PhantomData<fn(K, V)>,
}

impl<K, V> NullStore<K, V> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<K, V> Default for NullStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for NullStore<K, V> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<K, V> BackingStore<K, V> for NullStore<K, V> {
    type Error = Infallible;

    fn store(&mut self, _key: &K, _value: &V) -> Result<(), Self::Error> {
        Ok(())
    }

    fn fetch(&self, _key: &K) -> Result<Option<V>, Self::Error> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_store_forgets_everything() {
        let mut store: NullStore<u32, String> = NullStore::new();
        store.store(&1, &"one".to_string()).unwrap();
        assert_eq!(store.fetch(&1).unwrap(), None);
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<MemoryStore<u32, &str>> = Box::default();
        store.store(&1, &"one").unwrap();
        assert_eq!(store.fetch(&1).unwrap(), Some("one"));
        assert_eq!(store.fetch(&2).unwrap(), None);
    }
}
