//! Cacheback - A bounded LRU dictionary in front of an unbounded backing store
//!
//! Keeps the most recently used entries in memory, writes every insert
//! through to a backing store, and reads evicted entries back from it.

pub mod backing;
pub mod cache;
pub mod config;
pub mod error;

pub use backing::{BackingStore, FileStore, MemoryStore, NullStore};
pub use cache::{BoundedCache, CacheStats, Capacity};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
