//! Cache Module
//!
//! Provides the bounded in-memory LRU table that fronts a backing store.

mod lru;
mod stats;
mod store;


use std::num::NonZeroUsize;

// Re-export public types
pub use lru::RecencyList;
pub use stats::CacheStats;
pub use store::BoundedCache;

// == Public Constants ==
/// Resident entry limit used when none is configured
pub const DEFAULT_MAX_RESIDENT: usize = 1000;

// == Capacity ==
/// How many entries may stay resident in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capacity {
    /// At most this many resident entries
    Bounded(NonZeroUsize),
    /// Every inserted entry stays resident
    Unbounded,
}

impl Capacity {
    /// Returns the resident limit, or None when unbounded.
    pub fn limit(&self) -> Option<usize> {
        match self {
            Capacity::Bounded(n) => Some(n.get()),
            Capacity::Unbounded => None,
        }
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self::from(DEFAULT_MAX_RESIDENT)
    }
}

/// `0` means "no limit", never "a cache that holds nothing".
impl From<usize> for Capacity {
    fn from(n: usize) -> Self {
        NonZeroUsize::new(n).map_or(Capacity::Unbounded, Capacity::Bounded)
    }
}

impl From<NonZeroUsize> for Capacity {
    fn from(n: NonZeroUsize) -> Self {
        Capacity::Bounded(n)
    }
}
