//! Cache Statistics Module
//!
//! Tracks lookup outcomes, evictions and backing-store writes.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the resident table
    pub memory_hits: u64,
    /// Lookups answered by the backing store
    pub backing_hits: u64,
    /// Lookups that found nothing in either place
    pub misses: u64,
    /// Entries pushed out of memory by capacity pressure
    pub evictions: u64,
    /// Successful writes to the backing store
    pub stores: u64,
    /// Current number of resident entries
    pub resident: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Fraction of lookups served from memory.
    ///
    /// Returns memory_hits / (all lookups), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.memory_hits + self.backing_hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.memory_hits as f64 / total as f64
        }
    }

    // == Record Memory Hit ==
    /// Increments the memory hit counter.
    pub fn record_memory_hit(&mut self) {
        self.memory_hits += 1;
    }

    // == Record Backing Hit ==
    /// Increments the backing hit counter.
    pub fn record_backing_hit(&mut self) {
        self.backing_hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Store ==
    /// Increments the backing-store write counter.
    pub fn record_store(&mut self) {
        self.stores += 1;
    }

    // == Update Entry Count ==
    /// Updates the resident entry count.
    pub fn set_resident(&mut self, count: usize) {
        self.resident = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.memory_hits, 0);
        assert_eq!(stats.backing_hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.stores, 0);
        assert_eq!(stats.resident, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_backing_hits_count_against_memory() {
        let mut stats = CacheStats::new();
        stats.record_memory_hit();
        stats.record_backing_hit();
        stats.record_miss();
        stats.record_memory_hit();
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_record_counters() {
        let mut stats = CacheStats::new();
        stats.record_eviction();
        stats.record_eviction();
        stats.record_store();
        stats.set_resident(42);
        assert_eq!(stats.evictions, 2);
        assert_eq!(stats.stores, 1);
        assert_eq!(stats.resident, 42);
    }

    #[test]
    fn test_stats_serialize() {
        let mut stats = CacheStats::new();
        stats.record_backing_hit();
        stats.set_resident(3);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["backing_hits"], 1);
        assert_eq!(json["resident"], 3);
        assert_eq!(json["evictions"], 0);
    }
}
