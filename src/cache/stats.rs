//! Cache Statistics Module
//!
//! Tracks cache diagnostics: hits, misses, evictions and current occupancy.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups through the cache facade that returned a blob
    pub hits: u64,
    /// Lookups through the cache facade that found nothing
    pub misses: u64,
    /// Entries removed by the LRU policy (count or byte limit)
    pub evictions: u64,
    /// Current number of entries
    pub total_entries: usize,
    /// Current sum of entry sizes in bytes
    pub total_bytes: usize,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing has been looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Update Occupancy ==
    pub fn set_occupancy(&mut self, entries: usize, bytes: usize) {
        self.total_entries = entries;
        self.total_bytes = bytes;
    }
}
