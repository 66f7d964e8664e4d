//! Blob Store Module
//!
//! Bounded LRU store combining HashMap storage with recency tracking,
//! an item-count limit and a total-byte budget.

use std::collections::HashMap;

use bytes::Bytes;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, RecencyTracker, DEFAULT_MAX_BYTES, DEFAULT_MAX_ITEMS};

// == Blob Store ==
/// Key to blob storage bounded by item count and total bytes.
///
/// All operations are total: looking up or removing a missing key is a
/// no-op, never an error. The store is not synchronized; wrap it in
/// [`SharedStore`](crate::cache::SharedStore) to share it between tasks.
#[derive(Debug)]
pub struct BlobStore {
    /// Key to blob storage
    entries: HashMap<String, CacheEntry>,
    /// Access order, least recently used first
    recency: RecencyTracker,
    /// Sum of entry sizes
    total_bytes: usize,
    /// Maximum number of entries allowed
    max_items: usize,
    /// Maximum sum of entry sizes
    max_bytes: usize,
    stats: CacheStats,
}

impl BlobStore {
    // == Constructor ==
    /// Creates a new BlobStore with the given limits.
    ///
    /// # Arguments
    /// * `max_items` - Maximum number of entries the store can hold
    /// * `max_bytes` - Maximum total size of all blobs in bytes
    pub fn new(max_items: usize, max_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            recency: RecencyTracker::new(),
            total_bytes: 0,
            max_items,
            max_bytes,
            stats: CacheStats::new(),
        }
    }

    // == Get ==
    /// Returns the blob stored under `key` without touching recency.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.entries.get(key).map(|entry| entry.blob.clone())
    }

    // == Touch ==
    /// Marks `key` as most recently used. No-op if the key is absent.
    pub fn touch(&mut self, key: &str) {
        if self.entries.contains_key(key) {
            self.recency.touch(key);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Store ==
    /// Inserts or replaces `key`, evicting least recently used entries
    /// until both the byte budget and the item limit hold.
    ///
    /// A single blob larger than `max_bytes` is still accepted once every
    /// other entry has been evicted.
    pub fn store(&mut self, key: String, blob: Bytes) {
        let incoming = blob.len();

        // Detach the previous value so its size is only counted once
        if let Some(previous) = self.entries.remove(&key) {
            self.total_bytes -= previous.size();
            self.recency.remove(&key);
        }

        while self.total_bytes + incoming > self.max_bytes && !self.entries.is_empty() {
            if !self.evict_oldest() {
                break;
            }
        }

        if incoming > self.max_bytes {
            debug!(key = %key, size = incoming, max_bytes = self.max_bytes, "Storing blob larger than byte budget");
        }

        self.entries.insert(key.clone(), CacheEntry::new(blob));
        self.total_bytes += incoming;
        self.recency.touch(&key);

        while self.entries.len() > self.max_items {
            if !self.evict_oldest() {
                break;
            }
        }

        self.stats.set_occupancy(self.entries.len(), self.total_bytes);
    }

    // == Remove ==
    /// Removes `key` if present. Calling it on an absent key does nothing.
    pub fn remove(&mut self, key: &str) {
        if let Some(entry) = self.entries.remove(key) {
            self.total_bytes -= entry.size();
            self.recency.remove(key);
            self.stats.set_occupancy(self.entries.len(), self.total_bytes);
        }
    }

    // == Remove All ==
    pub fn remove_all(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.total_bytes = 0;
        self.stats.set_occupancy(0, 0);
    }

    // == Stats ==
    /// Returns eviction and occupancy counters. Hits and misses are
    /// recorded by the cache facade, not here.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_occupancy(self.entries.len(), self.total_bytes);
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Keys ordered from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.recency.iter().map(str::to_string).collect()
    }

    // == Evict Oldest ==
    /// Evicts the least recently used entry. Returns false if nothing was tracked.
    fn evict_oldest(&mut self) -> bool {
        let Some(key) = self.recency.pop_oldest() else {
            return false;
        };

        if let Some(entry) = self.entries.remove(&key) {
            self.total_bytes -= entry.size();
            self.stats.record_eviction();
            debug!(key = %key, size = entry.size(), "Evicted least recently used blob");
        }
        true
    }
}

impl Default for BlobStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEMS, DEFAULT_MAX_BYTES)
    }
}
