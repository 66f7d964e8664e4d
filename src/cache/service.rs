//! Cache Service Module
//!
//! Read/write facade over a [`CacheStorage`]. A lookup that finds a blob
//! counts as a use and refreshes its recency.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::trace;

use crate::cache::{CacheStats, CacheStorage, SharedStore};

// == Blob Cache Trait ==
/// Cache capability consumed by the fetch client.
#[async_trait]
pub trait BlobCache: Send + Sync {
    /// Returns the cached blob for `key`, marking it recently used on a hit.
    async fn get_cached_blob(&self, key: &str) -> Option<Bytes>;

    /// Stores `blob` under `key`, evicting older entries as needed.
    async fn cache_blob(&self, blob: Bytes, key: &str);
}

// == Blob Cache Service ==
pub struct BlobCacheService {
    storage: Arc<dyn CacheStorage>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl BlobCacheService {
    pub fn new(storage: Arc<dyn CacheStorage>) -> Self {
        Self {
            storage,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a service over a fresh in-memory store with the given limits.
    pub fn with_limits(max_items: usize, max_bytes: usize) -> Self {
        Self::new(Arc::new(SharedStore::with_limits(max_items, max_bytes)))
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.storage.contains(key).await
    }

    pub async fn remove_blob(&self, key: &str) {
        self.storage.remove(key).await;
    }

    pub async fn clear(&self) {
        self.storage.remove_all().await;
    }

    // == Stats ==
    /// Storage counters merged with the lookups seen by this service.
    pub async fn stats(&self) -> CacheStats {
        let mut stats = self.storage.stats().await;
        stats.hits = self.hits.load(Ordering::Relaxed);
        stats.misses = self.misses.load(Ordering::Relaxed);
        stats
    }
}

impl Default for BlobCacheService {
    fn default() -> Self {
        Self::new(Arc::new(SharedStore::default()))
    }
}

#[async_trait]
impl BlobCache for BlobCacheService {
    async fn get_cached_blob(&self, key: &str) -> Option<Bytes> {
        let blob = self.storage.get(key).await;
        match blob {
            Some(_) => {
                self.storage.touch(key).await;
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(key, "Cache hit");
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!(key, "Cache miss");
            }
        }
        blob
    }

    async fn cache_blob(&self, blob: Bytes, key: &str) {
        self.storage.store(key, blob).await;
    }
}
