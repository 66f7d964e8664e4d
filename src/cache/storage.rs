//! Shared Storage Module
//!
//! Serializes access to a [`BlobStore`] so many tasks can use it at once.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::cache::{BlobStore, CacheStats};

// == Cache Storage Trait ==
/// Storage capability used by the cache facade.
///
/// Each call is atomic with respect to every other call on the same storage.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    async fn get(&self, key: &str) -> Option<Bytes>;
    async fn touch(&self, key: &str);
    async fn contains(&self, key: &str) -> bool;
    async fn store(&self, key: &str, blob: Bytes);
    async fn remove(&self, key: &str);
    async fn remove_all(&self);
    async fn stats(&self) -> CacheStats;
}

// == Shared Store ==
/// A [`BlobStore`] behind a single `RwLock`.
///
/// Every store operation runs under one guard acquisition, so the byte
/// accounting and recency order are consistent at every observable point.
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<RwLock<BlobStore>>,
}

impl SharedStore {
    pub fn new(store: BlobStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Creates a shared store with the given item and byte limits.
    pub fn with_limits(max_items: usize, max_bytes: usize) -> Self {
        Self::new(BlobStore::new(max_items, max_bytes))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn total_bytes(&self) -> usize {
        self.inner.read().await.total_bytes()
    }

    pub async fn keys_by_recency(&self) -> Vec<String> {
        self.inner.read().await.keys_by_recency()
    }
}

impl Default for SharedStore {
    fn default() -> Self {
        Self::new(BlobStore::default())
    }
}

#[async_trait]
impl CacheStorage for SharedStore {
    async fn get(&self, key: &str) -> Option<Bytes> {
        self.inner.read().await.get(key)
    }

    async fn touch(&self, key: &str) {
        self.inner.write().await.touch(key);
    }

    async fn contains(&self, key: &str) -> bool {
        self.inner.read().await.contains(key)
    }

    async fn store(&self, key: &str, blob: Bytes) {
        self.inner.write().await.store(key.to_string(), blob);
    }

    async fn remove(&self, key: &str) {
        self.inner.write().await.remove(key);
    }

    async fn remove_all(&self) {
        self.inner.write().await.remove_all();
    }

    async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }
}
