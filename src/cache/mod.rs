//! Cache Module
//!
//! Provides in-memory blob caching with LRU eviction bounded by both
//! item count and total bytes.

mod entry;
mod lru;
mod service;
mod stats;
mod storage;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::RecencyTracker;
pub use service::{BlobCache, BlobCacheService};
pub use stats::CacheStats;
pub use storage::{CacheStorage, SharedStore};
pub use store::BlobStore;

// == Public Constants ==
/// Default maximum number of cached blobs
pub const DEFAULT_MAX_ITEMS: usize = 100;

/// Default byte budget for all cached blobs
pub const DEFAULT_MAX_BYTES: usize = 50 * 1024 * 1024; // 50 MiB
