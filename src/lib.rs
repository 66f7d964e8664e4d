//! Blob Cache - An in-memory LRU cache for downloaded blobs
//!
//! Serves previously fetched byte blobs (images) by URL, bounded by both an
//! item count and a byte budget, and fetches misses over HTTP with bounded
//! concurrency.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{BlobCache, BlobCacheService, BlobStore, CacheStorage, SharedStore};
pub use client::{BlobFetchClient, BlobLoader, BlobTransport, HttpTransport};
pub use config::Config;
pub use error::{FetchError, StatusKind};
