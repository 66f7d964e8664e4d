//! Blob Fetch Client
//!
//! Cache-first blob loading. On a miss the blob is fetched over the
//! transport, stored, and returned. Preloading warms the cache for the
//! first few keys of a batch with bounded concurrency.
//!
//! Concurrent misses for the same key are not coalesced: each caller
//! fetches and stores, and the last store wins.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::cache::{BlobCache, BlobCacheService};
use crate::client::transport::{BlobTransport, HttpTransport, TransportResponse};
use crate::config::Config;
use crate::error::{FetchError, Result};

// == Blob Loader Trait ==
/// Blob retrieval surface exposed to callers.
#[async_trait]
pub trait BlobLoader: Send + Sync {
    /// Returns the blob for `key`, fetching and caching it on a miss.
    async fn load_blob(&self, key: &str) -> Result<Bytes>;

    /// Best-effort warm-up of the first keys in `keys`. Never fails.
    async fn preload_blobs(&self, keys: &[String]);
}

// == Blob Fetch Client ==
/// Cheap to clone; clones share the cache and the transport.
#[derive(Clone)]
pub struct BlobFetchClient {
    cache: Arc<dyn BlobCache>,
    transport: Arc<dyn BlobTransport>,
    preload_batch_limit: usize,
}

impl BlobFetchClient {
    pub fn new(
        cache: Arc<dyn BlobCache>,
        transport: Arc<dyn BlobTransport>,
        preload_batch_limit: usize,
    ) -> Self {
        Self {
            cache,
            transport,
            preload_batch_limit,
        }
    }

    /// Builds the HTTP transport from `config` and wires it to `cache`.
    pub fn from_config(config: &Config, cache: Arc<BlobCacheService>) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(
            cache,
            Arc::new(transport),
            config.preload_batch_limit,
        ))
    }

    pub fn preload_batch_limit(&self) -> usize {
        self.preload_batch_limit
    }

    async fn fetch(&self, key: &str) -> Result<Bytes> {
        let url = parse_blob_url(key)?;

        let response = self.transport.get(&url).await.map_err(|err| {
            error!(url = %url, error = %err, "Network error");
            err
        })?;

        classify_response(response).map_err(|err| {
            error!(url = %url, error = %err, "Blob request failed");
            err
        })
    }
}

#[async_trait]
impl BlobLoader for BlobFetchClient {
    async fn load_blob(&self, key: &str) -> Result<Bytes> {
        if let Some(blob) = self.cache.get_cached_blob(key).await {
            return Ok(blob);
        }

        let blob = self.fetch(key).await?;
        self.cache.cache_blob(blob.clone(), key).await;
        debug!(key, size = blob.len(), "Fetched and cached blob");

        Ok(blob)
    }

    async fn preload_blobs(&self, keys: &[String]) {
        let limit = self.preload_batch_limit;
        if keys.len() > limit {
            debug!(
                requested = keys.len(),
                limit, "Preload batch truncated to leading keys"
            );
        }

        let permits = Arc::new(Semaphore::new(limit.max(1)));
        let mut tasks = JoinSet::new();

        for key in keys.iter().take(limit) {
            let client = self.clone();
            let permits = Arc::clone(&permits);
            let key = key.clone();

            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                if let Err(err) = client.load_blob(&key).await {
                    warn!(key = %key, error = %err, "Preload failed");
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "Preload task did not complete");
            }
        }
    }
}

/// Interprets a cache key as an http(s) URL.
pub fn parse_blob_url(key: &str) -> Result<Url> {
    let url = Url::parse(key)
        .map_err(|e| FetchError::InvalidRequest(format!("Invalid URL '{}': {}", key, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(FetchError::InvalidRequest(format!(
            "Unsupported URL scheme '{}' in '{}'",
            scheme, key
        ))),
    }
}

/// Only a 200 carries a cacheable blob.
pub fn classify_response(response: TransportResponse) -> Result<Bytes> {
    match response.status {
        200 => Ok(response.body),
        100..=599 => Err(FetchError::HttpStatus(response.status)),
        other => Err(FetchError::Unknown(format!("Unexpected status code {}", other))),
    }
}
