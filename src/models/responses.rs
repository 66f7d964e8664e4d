//! Response DTOs for the blob cache API
//!
//! Defines the structure of outgoing JSON response bodies. Blob bodies
//! themselves are returned as raw bytes.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for `DELETE /blob`
#[derive(Debug, Clone, Serialize)]
pub struct RemoveResponse {
    pub message: String,
    /// The URL whose entry was removed
    pub url: String,
}

impl RemoveResponse {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            message: format!("Blob '{}' removed", url),
            url,
        }
    }
}

/// Response body for `POST /preload`
#[derive(Debug, Clone, Serialize)]
pub struct PreloadResponse {
    pub message: String,
    /// Number of URLs that will actually be fetched
    pub accepted: usize,
    /// Number of URLs dropped by the batch limit
    pub skipped: usize,
}

impl PreloadResponse {
    pub fn new(requested: usize, limit: usize) -> Self {
        let accepted = requested.min(limit);
        Self {
            message: format!("Preloading {} of {} blobs", accepted, requested),
            accepted,
            skipped: requested - accepted,
        }
    }
}

/// Response body for `DELETE /cache`
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Current sum of blob sizes
    pub total_bytes: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            total_bytes: stats.total_bytes,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
