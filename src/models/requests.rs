//! Request DTOs for the blob cache API
//!
//! Defines the query strings and bodies accepted by the HTTP front.

use serde::Deserialize;

/// Query string for `GET /blob` and `DELETE /blob`
#[derive(Debug, Clone, Deserialize)]
pub struct BlobQuery {
    /// Blob URL, used verbatim as the cache key
    pub url: String,
}

/// Request body for `POST /preload`
#[derive(Debug, Clone, Deserialize)]
pub struct PreloadRequest {
    /// URLs to warm, in priority order
    #[serde(default)]
    pub urls: Vec<String>,
}

impl PreloadRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.urls.iter().any(|url| url.trim().is_empty()) {
            return Some("Preload URLs cannot be empty".to_string());
        }
        None
    }
}
