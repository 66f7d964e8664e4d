//! Network Transport
//!
//! Issues `GET` requests for blob URLs. The reqwest-backed transport caps the
//! number of requests in flight across every clone of it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Url};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::config::Config;
use crate::error::{FetchError, Result};

/// Raw outcome of a GET: status code and body, unclassified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

// == Blob Transport Trait ==
/// Performs a single GET. Implementations report connectivity problems as
/// errors and hand every HTTP status back to the caller for classification.
#[async_trait]
pub trait BlobTransport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<TransportResponse>;
}

// == HTTP Transport ==
/// reqwest client plus a connection cap shared by all clones.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    permits: Arc<Semaphore>,
    max_connections: usize,
}

impl HttpTransport {
    /// Builds a transport allowing at most `max_connections` requests in flight.
    ///
    /// # Arguments
    /// * `max_connections` - Simultaneous request cap (at least 1 is enforced)
    /// * `timeout` - Whole-request timeout
    /// * `auth_header` - Optional static `Authorization` header value
    pub fn new(max_connections: usize, timeout: Duration, auth_header: Option<&str>) -> Result<Self> {
        let max_connections = max_connections.max(1);

        let mut headers = HeaderMap::new();
        if let Some(value) = auth_header {
            let value = HeaderValue::from_str(value).map_err(|e| {
                FetchError::InvalidRequest(format!("Invalid authorization header: {}", e))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(max_connections)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            permits: Arc::new(Semaphore::new(max_connections)),
            max_connections,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.max_concurrent_connections,
            config.request_timeout(),
            config.auth_header.as_deref(),
        )
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Requests currently holding a connection slot.
    pub fn in_flight(&self) -> usize {
        self.max_connections - self.permits.available_permits()
    }
}

#[async_trait]
impl BlobTransport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse> {
        // Held until the body has been read
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| FetchError::Transport("connection pool closed".to_string()))?;

        debug!(url = %url, "Requesting blob");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(url = %url, status, size = body.len(), "Received response");
        Ok(TransportResponse { status, body })
    }
}
