//! Configuration Module
//!
//! Handles loading cache and fetch configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_MAX_BYTES, DEFAULT_MAX_ITEMS};

/// Cache, transport and server configuration.
///
/// All values are fixed at construction; nothing here is adjusted at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of cached blobs
    pub max_items: usize,
    /// Maximum total size of cached blobs in bytes
    pub max_memory_bytes: usize,
    /// Maximum simultaneous requests on the shared transport
    pub max_concurrent_connections: usize,
    /// Number of leading keys a preload call considers (also its fan-out)
    pub preload_batch_limit: usize,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Static `Authorization` header value sent with every request
    pub auth_header: Option<String>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ITEMS` - Maximum cached blobs (default: 100)
    /// - `MAX_MEMORY_BYTES` - Byte budget (default: 52428800)
    /// - `MAX_CONCURRENT_CONNECTIONS` - Transport request cap (default: 5)
    /// - `PRELOAD_BATCH_LIMIT` - Keys considered per preload (default: 5)
    /// - `REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
    /// - `AUTH_HEADER` - Authorization header value (default: unset)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_items: env_or("MAX_ITEMS", defaults.max_items),
            max_memory_bytes: env_or("MAX_MEMORY_BYTES", defaults.max_memory_bytes),
            max_concurrent_connections: env_or(
                "MAX_CONCURRENT_CONNECTIONS",
                defaults.max_concurrent_connections,
            ),
            preload_batch_limit: env_or("PRELOAD_BATCH_LIMIT", defaults.preload_batch_limit),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            auth_header: env::var("AUTH_HEADER").ok().filter(|v| !v.is_empty()),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Parses an environment variable, falling back when unset or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            max_memory_bytes: DEFAULT_MAX_BYTES,
            max_concurrent_connections: 5,
            preload_batch_limit: 5,
            request_timeout_secs: 30,
            auth_header: None,
            server_port: 3000,
        }
    }
}
