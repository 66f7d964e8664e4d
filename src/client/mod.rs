//! Client Module
//!
//! Fetches blobs over HTTP on cache misses.
//!
//! # Components
//! - Transport: issues GET requests under a shared connection cap
//! - Fetcher: cache-first loading and bounded-concurrency preloading

mod fetcher;
mod transport;

pub use fetcher::{classify_response, parse_blob_url, BlobFetchClient, BlobLoader};
pub use transport::{BlobTransport, HttpTransport, TransportResponse};
