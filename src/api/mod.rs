//! API Module
//!
//! HTTP handlers and routing for the blob cache front.
//!
//! # Endpoints
//! - `GET /blob?url=` - Return a blob, fetching it on a miss
//! - `DELETE /blob?url=` - Drop a cached blob
//! - `POST /preload` - Warm the cache for a batch of URLs
//! - `DELETE /cache` - Drop every cached blob
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
