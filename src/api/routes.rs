//! API Routes
//!
//! Configures the Axum router with all blob cache endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, get_blob_handler, health_handler, preload_handler, remove_blob_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /blob?url=` - Return a blob, fetching it on a miss
/// - `DELETE /blob?url=` - Drop a cached blob
/// - `POST /preload` - Warm the cache for a batch of URLs
/// - `DELETE /cache` - Drop every cached blob
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/blob", get(get_blob_handler).delete(remove_blob_handler))
        .route("/preload", post(preload_handler))
        .route("/cache", delete(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
