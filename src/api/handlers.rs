//! API Handlers
//!
//! HTTP request handlers for each blob cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::BlobCacheService;
use crate::client::{BlobFetchClient, BlobLoader};
use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::models::{
    BlobQuery, ClearResponse, HealthResponse, PreloadRequest, PreloadResponse, RemoveResponse,
    StatsResponse,
};
use crate::tasks::spawn_preload_task;

/// Application state shared across all handlers.
///
/// The fetch client and the handlers share one cache service.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<BlobCacheService>,
    pub loader: Arc<BlobFetchClient>,
}

impl AppState {
    pub fn new(cache: Arc<BlobCacheService>, loader: BlobFetchClient) -> Self {
        Self {
            cache,
            loader: Arc::new(loader),
        }
    }

    /// Creates the cache and the HTTP-backed fetch client from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = Arc::new(BlobCacheService::with_limits(
            config.max_items,
            config.max_memory_bytes,
        ));
        let loader = BlobFetchClient::from_config(config, cache.clone())?;
        Ok(Self::new(cache, loader))
    }
}

/// Handler for GET /blob?url=
///
/// Returns the blob bytes, fetching them on a cache miss.
pub async fn get_blob_handler(
    State(state): State<AppState>,
    Query(query): Query<BlobQuery>,
) -> Result<Response> {
    let blob = state.loader.load_blob(&query.url).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        blob,
    )
        .into_response())
}

/// Handler for DELETE /blob?url=
///
/// Removing an absent URL succeeds as well.
pub async fn remove_blob_handler(
    State(state): State<AppState>,
    Query(query): Query<BlobQuery>,
) -> Json<RemoveResponse> {
    state.cache.remove_blob(&query.url).await;
    Json(RemoveResponse::new(query.url))
}

/// Handler for POST /preload
///
/// Accepts the batch and preloads it in the background.
pub async fn preload_handler(
    State(state): State<AppState>,
    Json(req): Json<PreloadRequest>,
) -> Result<(StatusCode, Json<PreloadResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(FetchError::InvalidRequest(error_msg));
    }

    let response = PreloadResponse::new(req.urls.len(), state.loader.preload_batch_limit());
    spawn_preload_task(state.loader.clone(), req.urls);

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear().await;
    Json(ClearResponse::cleared())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
