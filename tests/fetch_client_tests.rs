//! Integration Tests for the Fetch Pipeline
//!
//! Exercises cache-first loading, preload limits and the transport's
//! connection cap, against scripted transports and a local origin server.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use blob_cache::cache::{BlobCache, BlobCacheService};
use blob_cache::client::{BlobFetchClient, BlobLoader, BlobTransport, HttpTransport, TransportResponse};
use blob_cache::error::{FetchError, Result, StatusKind};
use bytes::Bytes;
use reqwest::Url;
use tokio::sync::Barrier;

// == Scripted Transport ==

/// Serves 200s after a delay, failing any URL containing "fail", and
/// records concurrency.
#[derive(Default)]
struct ScriptedTransport {
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobTransport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse> {
        self.requested.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if url.path().contains("fail") {
            Ok(TransportResponse::new(500, Bytes::new()))
        } else {
            Ok(TransportResponse::new(200, format!("blob:{}", url.path())))
        }
    }
}

fn urls(paths: &[&str]) -> Vec<String> {
    paths
        .iter()
        .map(|p| format!("https://images.test/{}", p))
        .collect()
}

fn client_for(transport: Arc<dyn BlobTransport>) -> (BlobFetchClient, Arc<BlobCacheService>) {
    let cache = Arc::new(BlobCacheService::with_limits(100, 1024 * 1024));
    let client = BlobFetchClient::new(cache.clone(), transport, 5);
    (client, cache)
}

// == Preload Tests ==

#[tokio::test]
async fn test_preload_fan_out_cap_and_truncation() {
    let transport = Arc::new(ScriptedTransport::with_delay(Duration::from_millis(50)));
    let (client, cache) = client_for(transport.clone());
    let keys = urls(&["1", "2", "3", "4", "5", "6", "7", "8"]);

    client.preload_blobs(&keys).await;

    assert!(transport.max_in_flight.load(Ordering::SeqCst) <= 5);
    let requested: HashSet<String> = transport.requested().into_iter().collect();
    let expected: HashSet<String> = keys[..5].iter().cloned().collect();
    assert_eq!(requested, expected);

    for key in &keys[..5] {
        assert!(cache.contains(key).await);
    }
    for key in &keys[5..] {
        assert!(!cache.contains(key).await);
    }
}

#[tokio::test]
async fn test_preload_failure_isolation() {
    let transport = Arc::new(ScriptedTransport::with_delay(Duration::from_millis(5)));
    let (client, cache) = client_for(transport.clone());
    let keys = urls(&["ok-1", "fail-1", "ok-2", "fail-2", "ok-3"]);

    // Completes without surfacing the two failures
    client.preload_blobs(&keys).await;

    assert_eq!(transport.requested().len(), 5);
    for key in &keys {
        assert_eq!(cache.contains(key).await, !key.contains("fail"), "{key}");
    }
}

#[tokio::test]
async fn test_preload_skips_invalid_keys() {
    let transport = Arc::new(ScriptedTransport::default());
    let (client, cache) = client_for(transport.clone());
    let mut keys = urls(&["a"]);
    keys.push("not a url".to_string());

    client.preload_blobs(&keys).await;

    assert_eq!(transport.requested(), urls(&["a"]));
    assert_eq!(cache.stats().await.total_entries, 1);
}

#[tokio::test]
async fn test_preload_empty_batch() {
    let transport = Arc::new(ScriptedTransport::default());
    let (client, _cache) = client_for(transport.clone());

    client.preload_blobs(&[]).await;

    assert!(transport.requested().is_empty());
}

// == Load Tests ==

#[tokio::test]
async fn test_cache_blob_then_load_skips_transport() {
    let transport = Arc::new(ScriptedTransport::default());
    let (client, cache) = client_for(transport.clone());
    let payload = Bytes::from_static(b"\xff\xd8\xff\xe0 jpeg");

    cache.cache_blob(payload.clone(), "k").await;

    assert_eq!(client.load_blob("k").await.unwrap(), payload);
    assert!(transport.requested().is_empty());
}

/// Holds every request until two have arrived.
struct RendezvousTransport {
    barrier: Barrier,
    calls: AtomicUsize,
}

#[async_trait]
impl BlobTransport for RendezvousTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.barrier.wait().await;
        Ok(TransportResponse::new(200, format!("{}#{}", url, call)))
    }
}

#[tokio::test]
async fn test_concurrent_misses_both_fetch() {
    let transport = Arc::new(RendezvousTransport {
        barrier: Barrier::new(2),
        calls: AtomicUsize::new(0),
    });
    let (client, cache) = client_for(transport.clone());
    let key = "https://images.test/same.png";

    // Would hang if the two misses were coalesced into one request
    let (a, b) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(client.load_blob(key), client.load_blob(key))
    })
    .await
    .expect("both misses should reach the transport");

    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    assert_ne!(a, b);

    let stored = cache.get_cached_blob(key).await.unwrap();
    assert!(stored == a || stored == b);
    assert_eq!(cache.stats().await.total_entries, 1);
}

#[tokio::test]
async fn test_cancelled_load_stores_nothing() {
    let transport = Arc::new(ScriptedTransport::with_delay(Duration::from_secs(30)));
    let (client, cache) = client_for(transport.clone());
    let key = "https://images.test/slow.png";

    let result = tokio::time::timeout(Duration::from_millis(50), client.load_blob(key)).await;

    assert!(result.is_err());
    assert_eq!(transport.requested().len(), 1);
    assert!(!cache.contains(key).await);
}

// == Local Origin Server ==

#[derive(Default)]
struct Origin {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    hits: AtomicUsize,
}

async fn image(State(origin): State<Arc<Origin>>, Path(name): Path<String>) -> Vec<u8> {
    origin.hits.fetch_add(1, Ordering::SeqCst);
    format!("image:{}", name).into_bytes()
}

async fn slow_image(State(origin): State<Arc<Origin>>, Path(name): Path<String>) -> Vec<u8> {
    let now = origin.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    origin.max_in_flight.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(40)).await;
    origin.in_flight.fetch_sub(1, Ordering::SeqCst);
    format!("slow:{}", name).into_bytes()
}

async fn private_image(headers: HeaderMap) -> (StatusCode, &'static str) {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("test-key") => (StatusCode::OK, "private"),
        _ => (StatusCode::UNAUTHORIZED, "denied"),
    }
}

async fn limited() -> StatusCode {
    StatusCode::TOO_MANY_REQUESTS
}

async fn spawn_origin() -> (SocketAddr, Arc<Origin>) {
    let origin = Arc::new(Origin::default());
    let app = Router::new()
        .route("/img/:name", get(image))
        .route("/slow/:name", get(slow_image))
        .route("/private", get(private_image))
        .route("/limited", get(limited))
        .with_state(origin.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, origin)
}

fn http_transport(auth: Option<&str>) -> HttpTransport {
    HttpTransport::new(5, Duration::from_secs(5), auth).unwrap()
}

#[tokio::test]
async fn test_http_load_and_cache() {
    let (addr, origin) = spawn_origin().await;
    let (client, cache) = client_for(Arc::new(http_transport(None)));
    let url = format!("http://{}/img/cat.png", addr);

    let first = client.load_blob(&url).await.unwrap();
    let second = client.load_blob(&url).await.unwrap();

    assert_eq!(first, Bytes::from_static(b"image:cat.png"));
    assert_eq!(second, first);
    assert_eq!(origin.hits.load(Ordering::SeqCst), 1);
    assert!(cache.contains(&url).await);
}

#[tokio::test]
async fn test_http_status_classification() {
    let (addr, _origin) = spawn_origin().await;
    let (client, cache) = client_for(Arc::new(http_transport(None)));

    let cases = [
        (format!("http://{}/private", addr), StatusKind::Unauthorized),
        (format!("http://{}/limited", addr), StatusKind::RateLimited),
        (format!("http://{}/missing", addr), StatusKind::Other),
    ];
    for (url, kind) in cases {
        let err = client.load_blob(&url).await.unwrap_err();
        assert_eq!(err.status_kind(), Some(kind), "{url}");
        assert!(!cache.contains(&url).await);
    }
}

#[tokio::test]
async fn test_http_static_credential_header() {
    let (addr, _origin) = spawn_origin().await;
    let (client, _cache) = client_for(Arc::new(http_transport(Some("test-key"))));

    let blob = client
        .load_blob(&format!("http://{}/private", addr))
        .await
        .unwrap();

    assert_eq!(blob, Bytes::from_static(b"private"));
}

#[tokio::test]
async fn test_http_connection_refused() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (client, _cache) = client_for(Arc::new(http_transport(None)));

    let err = client
        .load_blob(&format!("http://{}/img/a.png", addr))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_connection_cap_shared_across_clients() {
    let (addr, origin) = spawn_origin().await;
    let transport = Arc::new(http_transport(None));
    let (client_a, _) = client_for(transport.clone());
    let (client_b, _) = client_for(transport.clone());

    let mut handles = Vec::new();
    for i in 0..12 {
        let client = if i % 2 == 0 {
            client_a.clone()
        } else {
            client_b.clone()
        };
        let url = format!("http://{}/slow/{}.png", addr, i);
        handles.push(tokio::spawn(async move { client.load_blob(&url).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let peak = origin.max_in_flight.load(Ordering::SeqCst);
    assert!(peak <= 5, "peak {} exceeded connection cap", peak);
    assert!(peak >= 1);
    assert_eq!(transport.in_flight(), 0);
}
