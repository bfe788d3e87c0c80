//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;

use bff_proxy::config::{BffConfig, RouteConfig};
use bff_proxy::lifecycle::Shutdown;
use bff_proxy::HttpServer;

/// What a mock backend has observed so far.
#[derive(Clone, Default)]
pub struct BackendLog {
    calls: Arc<AtomicU32>,
    last_path: Arc<Mutex<Option<String>>>,
    last_headers: Arc<Mutex<Option<HeaderMap>>>,
    last_body: Arc<Mutex<Option<Bytes>>>,
}

#[allow(dead_code)]
impl BackendLog {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Path plus query of the most recent request.
    pub fn last_path(&self) -> Option<String> {
        self.last_path.lock().unwrap().clone()
    }

    pub fn last_headers(&self) -> Option<HeaderMap> {
        self.last_headers.lock().unwrap().clone()
    }

    pub fn last_body(&self) -> Option<Bytes> {
        self.last_body.lock().unwrap().clone()
    }

    fn record(&self, uri: &Uri, headers: &HeaderMap, body: &Bytes) -> u32 {
        let path = uri
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_else(|| uri.path().to_string());
        *self.last_path.lock().unwrap() = Some(path);
        *self.last_headers.lock().unwrap() = Some(headers.clone());
        *self.last_body.lock().unwrap() = Some(body.clone());
        self.calls.fetch_add(1, Ordering::SeqCst)
    }
}

/// Start a mock JSON backend on an ephemeral port that answers every
/// request with a fixed status and body.
pub async fn start_json_backend(status: u16, body: &'static str) -> (SocketAddr, BackendLog) {
    start_sequence_backend(vec![(status, body.to_string())]).await
}

/// Start a mock JSON backend whose nth request gets the nth response;
/// the last response repeats once the sequence is exhausted.
pub async fn start_sequence_backend(
    responses: Vec<(u16, String)>,
) -> (SocketAddr, BackendLog) {
    let log = BackendLog::default();
    let responses = Arc::new(responses);

    let handler = {
        let log = log.clone();
        move |uri: Uri, headers: HeaderMap, body: Bytes| {
            let log = log.clone();
            let responses = responses.clone();
            async move {
                let call = log.record(&uri, &headers, &body) as usize;
                let (status, payload) = &responses[call.min(responses.len() - 1)];
                (
                    StatusCode::from_u16(*status).unwrap(),
                    [(header::CONTENT_TYPE, "application/json")],
                    payload.clone(),
                )
            }
        }
    };

    let app = Router::new()
        .route("/", any(handler.clone()))
        .route("/{*path}", any(handler));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, log)
}

/// An address with nothing listening on it.
#[allow(dead_code)]
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config with one route per (service, backend) pair and defaults
/// everywhere else.
pub fn proxy_config(routes: &[(&str, SocketAddr)]) -> BffConfig {
    let mut config = BffConfig::default();
    for (service, addr) in routes {
        config.routes.push(RouteConfig {
            service: service.to_string(),
            base_url: format!("http://{}", addr),
        });
    }
    config
}

/// Spawn the proxy on an ephemeral port. Returns its base URL and the
/// shutdown coordinator; trigger it at the end of the test.
pub async fn spawn_proxy(config: BffConfig) -> (String, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    (format!("http://{}", addr), shutdown)
}

/// Non-pooled client so each test request opens a fresh connection.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
