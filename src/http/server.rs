//! HTTP front door.
//!
//! # Responsibilities
//! - Build the Axum router: health probe plus the catch-all proxy route
//! - Wire middleware (tracing, request timeout, request ID)
//! - Spawn the cache sweeper and the optional admin listener
//! - Translate forwarding rejections into the uniform caller-facing reply
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::{self, AdminState};
use crate::cache::{CacheSweeper, ResponseCache};
use crate::config::BffConfig;
use crate::forward::{Forwarder, REJECTED_MESSAGE};
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    pub cache: ResponseCache,
}

/// HTTP server for the BFF proxy.
pub struct HttpServer {
    router: Router,
    config: BffConfig,
    forwarder: Arc<Forwarder>,
    cache: ResponseCache,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: BffConfig) -> Self {
        let cache = ResponseCache::default();
        let forwarder = Arc::new(Forwarder::new(&config, cache.clone()));

        let state = AppState {
            forwarder: forwarder.clone(),
            cache: cache.clone(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            forwarder,
            cache,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// `/health` answers locally on any method; everything else funnels
    /// into the proxy handler. Exact routes win over the wildcard, which
    /// is why `health` is a reserved service name in validation.
    fn build_router(config: &BffConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", any(health_handler))
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.forwarder.routes().len(),
            "HTTP server starting"
        );

        if !self.config.cache.rules.is_empty() {
            let sweeper = CacheSweeper::new(
                self.cache.clone(),
                Duration::from_secs(self.config.cache.sweep_interval_secs),
            );
            tokio::spawn(sweeper.run(shutdown.resubscribe()));
        }

        if self.config.admin.enabled {
            self.spawn_admin(shutdown.resubscribe());
        }

        let app = self.router.into_make_service();
        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BffConfig {
        &self.config
    }

    /// Start the admin surface on its own listener. A failure here
    /// degrades the admin surface only; proxying continues.
    fn spawn_admin(&self, mut shutdown: broadcast::Receiver<()>) {
        let admin_addr: SocketAddr = match self.config.admin.bind_address.parse() {
            Ok(addr) => addr,
            Err(_) => {
                tracing::error!(
                    bind_address = %self.config.admin.bind_address,
                    "Failed to parse admin bind address"
                );
                return;
            }
        };

        let state = AdminState {
            forwarder: self.forwarder.clone(),
            cache: self.cache.clone(),
            api_key: self.config.admin.api_key.clone(),
        };
        let router = admin::setup_admin_router(state);

        tokio::spawn(async move {
            let listener = match TcpListener::bind(admin_addr).await {
                Ok(listener) => listener,
                Err(e) => {
                    tracing::error!(address = %admin_addr, error = %e, "Failed to bind admin listener");
                    return;
                }
            };
            tracing::info!(address = %admin_addr, "Admin server starting");

            let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            });
            if let Err(e) = serve.await {
                tracing::error!(error = %e, "Admin server error");
            }
        });
    }
}

/// Liveness probe, answered without touching any backend.
async fn health_handler() -> &'static str {
    "OK"
}

/// Main proxy handler: hand the request to the forwarding engine and map
/// rejections to the uniform 502 reply. Backend detail stays in the logs.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let path = request.uri().path().to_string();
    let method = request.method().to_string();
    let service = state
        .forwarder
        .resolved_service(&path)
        .unwrap_or("none")
        .to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Proxying request"
    );

    match state.forwarder.forward(request).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), &service, start_time);
            response.into_response()
        }
        Err(error) => {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %error,
                "Rejecting request"
            );
            let status = error.status();
            metrics::record_request(&method, status.as_u16(), &service, start_time);
            (status, Json(json!({ "error": REJECTED_MESSAGE }))).into_response()
        }
    }
}

/// Resolve once the shutdown broadcast fires (or the sender is dropped).
async fn wait_for_shutdown(mut shutdown: broadcast::Receiver<()>) {
    let _ = shutdown.recv().await;
    tracing::info!("Shutdown signal received");
}
