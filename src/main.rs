//! Backend-for-frontend proxy.
//!
//! An edge service that fronts a fleet of JSON microservices for
//! frontend clients: the first path segment picks the backend, headers
//! are rewritten for the outbound hop, and configured GET targets are
//! answered from a TTL cache.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────────┐
//!                        │                     BFF PROXY                     │
//!                        │                                                   │
//!     Client Request     │  ┌─────────┐    ┌─────────┐    ┌──────────────┐   │
//!     ───────────────────┼─▶│  http   │───▶│ routing │───▶│   forward    │   │
//!                        │  │ server  │    │  table  │    │   engine     │   │
//!                        │  └─────────┘    └─────────┘    └──────┬───────┘   │
//!                        │                                       │           │
//!                        │                            miss ▼ hit │ put       │
//!                        │                               ┌──────────────┐    │
//!                        │                               │   response   │    │
//!                        │                               │ cache + TTL  │    │
//!                        │                               └──────────────┘    │
//!                        │                                       │           │
//!     Client Response    │  ┌─────────┐    ┌─────────┐    ┌──────▼───────┐   │
//!     ◀──────────────────┼──│ relay / │◀───│ header  │◀───│   bounded    │◀──┼── Backend
//!                        │  │ reject  │    │sanitize │    │   dispatch   │   │    Service
//!                        │  └─────────┘    └─────────┘    └──────────────┘   │
//!                        │                                                   │
//!                        │  ┌─────────────────────────────────────────────┐  │
//!                        │  │            Cross-Cutting Concerns           │  │
//!                        │  │  ┌────────┐ ┌─────────────┐ ┌────────────┐  │  │
//!                        │  │  │ config │ │observability│ │ lifecycle  │  │  │
//!                        │  │  │        │ │   + admin   │ │ shutdown   │  │  │
//!                        │  │  └────────┘ └─────────────┘ └────────────┘  │  │
//!                        │  └─────────────────────────────────────────────┘  │
//!                        └───────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bff_proxy::config::load_config;
use bff_proxy::lifecycle::{signals, Shutdown};
use bff_proxy::HttpServer;

/// Edge proxy for frontend clients.
#[derive(Parser)]
#[command(name = "bff-proxy", version, about)]
struct Args {
    /// Path to the TOML configuration file. Without it, built-in
    /// defaults plus BFF_ROUTE_* environment routes apply.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "bff_proxy={},tower_http=debug",
                    config.observability.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("bff-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        cache_rules = config.cache.rules.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            bff_proxy::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    tokio::spawn(signals::watch_signals(shutdown));

    let server = HttpServer::new(config);
    server.run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
