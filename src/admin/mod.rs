//! Operator surface.
//!
//! Served on its own listener so a configured service can never shadow
//! it through the proxy wildcard. Every route sits behind bearer-token
//! auth; responses are read-only views over the route table and cache.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::cache::ResponseCache;
use crate::forward::Forwarder;

use self::auth::admin_auth_middleware;
use self::handlers::{get_cache, get_routes, get_status};

/// State shared by the admin handlers and the auth layer.
#[derive(Clone)]
pub struct AdminState {
    pub forwarder: Arc<Forwarder>,
    pub cache: ResponseCache,
    pub api_key: String,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/routes", get(get_routes))
        .route("/admin/cache", get(get_cache))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ))
        .with_state(state)
}
