use axum::{extract::State, Json};
use serde::Serialize;

use super::AdminState;
use crate::cache::CacheStats;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub routes: usize,
    pub cached_entries: usize,
}

#[derive(Serialize)]
pub struct RouteStatus {
    pub service: String,
    pub base_url: String,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        routes: state.forwarder.routes().len(),
        cached_entries: state.cache.len(),
    })
}

pub async fn get_routes(State(state): State<AdminState>) -> Json<Vec<RouteStatus>> {
    // Sorted so output is stable across calls.
    let mut routes: Vec<RouteStatus> = state
        .forwarder
        .routes()
        .iter()
        .map(|route| RouteStatus {
            service: route.service.clone(),
            base_url: route.base_url.clone(),
        })
        .collect();
    routes.sort_by(|a, b| a.service.cmp(&b.service));
    Json(routes)
}

pub async fn get_cache(State(state): State<AdminState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}
