//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define proxy metrics (requests, latency, cache effectiveness)
//! - Expose Prometheus-compatible metrics endpoint
//! - Track per-service and aggregate metrics
//!
//! # Metrics
//! - `bff_requests_total` (counter): requests by method, status, service
//! - `bff_request_duration_seconds` (histogram): latency by service
//! - `bff_cache_hits_total` / `bff_cache_misses_total` (counters)
//! - `bff_cache_entries` (gauge): current entry count, expired included
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - "service" label is the resolved route name, or "none" when
//!   resolution failed, so unroutable traffic stays visible

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram,
};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and register metric descriptions.
/// Failure is logged, not fatal: the proxy serves traffic without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!(
                "bff_requests_total",
                "Total proxied requests by method, status and service"
            );
            describe_histogram!(
                "bff_request_duration_seconds",
                "End-to-end request latency by service"
            );
            describe_counter!("bff_cache_hits_total", "Response cache hits");
            describe_counter!("bff_cache_misses_total", "Response cache misses");
            describe_gauge!("bff_cache_entries", "Entries currently in the response cache");
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Record one completed inbound request.
pub fn record_request(method: &str, status: u16, service: &str, start: Instant) {
    counter!(
        "bff_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "service" => service.to_string(),
    )
    .increment(1);
    histogram!(
        "bff_request_duration_seconds",
        "service" => service.to_string(),
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_cache_hit() {
    counter!("bff_cache_hits_total").increment(1);
}

pub fn record_cache_miss() {
    counter!("bff_cache_misses_total").increment(1);
}

pub fn record_cache_entries(entries: usize) {
    gauge!("bff_cache_entries").set(entries as f64);
}
