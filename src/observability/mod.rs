//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: request_id, service, target)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout via tracing-subscriber, RUST_LOG aware)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log events for one request
//! - Metrics are cheap (atomic increments)
//! - Outbound failures are logged with full detail here and *only* here;
//!   external callers get the generic error body

pub mod metrics;
