//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request path
//!     → table.rs (split_service_path: first segment = service name)
//!     → table.rs (RouteTable lookup: service → base URL)
//!     → Return: matched Route or NotFound
//!
//! Route Compilation (at startup):
//!     RouteConfig[] + BFF_ROUTE_* environment
//!     → Normalize base URLs (trim trailing '/')
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime (no hot reload)
//! - Resolution is a pure function of the first path segment
//! - O(1) lookup via HashMap; no regex, no prefix scan
//! - Explicit NotFound rather than silent default

pub mod table;

pub use table::{split_service_path, Route, RouteTable};
