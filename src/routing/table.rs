//! Route table: service name → backend base URL.
//!
//! # Responsibilities
//! - Store the routes loaded at startup
//! - Resolve the first path segment of an inbound request to a backend
//! - Split a request path into service name and forwarded remainder
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Base URLs stored without a trailing '/' so target URLs are formed
//!   by plain concatenation with the forwarded remainder

use std::collections::HashMap;

use crate::config::RouteConfig;

/// A single resolved backend route.
#[derive(Debug, Clone)]
pub struct Route {
    /// Service name, as it appears in the first path segment.
    pub service: String,

    /// Normalized base URL (no trailing '/').
    pub base_url: String,
}

/// Immutable lookup table from service name to backend route.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<String, Route>,
}

impl RouteTable {
    /// Build the table from validated configuration.
    pub fn from_config(configs: &[RouteConfig]) -> Self {
        let mut routes = HashMap::new();
        for config in configs {
            let base_url = config.base_url.trim_end_matches('/').to_string();
            routes.insert(
                config.service.clone(),
                Route {
                    service: config.service.clone(),
                    base_url,
                },
            );
        }
        Self { routes }
    }

    /// Pure lookup. `None` when the service has no configured backend;
    /// the caller maps that to the generic upstream-unavailable response.
    pub fn resolve(&self, service: &str) -> Option<&Route> {
        self.routes.get(service)
    }

    /// Number of configured routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no routes are configured.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate over all routes (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }
}

/// Split an inbound path into `(service, rest)`.
///
/// `/cart/items/1` → `("cart", "/items/1")`, `/cart` → `("cart", "")`.
/// Returns `None` for the bare root and for paths with an empty first
/// segment, which the engine treats identically to an unknown service.
pub fn split_service_path(path: &str) -> Option<(&str, &str)> {
    let trimmed = path.strip_prefix('/')?;
    if trimmed.is_empty() {
        return None;
    }
    let (service, rest) = match trimmed.find('/') {
        Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
        None => (trimmed, ""),
    };
    if service.is_empty() {
        return None;
    }
    Some((service, rest))
}
