//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the BFF
//! proxy. All types derive Serde traits for deserialization from config
//! files; every section has defaults so a minimal config is valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the BFF proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BffConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend service routes (service name → base URL).
    pub routes: Vec<RouteConfig>,

    /// Response cache settings and rules.
    pub cache: CacheConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// A single backend service route.
///
/// The service name is matched against the first path segment of inbound
/// requests; the remainder of the path is forwarded to the base URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Service name, unique within the route table (e.g., "cart").
    pub service: String,

    /// Absolute base URL of the backend (e.g., "http://cart.internal:3000").
    pub base_url: String,
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Interval between background sweeps of expired entries, in seconds.
    /// Zero disables the sweeper; expired entries are then only dropped
    /// lazily on read.
    pub sweep_interval_secs: u64,

    /// Routes enrolled for response caching.
    pub rules: Vec<CacheRuleConfig>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 60,
            rules: Vec::new(),
        }
    }
}

/// A single cache rule enrolling a path pattern for response caching.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheRuleConfig {
    /// Target URL path to match. Exact match, or prefix match when the
    /// pattern ends in "/*" (e.g., "/products", "/products/*").
    pub pattern: String,

    /// Time-to-live for cached responses, in seconds. Must be positive.
    pub ttl_secs: u64,

    /// HTTP methods the rule applies to (e.g., ["GET"]). Absent means no
    /// method restriction at the rule level.
    #[serde(default)]
    pub methods: Option<Vec<String>>,
}

/// Timeout configuration for inbound and outbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout for outbound calls, in seconds.
    pub connect_secs: u64,

    /// Total timeout for a single outbound call (send + response read),
    /// in seconds.
    pub upstream_secs: u64,

    /// Total time budget for an inbound request, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 10,
            request_secs: 30,
        }
    }
}

/// Request and response size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum body size buffered in either direction, in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin API listener.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}
