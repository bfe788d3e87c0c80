//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check route base URLs are absolute http(s) URLs
//! - Validate value ranges (TTLs, timeouts, body limits)
//! - Detect duplicate or reserved service names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BffConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use url::Url;

use crate::config::schema::BffConfig;

/// Path reserved by the front door; a route under this name would be
/// shadowed and never reachable.
const RESERVED_SERVICES: &[&str] = &["health"];

/// Methods a cache rule may name. `http::Method` accepts arbitrary
/// extension tokens, so membership is checked against this set instead.
fn is_known_method(method: &str) -> bool {
    matches!(
        method.to_uppercase().as_str(),
        "GET" | "HEAD" | "POST" | "PUT" | "DELETE" | "PATCH" | "OPTIONS"
    )
}

/// A single semantic problem found in the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("route {service:?}: invalid base URL {base_url:?}: {reason}")]
    InvalidBaseUrl {
        service: String,
        base_url: String,
        reason: String,
    },

    #[error("route service name {0:?} is not a valid path segment")]
    InvalidServiceName(String),

    #[error("duplicate route for service {0:?}")]
    DuplicateService(String),

    #[error("route service name {0:?} is reserved by the proxy")]
    ReservedService(String),

    #[error("cache rule {pattern:?}: ttl_secs must be positive")]
    ZeroTtl { pattern: String },

    #[error("cache rule pattern {0:?} must start with '/'")]
    BadPattern(String),

    #[error("cache rule {pattern:?}: unknown HTTP method {method:?}")]
    UnknownMethod { pattern: String, method: String },

    #[error("timeouts.{field} must be positive")]
    ZeroTimeout { field: &'static str },

    #[error("limits.max_body_bytes must be positive")]
    ZeroBodyLimit,
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &BffConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for route in &config.routes {
        if route.service.is_empty() || route.service.contains('/') {
            errors.push(ValidationError::InvalidServiceName(route.service.clone()));
        }
        if RESERVED_SERVICES.contains(&route.service.as_str()) {
            errors.push(ValidationError::ReservedService(route.service.clone()));
        }
        if !seen.insert(route.service.clone()) {
            errors.push(ValidationError::DuplicateService(route.service.clone()));
        }

        match Url::parse(&route.base_url) {
            Ok(url) => {
                if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
                    errors.push(ValidationError::InvalidBaseUrl {
                        service: route.service.clone(),
                        base_url: route.base_url.clone(),
                        reason: "expected an absolute http(s) URL".to_string(),
                    });
                }
            }
            Err(e) => {
                errors.push(ValidationError::InvalidBaseUrl {
                    service: route.service.clone(),
                    base_url: route.base_url.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    for rule in &config.cache.rules {
        if rule.ttl_secs == 0 {
            errors.push(ValidationError::ZeroTtl {
                pattern: rule.pattern.clone(),
            });
        }
        if !rule.pattern.starts_with('/') {
            errors.push(ValidationError::BadPattern(rule.pattern.clone()));
        }
        if let Some(methods) = &rule.methods {
            for m in methods {
                if !is_known_method(m) {
                    errors.push(ValidationError::UnknownMethod {
                        pattern: rule.pattern.clone(),
                        method: m.clone(),
                    });
                }
            }
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "connect_secs",
        });
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "upstream_secs",
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "request_secs",
        });
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
