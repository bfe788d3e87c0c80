//! Cacheability rules.
//!
//! A request is cacheable when its method is GET-like, some rule matches
//! the target URL path, and the rule's method set (when present) contains
//! the method. Everything else bypasses the cache entirely, so a stale
//! entry left under a key by an earlier rule set can never be served to a
//! route that is no longer enrolled.

use std::time::Duration;

use axum::http::Method;

use crate::config::CacheRuleConfig;

/// A compiled cache rule.
#[derive(Debug, Clone)]
pub struct CacheRule {
    /// Path to match; for prefix rules, the normalized prefix (with the
    /// trailing '*' removed, keeping the '/').
    pattern: String,

    /// True when the configured pattern ended in "/*".
    prefix: bool,

    ttl: Duration,

    /// Allowed methods; `None` means no restriction at the rule level.
    methods: Option<Vec<Method>>,
}

impl CacheRule {
    fn from_config(config: &CacheRuleConfig) -> Self {
        let (pattern, prefix) = match config.pattern.strip_suffix("/*") {
            Some(stem) => (format!("{}/", stem), true),
            None => (config.pattern.clone(), false),
        };
        let methods = config.methods.as_ref().map(|methods| {
            methods
                .iter()
                .filter_map(|m| Method::from_bytes(m.to_uppercase().as_bytes()).ok())
                .collect()
        });
        Self {
            pattern,
            prefix,
            ttl: Duration::from_secs(config.ttl_secs),
            methods,
        }
    }

    /// Whether this rule enrolls the given target path and method.
    fn matches(&self, path: &str, method: &Method) -> bool {
        let path_matches = if self.prefix {
            path.starts_with(&self.pattern)
        } else {
            path == self.pattern
        };
        if !path_matches {
            return false;
        }
        match &self.methods {
            Some(methods) => methods.contains(method),
            None => true,
        }
    }

    /// Time-to-live for responses cached under this rule.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// The set of routes enrolled for response caching.
#[derive(Debug, Clone, Default)]
pub struct CachePolicy {
    rules: Vec<CacheRule>,
}

impl CachePolicy {
    /// Compile the policy from validated configuration.
    pub fn from_config(rules: &[CacheRuleConfig]) -> Self {
        Self {
            rules: rules.iter().map(CacheRule::from_config).collect(),
        }
    }

    /// First matching rule wins, in configuration order.
    pub fn rule_for(&self, path: &str, method: &Method) -> Option<&CacheRule> {
        if !is_cacheable_method(method) {
            return None;
        }
        self.rules.iter().find(|rule| rule.matches(path, method))
    }
}

/// GET-like methods are the only ones that ever consult the cache.
fn is_cacheable_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD)
}
