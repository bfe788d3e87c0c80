//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (overlay BFF_ROUTE_* environment routes)
//!     → validation.rs (semantic checks)
//!     → BffConfig (validated, immutable)
//!     → consumed by server construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; routes are data, not control flow
//! - No hot reload: adding or removing a route requires a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ROUTE_ENV_PREFIX};
pub use schema::{
    AdminConfig, BffConfig, CacheConfig, CacheRuleConfig, LimitsConfig, ListenerConfig,
    ObservabilityConfig, RouteConfig, TimeoutConfig,
};
