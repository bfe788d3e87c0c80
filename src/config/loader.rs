//! Configuration loading from disk and environment.
//!
//! Routes can be provisioned entirely through the environment: the
//! reference deployment hands each backend base URL to the process as
//! `BFF_ROUTE_<SERVICE>`. Environment routes overlay the config file and
//! win on conflict. Neither source is watched; changing a route requires
//! a restart.

use std::fs;
use std::path::Path;

use crate::config::schema::{BffConfig, RouteConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Prefix for route environment variables. `BFF_ROUTE_CART=http://...`
/// adds or replaces the route for service "cart" (suffix lowercased).
pub const ROUTE_ENV_PREFIX: &str = "BFF_ROUTE_";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load the effective configuration: the TOML file when a path is given
/// (defaults otherwise), overlaid with environment routes, then validated.
pub fn load_config(path: Option<&Path>) -> Result<BffConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => BffConfig::default(),
    };

    overlay_routes(&mut config, std::env::vars());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `BFF_ROUTE_*` entries from `vars` onto the route table.
fn overlay_routes(config: &mut BffConfig, vars: impl Iterator<Item = (String, String)>) {
    for (key, value) in vars {
        let Some(suffix) = key.strip_prefix(ROUTE_ENV_PREFIX) else {
            continue;
        };
        if suffix.is_empty() || value.is_empty() {
            continue;
        }
        let service = suffix.to_lowercase();

        match config.routes.iter_mut().find(|r| r.service == service) {
            Some(route) => route.base_url = value,
            None => config.routes.push(RouteConfig {
                service,
                base_url: value,
            }),
        }
    }
}
