//! Forwarding error taxonomy.
//!
//! Every variant here is a REJECTED outcome: the proxy could not obtain
//! an authoritative answer from a backend. An upstream non-2xx status is
//! *not* represented here; the backend was reachable and its status is
//! relayed as-is by the engine.
//!
//! External callers always receive the same generic 502 body regardless
//! of variant; the variant detail exists for internal logs only.

use axum::http::StatusCode;
use thiserror::Error;

/// Body message for every REJECTED response.
pub const REJECTED_MESSAGE: &str = "Cannot process request";

/// Why a forward attempt was rejected.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Unknown or missing service segment; no backend detail leaked.
    #[error("no route for service {service:?}")]
    RouteNotFound { service: String },

    /// The resolved target could not be parsed into a dispatchable URL.
    #[error("invalid target URL {target:?}: {reason}")]
    BadTarget { target: String, reason: String },

    /// The backend was unreachable or the exchange failed mid-flight.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The outbound call exceeded the configured deadline.
    #[error("upstream call timed out after {secs}s")]
    UpstreamTimeout { secs: u64 },

    /// The backend answered 2xx with a body that is not valid JSON, so
    /// there is no response data model to relay.
    #[error("undecodable upstream payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ProxyError {
    /// External status for this rejection. Uniform across variants so a
    /// caller cannot distinguish an unconfigured route from a dead one.
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_GATEWAY
    }
}
