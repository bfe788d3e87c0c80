//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, health probe)
//!     → request.rs (attach request ID)
//!     → [forward engine resolves and dispatches]
//!     → server.rs (relay or uniform rejection)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
