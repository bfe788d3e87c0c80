//! Backend-for-frontend proxy library.

pub mod admin;
pub mod cache;
pub mod config;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::BffConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
