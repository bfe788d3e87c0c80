//! Request forwarding.
//!
//! Data flow:
//! 1. `engine` resolves the service segment against the route table
//! 2. cacheable targets are answered from `crate::cache` when fresh
//! 3. `headers` rewrites the caller's headers for the outbound hop
//! 4. `engine` dispatches with a pooled client under a deadline
//! 5. the upstream answer is decoded, cached when a rule matched, and
//!    relayed; failures surface as `ProxyError` and render uniformly

pub mod engine;
pub mod error;
pub mod headers;

pub use engine::Forwarder;
pub use error::{ProxyError, REJECTED_MESSAGE};
