//! Response caching subsystem.
//!
//! # Data Flow
//! ```text
//! Cacheable GET (policy.rs says so)
//!     → store.rs get(target URL)
//!     → hit: serve cached payload, skip the backend entirely
//!     → miss: forward, then store.rs put(target URL, payload, rule TTL)
//!
//! Background:
//!     sweeper.rs ticks every cache.sweep_interval_secs
//!     → store.rs sweep() drops expired entries
//! ```
//!
//! # Design Decisions
//! - Keyed by the exact forwarded target URL (query string as sent;
//!   query-parameter order is not normalized, so two orderings of the
//!   same parameters cache independently)
//! - Entries replaced whole, never merged; last writer wins on races
//! - Only successfully decoded 2xx payloads are ever stored
//! - Expiry is lazy on read plus a periodic sweep for memory bounding

pub mod policy;
pub mod store;
pub mod sweeper;

pub use policy::{CachePolicy, CacheRule};
pub use store::{CacheStats, ResponseCache};
pub use sweeper::CacheSweeper;
