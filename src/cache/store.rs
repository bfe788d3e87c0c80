//! TTL-keyed response store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

use crate::observability::metrics;

/// A cached upstream payload with its absolute expiry.
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    expires_at: Instant,
}

/// Counters exposed through the admin API.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// A thread-safe TTL cache for decoded upstream responses, keyed by the
/// fully-resolved target URL.
///
/// Entries are replaced whole on insert: concurrent readers observe either
/// the previous entry or the new one, never a partial write. Two racing
/// fills for the same key resolve last-writer-wins, which is acceptable
/// because staleness is bounded by the TTL anyway. Expired entries are
/// dropped lazily on read and eagerly by [`CacheSweeper`]; within a TTL
/// window the store is unbounded in distinct keys.
///
/// [`CacheSweeper`]: crate::cache::sweeper::CacheSweeper
#[derive(Clone, Default)]
pub struct ResponseCache {
    inner: Arc<DashMap<String, CacheEntry>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl ResponseCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a fresh entry. Returns `None` when the key is absent or the
    /// entry has expired; an expired entry found here is removed.
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(entry) = self.inner.get(key) {
            if entry.expires_at > Instant::now() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                metrics::record_cache_hit();
                return Some(entry.payload.clone());
            }
        }
        // Re-checks expiry under the shard lock so a racing `put` for the
        // same key is not clobbered.
        self.inner
            .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        self.misses.fetch_add(1, Ordering::Relaxed);
        metrics::record_cache_miss();
        None
    }

    /// Insert or overwrite the entry for `key` with a fresh expiry.
    pub fn put(&self, key: &str, payload: Value, ttl: Duration) {
        self.inner.insert(
            key.to_string(),
            CacheEntry {
                payload,
                expires_at: Instant::now() + ttl,
            },
        );
        metrics::record_cache_entries(self.inner.len());
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let before = self.inner.len();
        let now = Instant::now();
        self.inner.retain(|_, entry| entry.expires_at > now);
        let after = self.inner.len();
        metrics::record_cache_entries(after);
        before.saturating_sub(after)
    }

    /// Number of entries currently stored, expired or not.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Snapshot of the counters for the admin API.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.inner.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
