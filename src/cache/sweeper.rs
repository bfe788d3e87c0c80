//! Background expiry sweeper for the response cache.
//!
//! Lazy expiry alone only removes an entry when its key is read again; a
//! key that stops being requested would pin its payload forever. The
//! sweeper bounds that by dropping expired entries on a fixed interval.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::cache::store::ResponseCache;

/// Periodic task that removes expired entries from a [`ResponseCache`].
pub struct CacheSweeper {
    cache: ResponseCache,
    interval: Duration,
}

impl CacheSweeper {
    pub fn new(cache: ResponseCache, interval: Duration) -> Self {
        Self { cache, interval }
    }

    /// Run until the shutdown signal fires. A zero interval disables the
    /// sweeper entirely (lazy expiry still applies).
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if self.interval.is_zero() {
            tracing::info!("Cache sweeper disabled");
            return;
        }

        tracing::info!(interval_secs = self.interval.as_secs(), "Cache sweeper starting");

        let mut ticker = time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.cache.sweep();
                    if removed > 0 {
                        tracing::debug!(removed, remaining = self.cache.len(), "Swept expired cache entries");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Cache sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
