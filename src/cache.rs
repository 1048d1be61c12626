//! TTL cache for fetched data
//!
//! A snapshot-with-expiry wrapper around an async fetch. At most one refresh
//! is in flight at a time; concurrent readers see either the old or the new
//! snapshot, never a partial one. When a refresh fails and an expired
//! snapshot exists, the expired snapshot is served with a warning.

use crate::error::Result;
use parking_lot::RwLock;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct Snapshot<T> {
    value: T,
    fetched_at: Instant,
}

pub struct TtlCache<T: Clone> {
    ttl: Duration,
    slot: RwLock<Option<Snapshot<T>>>,
    /// Held for the duration of a refresh; deduplicates concurrent refreshes
    refresh: Mutex<()>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    fn fresh(&self) -> Option<T> {
        let slot = self.slot.read();
        slot.as_ref()
            .filter(|s| s.fetched_at.elapsed() < self.ttl)
            .map(|s| s.value.clone())
    }

    fn any(&self) -> Option<T> {
        self.slot.read().as_ref().map(|s| s.value.clone())
    }

    /// Age of the current snapshot, fresh or not
    pub fn age(&self) -> Option<Duration> {
        self.slot.read().as_ref().map(|s| s.fetched_at.elapsed())
    }

    /// Drop the snapshot so the next read forces a refresh
    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }

    /// Return the fresh snapshot, or run `fetch` to refresh it.
    ///
    /// Callers that lose the refresh race re-check the slot after acquiring
    /// the guard and return the winner's snapshot without fetching again.
    pub async fn get_or_refresh<F, Fut>(&self, fetch: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.fresh() {
            return Ok(value);
        }

        let _guard = self.refresh.lock().await;
        if let Some(value) = self.fresh() {
            return Ok(value);
        }

        match fetch().await {
            Ok(value) => {
                *self.slot.write() = Some(Snapshot {
                    value: value.clone(),
                    fetched_at: Instant::now(),
                });
                Ok(value)
            }
            Err(e) => {
                if let Some(stale) = self.any() {
                    tracing::warn!("Refresh failed, serving expired snapshot: {}", e);
                    Ok(stale)
                } else {
                    Err(e)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_caches_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let v = cache
                .get_or_refresh(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42u32)
                })
                .await
                .unwrap();
            assert_eq!(v, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refreshes_after_expiry() {
        let cache = TtlCache::new(Duration::from_millis(10));
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(1u32)
        };
        cache.get_or_refresh(fetch).await.unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        cache
            .get_or_refresh(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(2u32)
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_serves_stale_on_fetch_error() {
        let cache = TtlCache::new(Duration::from_millis(10));
        cache.get_or_refresh(|| async { Ok(7u32) }).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let v = cache
            .get_or_refresh(|| async { Err(BotError::StatsUnavailable("down".into())) })
            .await
            .unwrap();
        assert_eq!(v, 7);
    }

    #[tokio::test]
    async fn test_error_without_snapshot_propagates() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let result = cache
            .get_or_refresh(|| async { Err(BotError::StatsUnavailable("down".into())) })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        cache
            .get_or_refresh(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(1u32)
            })
            .await
            .unwrap();
        cache.invalidate();
        cache
            .get_or_refresh(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(1u32)
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_readers_single_refresh() {
        let cache = Arc::new(TtlCache::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_refresh(|| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        // Hold the refresh long enough for the others to queue
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(9u32)
                    })
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 9);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
