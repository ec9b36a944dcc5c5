// src/storage/cache.rs
//! Single-entry time-boxed cache for sweep results.

use std::convert::Infallible;
use std::future::Future;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

/// Holds at most one value, replaced wholesale on refresh.
///
/// `T` is expected to be cheap to clone (the browser stores an `Arc`), since
/// every hit hands out a clone. Misses are serialized through `refresh`, so
/// callers that arrive while a refresh is running wait for it and reuse its
/// result instead of starting their own.
pub struct ResultCache<T> {
    entry: RwLock<Option<CacheEntry<T>>>,
    refresh: Mutex<()>,
    ttl: Duration,
}

impl<T: Clone> ResultCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            refresh: Mutex::new(()),
            ttl,
        }
    }

    /// Current value, if present and not expired.
    pub fn get(&self) -> Option<T> {
        let entry = self.entry.read();
        entry
            .as_ref()
            .filter(|e| Instant::now() < e.expires_at)
            .map(|e| e.value.clone())
    }

    pub fn insert(&self, value: T) {
        let expires_at = Instant::now() + self.ttl;
        *self.entry.write() = Some(CacheEntry { value, expires_at });
    }

    pub fn invalidate(&self) {
        *self.entry.write() = None;
    }

    pub async fn get_or_refresh<F, Fut>(&self, producer: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let result = self
            .try_get_or_refresh(|| async move { Ok::<T, Infallible>(producer().await) })
            .await;
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like `get_or_refresh`, but a failed refresh is returned to the caller
    /// and leaves the cache untouched.
    pub async fn try_get_or_refresh<F, Fut, E>(&self, producer: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get() {
            return Ok(value);
        }

        let _guard = self.refresh.lock().await;
        if let Some(value) = self.get() {
            return Ok(value);
        }

        let value = producer().await?;
        self.insert(value.clone());
        Ok(value)
    }
}

impl<T: Clone> Default for ResultCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn producer_runs_once_within_ttl() {
        let cache = ResultCache::new(Duration::from_secs(60));
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        for _ in 0..2 {
            let value = cache
                .get_or_refresh(move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    vec![1, 2, 3]
                })
                .await;
            assert_eq!(value, vec![1, 2, 3]);
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn producer_runs_again_after_expiry() {
        let cache = ResultCache::new(Duration::from_secs(60));
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let produce = move || async move { calls.fetch_add(1, Ordering::SeqCst) + 1 };

        assert_eq!(cache.get_or_refresh(produce).await, 1);
        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get_or_refresh(produce).await, 1);
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get_or_refresh(produce).await, 2);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_is_not_cached() {
        let cache: ResultCache<u32> = ResultCache::new(Duration::from_secs(60));

        let err = cache
            .try_get_or_refresh(|| async { Err::<u32, &str>("directory down") })
            .await;
        assert_eq!(err, Err("directory down"));
        assert!(cache.get().is_none());

        let ok = cache.try_get_or_refresh(|| async { Ok::<u32, &str>(7) }).await;
        assert_eq!(ok, Ok(7));
        assert_eq!(cache.get(), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_share_one_refresh() {
        let cache = Arc::new(ResultCache::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_refresh(|| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(500)).await;
                        Arc::new(vec!["servers"])
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(*handle.await.unwrap(), vec!["servers"]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_refresh() {
        let cache = ResultCache::new(Duration::from_secs(60));
        cache.insert(1);
        assert_eq!(cache.get(), Some(1));

        cache.invalidate();
        assert_eq!(cache.get(), None);
        assert_eq!(cache.get_or_refresh(|| async { 2 }).await, 2);
    }
}
