//! Session-lifetime chapter cache with in-flight load sharing
//!
//! A [`ModuleCache`] is an explicit handle, cloned into whichever loaders
//! should share it. Entries are inserted once and never evicted. While a
//! load for a key is outstanding, every other request for that key joins the
//! same pending future, so the underlying source runs at most once at a time.

use crate::error::LoadError;
use crate::types::ChapterContent;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Outcome of a chapter load as seen by every caller attached to it
pub type LoadResult = Result<Arc<ChapterContent>, LoadError>;

type PendingLoad = Shared<BoxFuture<'static, LoadResult>>;

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, Arc<ChapterContent>>,
    in_flight: HashMap<String, PendingLoad>,
}

/// Shared chapter cache keyed by `{section}/{chapter}`
#[derive(Clone, Default)]
pub struct ModuleCache {
    inner: Arc<Mutex<CacheInner>>,
}

impl ModuleCache {
    /// Create an empty cache for a new session
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a completed entry
    pub async fn get(&self, key: &str) -> Option<Arc<ChapterContent>> {
        self.inner.lock().await.entries.get(key).cloned()
    }

    /// Number of completed entries
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of loads currently outstanding
    pub async fn in_flight(&self) -> usize {
        self.inner.lock().await.in_flight.len()
    }

    /// Return the cached entry for `key`, or run `start` to produce it.
    ///
    /// `start` is only called when there is neither a cached entry nor a load
    /// already in flight for `key`. Failed loads are not cached, so a later
    /// call may try again.
    pub async fn get_or_load<F>(&self, key: &str, start: F) -> LoadResult
    where
        F: FnOnce() -> BoxFuture<'static, Result<ChapterContent, LoadError>>,
    {
        let pending = {
            let mut inner = self.inner.lock().await;

            if let Some(content) = inner.entries.get(key) {
                tracing::debug!(key, "cache hit");
                return Ok(content.clone());
            }

            match inner.in_flight.get(key) {
                Some(pending) => {
                    tracing::debug!(key, "joining in-flight load");
                    pending.clone()
                }
                None => {
                    tracing::debug!(key, "cache miss, starting load");
                    let pending = self.settle(key.to_string(), start()).boxed().shared();
                    inner.in_flight.insert(key.to_string(), pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Wrap a raw load so that its completion updates the cache exactly once
    fn settle(
        &self,
        key: String,
        load: BoxFuture<'static, Result<ChapterContent, LoadError>>,
    ) -> impl std::future::Future<Output = LoadResult> + Send + 'static {
        let cache = Arc::clone(&self.inner);
        async move {
            let result = load.await;
            let mut inner = cache.lock().await;
            inner.in_flight.remove(&key);
            match result {
                Ok(content) => {
                    let entry = inner.entries.entry(key).or_insert_with(|| Arc::new(content));
                    Ok(entry.clone())
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "chapter load failed");
                    Err(e)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    fn counted(
        calls: &Arc<AtomicUsize>,
        id: &'static str,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<ChapterContent, LoadError>> {
        let calls = calls.clone();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(ChapterContent::new(id, id)) }.boxed()
        }
    }

    #[tokio::test]
    async fn test_second_call_hits_cache() {
        let cache = ModuleCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .get_or_load("language/loops", counted(&calls, "loops"))
            .await
            .unwrap();
        let second = cache
            .get_or_load("language/loops", counted(&calls, "loops"))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len().await, 1);
        assert!(cache.get("language/loops").await.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_one_load() {
        let cache = ModuleCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let (release, gate) = oneshot::channel::<()>();

        let gated = {
            let calls = calls.clone();
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    gate.await.ok();
                    Ok(ChapterContent::new("loops", "Loops"))
                }
                .boxed()
            }
        };

        let a = cache.get_or_load("language/loops", gated);
        let b = cache.get_or_load("language/loops", counted(&calls, "loops"));
        let release = async {
            tokio::task::yield_now().await;
            release.send(()).ok();
        };

        let (a, b, _) = tokio::join!(a, b, release);
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.in_flight().await, 0);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = ModuleCache::new();

        let err = cache
            .get_or_load("projects/shell", || {
                async { Err(LoadError::LoadFailure("network down".into())) }.boxed()
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "network down");
        assert!(cache.is_empty().await);
        assert_eq!(cache.in_flight().await, 0);

        let calls = Arc::new(AtomicUsize::new(0));
        let content = cache
            .get_or_load("projects/shell", counted(&calls, "shell"))
            .await
            .unwrap();
        assert_eq!(content.id, "shell");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = ModuleCache::new();
        let other = cache.clone();
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_load("practices/testing", counted(&calls, "testing"))
            .await
            .unwrap();
        other
            .get_or_load("practices/testing", counted(&calls, "testing"))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
