//! Per-consumer chapter loader
//!
//! Each [`ChapterLoader`] owns its own [`LoadState`] but shares the registry
//! and the [`ModuleCache`] with every other loader in the session. Requests
//! are numbered; a load only writes its outcome into the state if no newer
//! request has been made on the same loader since, so a slow response can
//! never replace the chapter the reader navigated to afterwards.

use crate::cache::{LoadResult, ModuleCache};
use crate::error::LoadError;
use crate::registry::ContentRegistry;
use crate::state::{LoadSnapshot, LoadState};
use crate::types::{ChapterContent, ChapterId};
use futures::FutureExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct ChapterLoader {
    registry: Arc<ContentRegistry>,
    cache: ModuleCache,
    state: LoadState,
    latest_request: AtomicU64,
}

impl ChapterLoader {
    pub fn new(registry: Arc<ContentRegistry>, cache: ModuleCache) -> Self {
        Self {
            registry,
            cache,
            state: LoadState::new(),
            latest_request: AtomicU64::new(0),
        }
    }

    /// Observable state for this consumer
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    /// Load a chapter and publish the outcome to [`state`](Self::state).
    ///
    /// Every failure is converted into the state's `error` message; the
    /// returned `Result` is the same outcome for callers that do not observe
    /// the state.
    ///
    /// A cache hit is published as the current request: `loading` goes false
    /// and any error left by an earlier request is cleared.
    pub async fn load(&self, section_id: &str, chapter_id: &str) -> LoadResult {
        let id = ChapterId::new(section_id, chapter_id);
        let key = id.cache_key();
        let request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(content) = self.cache.get(&key).await {
            tracing::debug!(key = %key, request, "served from cache");
            self.publish(request, |s| {
                s.content = Some(content.clone());
                s.loading = false;
                s.error = None;
            });
            return Ok(content);
        }

        self.publish(request, |s| {
            s.loading = true;
            s.error = None;
        });

        let result = self.fetch(&id, &key).await;

        let current = self.publish(request, |s| {
            match &result {
                Ok(content) => s.content = Some(content.clone()),
                Err(e) => s.error = Some(e.to_string()),
            }
            s.loading = false;
        });
        if !current {
            tracing::debug!(key = %key, request, "discarding stale load result");
        }

        result
    }

    async fn fetch(&self, id: &ChapterId, key: &str) -> LoadResult {
        fetch_cached(&self.registry, &self.cache, id, key).await
    }

    /// Write to the state only if `request` is still the newest request
    fn publish<F>(&self, request: u64, f: F) -> bool
    where
        F: FnOnce(&mut LoadSnapshot),
    {
        self.state.update(|snapshot| {
            if self.latest_request.load(Ordering::SeqCst) != request {
                return false;
            }
            f(snapshot);
            true
        })
    }

    /// Convenience for callers that only want the current content
    pub fn current(&self) -> Option<Arc<ChapterContent>> {
        self.state.content()
    }
}

/// Resolve an identifier through the registry and run (or join) its cached load
pub(crate) async fn fetch_cached(
    registry: &ContentRegistry,
    cache: &ModuleCache,
    id: &ChapterId,
    key: &str,
) -> LoadResult {
    let group_key = registry.resolve_group_key(id.section())?;
    let source = registry.resolve_loader(group_key, id.chapter())?;

    let failure_key = key.to_string();
    cache
        .get_or_load(key, move || {
            async move {
                source
                    .load()
                    .await
                    .map_err(|e| LoadError::load_failure(e.to_string(), &failure_key))
            }
            .boxed()
        })
        .await
}
