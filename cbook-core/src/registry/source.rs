//! Lazily-loadable chapter sources

use crate::error::ContentError;
use crate::storage::StorageProvider;
use crate::types::ChapterContent;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// A single-shot producer of one chapter's content.
///
/// Sources are cheap to hold; nothing is parsed or read until `load` is called.
#[async_trait]
pub trait ChapterSource: Send + Sync {
    /// Produce the chapter content
    async fn load(&self) -> Result<ChapterContent, ContentError>;
}

/// Check that a parsed chapter is the one it was registered as
fn ensure_id(content: ChapterContent, expected: &str) -> Result<ChapterContent, ContentError> {
    if content.id == expected {
        Ok(content)
    } else {
        Err(ContentError::IdMismatch {
            expected: expected.to_string(),
            found: content.id,
        })
    }
}

/// Chapter JSON compiled into the binary
pub struct EmbeddedSource {
    chapter_id: &'static str,
    json: &'static str,
}

impl EmbeddedSource {
    pub fn new(chapter_id: &'static str, json: &'static str) -> Self {
        Self { chapter_id, json }
    }
}

#[async_trait]
impl ChapterSource for EmbeddedSource {
    async fn load(&self) -> Result<ChapterContent, ContentError> {
        let content = ChapterContent::from_json(self.json)?;
        ensure_id(content, self.chapter_id)
    }
}

/// Chapter JSON read through a storage provider
pub struct StorageSource {
    storage: Arc<dyn StorageProvider>,
    path: String,
    chapter_id: String,
}

impl StorageSource {
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        path: impl Into<String>,
        chapter_id: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            path: path.into(),
            chapter_id: chapter_id.into(),
        }
    }
}

#[async_trait]
impl ChapterSource for StorageSource {
    async fn load(&self) -> Result<ChapterContent, ContentError> {
        let data = self.storage.read(&self.path).await?;
        let content: ChapterContent = serde_json::from_slice(&data)?;
        ensure_id(content, &self.chapter_id)
    }
}

/// Chapter produced by an async closure
pub struct FnSource<F> {
    f: F,
}

impl<F, Fut> FnSource<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ChapterContent, ContentError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> ChapterSource for FnSource<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ChapterContent, ContentError>> + Send + 'static,
{
    async fn load(&self) -> Result<ChapterContent, ContentError> {
        (self.f)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_embedded_source_checks_id() {
        let source = EmbeddedSource::new("loops", r#"{"id": "loops", "title": "Loops"}"#);
        assert_eq!(source.load().await.unwrap().title, "Loops");

        let source = EmbeddedSource::new("loops", r#"{"id": "arrays", "title": "Arrays"}"#);
        assert!(matches!(
            source.load().await,
            Err(ContentError::IdMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_embedded_source_bad_json() {
        let source = EmbeddedSource::new("loops", "{ not json");
        assert!(matches!(
            source.load().await,
            Err(ContentError::InvalidJson(_))
        ));
    }

    #[tokio::test]
    async fn test_storage_source() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .write(
                "projects/shell.json",
                br#"{"id": "shell", "title": "A Tiny Shell"}"#.to_vec(),
            )
            .await
            .unwrap();

        let source = StorageSource::new(storage.clone(), "projects/shell.json", "shell");
        assert_eq!(source.load().await.unwrap().title, "A Tiny Shell");

        let missing = StorageSource::new(storage, "projects/http.json", "http");
        assert!(matches!(missing.load().await, Err(ContentError::Storage(_))));
    }

    #[tokio::test]
    async fn test_fn_source() {
        let source = FnSource::new(|| async { Ok(ChapterContent::new("x", "X")) });
        assert_eq!(source.load().await.unwrap().id, "x");
    }
}
