//! Content registry: resolves identifiers to lazily-loadable chapter sources
//!
//! Resolution is a two-step lookup. A public section id resolves to its
//! grouping key, then the grouping key plus chapter slug resolves to a
//! [`ChapterSource`]. Nothing is loaded until the source is invoked.

mod builtin;
mod source;

pub use source::{ChapterSource, EmbeddedSource, FnSource, StorageSource};

use crate::error::{LoadError, StorageError};
use crate::storage::StorageProvider;
use crate::types::{ChapterId, SectionId};
use std::collections::HashMap;
use std::sync::Arc;

/// Static table of every chapter the book knows about
#[derive(Default)]
pub struct ContentRegistry {
    groups: HashMap<&'static str, Vec<(String, Arc<dyn ChapterSource>)>>,
}

impl ContentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the chapters compiled into this crate
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        builtin::register_bundled(&mut registry);
        registry
    }

    /// Discover chapters laid out as `<group-key>/<chapter>.json` in storage.
    ///
    /// Sections without a directory are skipped. Chapters are ordered by file name.
    pub async fn from_storage(storage: Arc<dyn StorageProvider>) -> Result<Self, StorageError> {
        let mut registry = Self::new();

        for section in SectionId::ALL {
            let group_key = section.group_key();
            let names = match storage.list(group_key).await {
                Ok(names) => names,
                Err(StorageError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            };

            for name in names {
                let Some(chapter) = name.strip_suffix(".json") else {
                    continue;
                };
                let path = format!("{}/{}", group_key, name);
                tracing::debug!(section = %section, chapter, path = %path, "discovered chapter");
                let source = StorageSource::new(storage.clone(), path, chapter);
                registry.register(section, chapter, Arc::new(source));
            }
        }

        Ok(registry)
    }

    /// Register a chapter source, replacing any previous source for the same slug
    pub fn register(
        &mut self,
        section: SectionId,
        chapter: impl Into<String>,
        source: Arc<dyn ChapterSource>,
    ) {
        let chapter = chapter.into();
        let entries = self.groups.entry(section.group_key()).or_default();
        match entries.iter_mut().find(|(slug, _)| *slug == chapter) {
            Some(entry) => entry.1 = source,
            None => entries.push((chapter, source)),
        }
    }

    /// Builder-style variant of [`register`](Self::register)
    pub fn with_chapter(
        mut self,
        section: SectionId,
        chapter: impl Into<String>,
        source: Arc<dyn ChapterSource>,
    ) -> Self {
        self.register(section, chapter, source);
        self
    }

    /// Map a public section id to its grouping key
    pub fn resolve_group_key(&self, section_id: &str) -> Result<&'static str, LoadError> {
        section_id.parse::<SectionId>().map(|s| s.group_key())
    }

    /// Find the source for a chapter within a group
    pub fn resolve_loader(
        &self,
        group_key: &str,
        chapter_id: &str,
    ) -> Result<Arc<dyn ChapterSource>, LoadError> {
        self.groups
            .get(group_key)
            .and_then(|entries| entries.iter().find(|(slug, _)| slug == chapter_id))
            .map(|(_, source)| source.clone())
            .ok_or_else(|| LoadError::ChapterNotFound(chapter_id.to_string()))
    }

    /// Sections that have at least one chapter, in book order
    pub fn sections(&self) -> Vec<SectionId> {
        SectionId::ALL
            .into_iter()
            .filter(|s| {
                self.groups
                    .get(s.group_key())
                    .is_some_and(|entries| !entries.is_empty())
            })
            .collect()
    }

    /// Chapter slugs of a section, in registration order
    pub fn chapters(&self, section: SectionId) -> Vec<&str> {
        self.groups
            .get(section.group_key())
            .map(|entries| entries.iter().map(|(slug, _)| slug.as_str()).collect())
            .unwrap_or_default()
    }

    /// Every registered chapter, in book order
    pub fn chapter_ids(&self) -> Vec<ChapterId> {
        self.sections()
            .into_iter()
            .flat_map(|section| {
                self.chapters(section)
                    .into_iter()
                    .map(move |chapter| ChapterId::new(section.as_str(), chapter))
            })
            .collect()
    }

    /// Total number of registered chapters
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_resolve_group_key() {
        let registry = ContentRegistry::new();
        assert_eq!(registry.resolve_group_key("language").unwrap(), "core-language");
        assert_eq!(
            registry.resolve_group_key("bogus").unwrap_err(),
            LoadError::SectionNotFound("bogus".into())
        );
    }

    #[test]
    fn test_resolve_loader() {
        let registry = ContentRegistry::builtin();
        assert!(registry.resolve_loader("core-language", "loops").is_ok());

        // Public section ids are not grouping keys
        assert!(registry.resolve_loader("language", "loops").is_err());

        let err = registry
            .resolve_loader("core-language", "missing")
            .err()
            .unwrap();
        assert_eq!(err, LoadError::ChapterNotFound("missing".into()));
    }

    #[tokio::test]
    async fn test_builtin_chapters_parse() {
        let registry = ContentRegistry::builtin();
        assert_eq!(registry.sections(), SectionId::ALL.to_vec());

        for id in registry.chapter_ids() {
            let group = registry.resolve_group_key(id.section()).unwrap();
            let source = registry.resolve_loader(group, id.chapter()).unwrap();
            let content = source.load().await.unwrap();
            assert_eq!(content.id, id.chapter());
            assert!(!content.title.is_empty());
        }
    }

    #[test]
    fn test_register_replaces() {
        let source = || -> Arc<dyn ChapterSource> {
            Arc::new(EmbeddedSource::new("x", r#"{"id":"x","title":"X"}"#))
        };
        let registry = ContentRegistry::new()
            .with_chapter(SectionId::Projects, "x", source())
            .with_chapter(SectionId::Projects, "x", source());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.sections(), vec![SectionId::Projects]);
        assert!(registry.chapters(SectionId::Language).is_empty());
    }

    #[tokio::test]
    async fn test_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .write(
                "projects/shell.json",
                br#"{"id":"shell","title":"Shell"}"#.to_vec(),
            )
            .await
            .unwrap();
        storage
            .write("projects/README.md", b"notes".to_vec())
            .await
            .unwrap();

        let registry = ContentRegistry::from_storage(storage).await.unwrap();
        assert_eq!(registry.chapters(SectionId::Projects), vec!["shell"]);
        assert_eq!(registry.len(), 1);

        let source = registry.resolve_loader("projects", "shell").unwrap();
        assert_eq!(source.load().await.unwrap().title, "Shell");
    }
}
