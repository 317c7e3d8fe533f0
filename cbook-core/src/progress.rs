//! Reading progress, persisted as JSON in a key-value store

use crate::error::Result;
use crate::storage::{read_json, write_json, StorageProvider};
use crate::types::{ChapterId, SectionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Storage key of the progress document
pub const PROGRESS_KEY: &str = "progress.json";

/// Progress on a single chapter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChapterProgress {
    pub last_read: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ChapterProgress {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Progress across the whole book, keyed by `{section}/{chapter}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReadingProgress {
    pub chapters: BTreeMap<String, ChapterProgress>,
}

/// Progress document bound to the storage it persists to
pub struct ProgressStore {
    storage: Arc<dyn StorageProvider>,
    progress: ReadingProgress,
}

impl ProgressStore {
    /// Load saved progress; a missing or unreadable document starts fresh
    pub async fn load(storage: Arc<dyn StorageProvider>) -> Self {
        let progress = match read_json::<ReadingProgress>(storage.as_ref(), PROGRESS_KEY).await {
            Ok(Some(progress)) => progress,
            Ok(None) => ReadingProgress::default(),
            Err(e) => {
                tracing::warn!("Failed to load reading progress, starting fresh: {}", e);
                ReadingProgress::default()
            }
        };
        Self { storage, progress }
    }

    pub fn progress(&self) -> &ReadingProgress {
        &self.progress
    }

    pub fn get(&self, id: &ChapterId) -> Option<&ChapterProgress> {
        self.progress.chapters.get(&id.cache_key())
    }

    pub fn is_completed(&self, id: &ChapterId) -> bool {
        self.get(id).is_some_and(ChapterProgress::is_completed)
    }

    /// Record that a chapter was opened
    pub async fn mark_read(&mut self, id: &ChapterId) -> Result<()> {
        let now = Utc::now();
        self.progress
            .chapters
            .entry(id.cache_key())
            .and_modify(|p| p.last_read = now)
            .or_insert(ChapterProgress {
                last_read: now,
                completed_at: None,
            });
        self.save().await
    }

    /// Record that a chapter was finished. Completing twice keeps the first time.
    pub async fn mark_completed(&mut self, id: &ChapterId) -> Result<()> {
        let now = Utc::now();
        let entry = self
            .progress
            .chapters
            .entry(id.cache_key())
            .or_insert(ChapterProgress {
                last_read: now,
                completed_at: None,
            });
        entry.last_read = now;
        entry.completed_at.get_or_insert(now);
        self.save().await
    }

    /// Forget all progress
    pub async fn reset(&mut self) -> Result<()> {
        self.progress = ReadingProgress::default();
        self.save().await
    }

    /// Most recently opened chapter key
    pub fn last_read(&self) -> Option<&str> {
        self.progress
            .chapters
            .iter()
            .max_by_key(|(_, p)| p.last_read)
            .map(|(key, _)| key.as_str())
    }

    /// Completed chapters of `section` among `chapters`, as `(completed, total)`
    pub fn section_completion(&self, section: SectionId, chapters: &[&str]) -> (usize, usize) {
        let completed = chapters
            .iter()
            .filter(|chapter| self.is_completed(&ChapterId::new(section.as_str(), **chapter)))
            .count();
        (completed, chapters.len())
    }

    async fn save(&self) -> Result<()> {
        Ok(write_json(self.storage.as_ref(), PROGRESS_KEY, &self.progress).await?)
    }
}
