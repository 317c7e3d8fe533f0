//! Application wiring

use anyhow::{Context, Result};
use cbook_core::storage::{LocalStorage, StorageProvider};
use cbook_core::{ChapterContent, ChapterLoader, ContentRegistry, ModuleCache};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a command needs for one session
pub struct App {
    pub registry: Arc<ContentRegistry>,
    pub cache: ModuleCache,
    pub loader: ChapterLoader,
    /// Storage for progress and preferences
    pub data: Arc<dyn StorageProvider>,
}

impl App {
    pub async fn new(content_dir: Option<&str>) -> Result<Self> {
        // CBOOK_DATA_PATH holds progress and preferences
        let data_path =
            std::env::var("CBOOK_DATA_PATH").unwrap_or_else(|_| "./cbook_data".to_string());
        let data_path = PathBuf::from(data_path);
        tokio::fs::create_dir_all(&data_path)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_path.display()))?;

        let content_dir = content_dir
            .map(str::to_string)
            .or_else(|| std::env::var("CBOOK_CONTENT_PATH").ok());

        let registry = match content_dir {
            Some(dir) => {
                tracing::debug!("Reading chapters from {}", dir);
                let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorage::new(&dir));
                ContentRegistry::from_storage(storage)
                    .await
                    .with_context(|| format!("Failed to read content directory {}", dir))?
            }
            None => ContentRegistry::builtin(),
        };
        let registry = Arc::new(registry);
        let cache = ModuleCache::new();

        Ok(Self {
            loader: ChapterLoader::new(registry.clone(), cache.clone()),
            registry,
            cache,
            data: Arc::new(LocalStorage::new(data_path)),
        })
    }

    /// Load a chapter through the loader, reporting the loader's error message
    pub async fn load(&self, section: &str, chapter: &str) -> Result<Arc<ChapterContent>> {
        match self.loader.load(section, chapter).await {
            Ok(content) => Ok(content),
            Err(e) => {
                let message = self.loader.state().error().unwrap_or_else(|| e.to_string());
                anyhow::bail!("{}", message)
            }
        }
    }
}
