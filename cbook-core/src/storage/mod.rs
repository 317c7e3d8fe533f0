//! Key-value storage abstraction backing content, progress and preferences

use crate::error::StorageError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Component, Path, PathBuf};
use tokio::sync::RwLock;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Abstract storage provider trait
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Read data from the given path
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Write data to the given path
    async fn write(&self, path: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Delete data at the given path
    async fn delete(&self, path: &str) -> StorageResult<()>;

    /// List entry names directly under the given directory
    async fn list(&self, dir: &str) -> StorageResult<Vec<String>>;

    /// Check if a path exists
    async fn exists(&self, path: &str) -> StorageResult<bool>;
}

/// Read and deserialize a JSON document, returning `None` when it is absent
pub async fn read_json<T: DeserializeOwned>(
    storage: &dyn StorageProvider,
    path: &str,
) -> StorageResult<Option<T>> {
    if !storage.exists(path).await? {
        return Ok(None);
    }
    let data = storage.read(path).await?;
    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Serialize a value as pretty JSON and write it
pub async fn write_json<T: Serialize + ?Sized>(
    storage: &dyn StorageProvider,
    path: &str,
    value: &T,
) -> StorageResult<()> {
    let data =
        serde_json::to_vec_pretty(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    storage.write(path, data).await
}

/// Local filesystem storage provider
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create a new local storage provider with the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Safely resolve a path, preventing path traversal attacks
    fn full_path(&self, path: &str) -> StorageResult<PathBuf> {
        let mut normalized = PathBuf::new();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(c) => normalized.push(c),
                Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                    return Err(StorageError::BackendError(
                        "Path traversal attempt detected".to_string(),
                    ));
                }
            }
        }

        Ok(self.root.join(normalized))
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(path)?;
        tokio::fs::read(full_path)
            .await
            .map_err(|e| StorageError::NotFound(format!("{}: {}", path, e)))
    }

    async fn write(&self, path: &str, data: Vec<u8>) -> StorageResult<()> {
        let full_path = self.full_path(path)?;
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::BackendError(e.to_string()))?;
        }

        // Write next to the target then rename, so readers never see a partial file
        let temp_path = full_path.with_extension("tmp");
        tokio::fs::write(&temp_path, data)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        tokio::fs::rename(&temp_path, &full_path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let full_path = self.full_path(path)?;
        tokio::fs::remove_file(full_path)
            .await
            .map_err(|e| StorageError::NotFound(format!("{}: {}", path, e)))
    }

    async fn list(&self, dir: &str) -> StorageResult<Vec<String>> {
        let full_path = self.full_path(dir)?;
        let mut entries = Vec::new();
        let mut read_dir = tokio::fs::read_dir(&full_path)
            .await
            .map_err(|e| StorageError::NotFound(format!("{}: {}", dir, e)))?;

        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?
        {
            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let full_path = self.full_path(path)?;
        tokio::fs::try_exists(full_path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }
}

/// In-memory storage provider (for testing)
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.data
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn write(&self, path: &str, data: Vec<u8>) -> StorageResult<()> {
        self.data.write().await.insert(path.to_string(), data);
        Ok(())
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        self.data
            .write()
            .await
            .remove(path)
            .ok_or_else(|| StorageError::NotFound(path.to_string()))?;
        Ok(())
    }

    async fn list(&self, dir: &str) -> StorageResult<Vec<String>> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir.trim_end_matches('/'))
        };

        let names: BTreeSet<String> = self
            .data
            .read()
            .await
            .keys()
            .filter_map(|k| k.strip_prefix(prefix.as_str()))
            .filter_map(|rest| rest.split('/').next())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if names.is_empty() && !dir.is_empty() {
            return Err(StorageError::NotFound(dir.to_string()));
        }
        Ok(names.into_iter().collect())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.data.read().await.contains_key(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();

        storage.write("test.txt", b"hello".to_vec()).await.unwrap();

        let data = storage.read("test.txt").await.unwrap();
        assert_eq!(data, b"hello");

        assert!(storage.exists("test.txt").await.unwrap());
        assert!(!storage.exists("missing.txt").await.unwrap());

        storage.delete("test.txt").await.unwrap();
        assert!(!storage.exists("test.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_list_direct_children() {
        let storage = MemoryStorage::new();
        storage.write("projects/shell.json", vec![]).await.unwrap();
        storage.write("projects/http.json", vec![]).await.unwrap();
        storage.write("core-language/loops.json", vec![]).await.unwrap();

        assert_eq!(
            storage.list("projects").await.unwrap(),
            vec!["http.json", "shell.json"]
        );
        assert_eq!(
            storage.list("").await.unwrap(),
            vec!["core-language", "projects"]
        );
        assert!(storage.list("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_local_storage_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        assert!(storage.read("../etc/passwd").await.is_err());
        assert!(storage.write("/abs.json", vec![]).await.is_err());
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        let missing: Option<Vec<u32>> = read_json(&storage, "nested/list.json").await.unwrap();
        assert!(missing.is_none());

        write_json(&storage, "nested/list.json", &vec![1u32, 2, 3])
            .await
            .unwrap();
        let loaded: Option<Vec<u32>> = read_json(&storage, "nested/list.json").await.unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
        assert_eq!(storage.list("nested").await.unwrap(), vec!["list.json"]);
    }
}
