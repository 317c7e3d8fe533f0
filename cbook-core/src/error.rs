//! Error types for cbook core

use thiserror::Error;

/// Result type alias using CbookError
pub type Result<T> = std::result::Result<T, CbookError>;

/// Top-level error type for all cbook operations
#[derive(Debug, Error)]
pub enum CbookError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid preference: {0}")]
    Preference(String),
}

/// Errors surfaced by the chapter loader.
///
/// The display strings are what the UI renders in place of content, so they
/// are part of the contract.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("Section '{0}' not found")]
    SectionNotFound(String),

    #[error("Chapter '{0}' not found")]
    ChapterNotFound(String),

    #[error("{0}")]
    LoadFailure(String),
}

impl LoadError {
    /// Wrap a source failure, falling back to a generic message when the
    /// failure carries no text of its own.
    pub fn load_failure(message: impl Into<String>, key: &str) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            LoadError::LoadFailure(format!("Failed to load chapter '{}'", key))
        } else {
            LoadError::LoadFailure(message)
        }
    }
}

/// Errors that occur while producing chapter content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Invalid chapter JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Chapter id mismatch: expected '{expected}', found '{found}'")]
    IdMismatch { expected: String, found: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Other(String),
}

/// Errors that occur during storage operations
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
