//! Storage abstraction trait
//!
//! This module defines the OutputStore trait used by the generation pipeline and the
//! delivery endpoints.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid filename: {0}")]
    InvalidKey(String),

    #[error("Could not find a free filename after {0} attempts")]
    NameCollision(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Write-once store for generated images.
#[async_trait]
pub trait OutputStore: Send + Sync {
    /// Store PNG bytes under a freshly generated name and return that name.
    ///
    /// Existing files are never overwritten.
    async fn store(&self, data: Vec<u8>) -> StorageResult<String>;

    /// Read a stored artifact by filename
    async fn load(&self, filename: &str) -> StorageResult<Vec<u8>>;
}
