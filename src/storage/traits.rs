//! Storage trait definitions

use crate::exchange::GraphDocument;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for exchange document storage backends
pub trait DocumentStore {
    /// Write a document, replacing whatever the store held before
    fn write_document(&self, document: &GraphDocument) -> StorageResult<()>;

    /// Read the stored document
    fn read_document(&self) -> StorageResult<GraphDocument>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: DocumentStore + Sized {
    /// Open a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;
}
