//! Storage backends for exchange documents
//!
//! Documents are read and written through the `DocumentStore` trait. The
//! primary implementation is `JsonFileStore`, one document per file.

mod json_file;
mod traits;

pub use json_file::JsonFileStore;
pub use traits::{DocumentStore, OpenStore, StorageError, StorageResult};
