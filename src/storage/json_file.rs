//! Single-file JSON storage

use super::traits::{DocumentStore, OpenStore, StorageResult};
use crate::exchange::GraphDocument;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Stores one exchange document as a JSON file
///
/// Writing creates the file or truncates an existing one. The writer is
/// flushed before `write_document` returns, and the file handle is closed
/// on every exit path when it goes out of scope.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileStore {
    /// Indent the written JSON
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OpenStore for JsonFileStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            pretty: true,
        })
    }
}

impl DocumentStore for JsonFileStore {
    fn write_document(&self, document: &GraphDocument) -> StorageResult<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, document)?;
        } else {
            serde_json::to_writer(&mut writer, document)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn read_document(&self) -> StorageResult<GraphDocument> {
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
