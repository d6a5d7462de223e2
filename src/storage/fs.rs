//! Local filesystem storage backend

use crate::storage::traits::{Storage, StorageError, StorageResult};
use std::path::Path;

/// Storage backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for FsStorage {
    fn create_dir_all(&self, path: &Path) -> StorageResult<()> {
        std::fs::create_dir_all(path).map_err(|e| StorageError::from_io(path, e))
    }

    fn read(&self, path: &Path) -> StorageResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| StorageError::from_io(path, e))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> StorageResult<()> {
        std::fs::write(path, contents).map_err(|e| StorageError::from_io(path, e))
    }

    fn list_dir(&self, path: &Path) -> StorageResult<Vec<String>> {
        let entries = std::fs::read_dir(path).map_err(|e| StorageError::from_io(path, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::from_io(path, e))?;
            let is_file = entry
                .file_type()
                .map(|t| t.is_file())
                .unwrap_or(false);
            if is_file {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn file_size(&self, path: &Path) -> StorageResult<u64> {
        std::fs::metadata(path)
            .map(|m| m.len())
            .map_err(|e| StorageError::from_io(path, e))
    }
}
