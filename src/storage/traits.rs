//! Storage traits and error types
//!
//! This module defines the narrow filesystem capability the stores are built
//! on, and the associated error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Wraps an I/O error with the path it occurred on, keeping `NotFound` distinct
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Writes are whole-file overwrites. Implementations must be usable from a
/// shared reference; the crawl itself is sequential, so no cross-call
/// atomicity is promised.
pub trait Storage: Send + Sync {
    /// Creates a directory and all of its missing parents
    fn create_dir_all(&self, path: &Path) -> StorageResult<()>;

    /// Reads a whole file
    fn read(&self, path: &Path) -> StorageResult<Vec<u8>>;

    /// Replaces a file's contents, creating it if needed
    fn write(&self, path: &Path, contents: &[u8]) -> StorageResult<()>;

    /// Lists the file names (not paths) directly inside a directory
    fn list_dir(&self, path: &Path) -> StorageResult<Vec<String>>;

    /// Returns the size of a file in bytes
    fn file_size(&self, path: &Path) -> StorageResult<u64>;

    /// Reads a whole file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> StorageResult<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| StorageError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })
    }
}
