//! In-memory storage backend
//!
//! Mirrors the filesystem semantics the stores rely on: writes need an
//! existing parent directory, reads of missing files are `NotFound`.

use crate::storage::traits::{Storage, StorageError, StorageResult};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

/// Storage held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means another thread panicked mid-test; the
        // maps themselves are always consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the paths of every stored file
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.lock().files.keys().cloned().collect()
    }

    fn has_dir(inner: &Inner, path: &Path) -> bool {
        path.as_os_str().is_empty() || inner.dirs.contains(path)
    }
}

impl Storage for MemoryStorage {
    fn create_dir_all(&self, path: &Path) -> StorageResult<()> {
        let mut inner = self.lock();
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                inner.dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn read(&self, path: &Path) -> StorageResult<Vec<u8>> {
        self.lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> StorageResult<()> {
        let mut inner = self.lock();
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        if !Self::has_dir(&inner, parent) {
            return Err(StorageError::NotFound(parent.to_path_buf()));
        }
        inner.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> StorageResult<Vec<String>> {
        let inner = self.lock();
        if !Self::has_dir(&inner, path) {
            return Err(StorageError::NotFound(path.to_path_buf()));
        }

        Ok(inner
            .files
            .keys()
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect())
    }

    fn file_size(&self, path: &Path) -> StorageResult<u64> {
        self.lock()
            .files
            .get(path)
            .map(|c| c.len() as u64)
            .ok_or_else(|| StorageError::NotFound(path.to_path_buf()))
    }
}
