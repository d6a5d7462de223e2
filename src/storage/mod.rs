//! Storage module for persisting run data
//!
//! The stores in `state` and `output` only need a handful of filesystem
//! operations (create directory, read, whole-file write, list, size). They are
//! expressed by the [`Storage`] trait so the same logic runs against the real
//! filesystem or an in-memory backend.

mod fs;
mod memory;
mod traits;

pub use fs::FsStorage;
pub use memory::MemoryStorage;
pub use traits::{Storage, StorageError, StorageResult};

use std::sync::Arc;

/// Opens the default filesystem storage as a shared handle
pub fn open_storage() -> Arc<dyn Storage> {
    Arc::new(FsStorage::new())
}
