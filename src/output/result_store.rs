//! Rotating JSON result shards
//!
//! Forms are persisted to `forms.json`, `forms_1.json`, `forms_2.json`, ...
//! under the results directory. Only the highest-indexed shard is ever
//! appended to; once it reaches the size ceiling the next append opens a new
//! shard one index higher.

use crate::forms::FormRecord;
use crate::storage::{Storage, StorageError, StorageResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SHARD_STEM: &str = "forms";
const SHARD_EXT: &str = ".json";

/// File name of the shard at `index`; index 0 is the unindexed `forms.json`
pub fn shard_file_name(index: u32) -> String {
    if index == 0 {
        format!("{}{}", SHARD_STEM, SHARD_EXT)
    } else {
        format!("{}_{}{}", SHARD_STEM, index, SHARD_EXT)
    }
}

/// Parses a shard file name back to its index
///
/// `forms.json` is index 0. `forms_0.json` is not a valid shard name.
pub fn parse_shard_index(file_name: &str) -> Option<u32> {
    let stem = file_name.strip_suffix(SHARD_EXT)?;
    if stem == SHARD_STEM {
        return Some(0);
    }

    let digits = stem.strip_prefix(SHARD_STEM)?.strip_prefix('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(index) => Some(index),
    }
}

/// Where the next append goes and what it must preserve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardTarget {
    pub path: PathBuf,
    pub index: u32,
    pub existing: Vec<FormRecord>,
}

/// Result of one append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    pub path: PathBuf,
    pub index: u32,
    /// Records added by this append
    pub appended: usize,
    /// Records in the shard after the append
    pub total: usize,
}

/// Appends form records to the rotating shard series
pub struct ResultStore {
    storage: Arc<dyn Storage>,
    dir: PathBuf,
    max_bytes: u64,
}

impl ResultStore {
    pub fn new(storage: Arc<dyn Storage>, dir: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            storage,
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Indices of every shard present in the results directory, ascending
    pub fn shard_indices(&self) -> StorageResult<Vec<u32>> {
        let names = match self.storage.list_dir(&self.dir) {
            Ok(names) => names,
            Err(StorageError::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut indices: Vec<u32> = names.iter().filter_map(|n| parse_shard_index(n)).collect();
        indices.sort_unstable();
        Ok(indices)
    }

    /// Picks the shard the next append writes to
    ///
    /// The highest-indexed shard is reused while it is below the size ceiling
    /// and holds a valid record array. Otherwise a new shard one index higher
    /// is targeted with no existing records.
    pub fn select_writable_shard(&self) -> StorageResult<ShardTarget> {
        let Some(&current) = self.shard_indices()?.last() else {
            return Ok(self.new_shard(0));
        };

        let path = self.dir.join(shard_file_name(current));
        let size = self.storage.file_size(&path)?;
        if size >= self.max_bytes {
            tracing::info!(
                "Shard {} is full ({} bytes), rotating",
                path.display(),
                size
            );
            return Ok(self.new_shard(current + 1));
        }

        let content = self.storage.read(&path)?;
        match serde_json::from_slice::<Vec<FormRecord>>(&content) {
            Ok(existing) => Ok(ShardTarget {
                path,
                index: current,
                existing,
            }),
            Err(e) => {
                tracing::warn!(
                    "Shard {} does not hold a form array ({}), leaving it untouched",
                    path.display(),
                    e
                );
                Ok(self.new_shard(current + 1))
            }
        }
    }

    fn new_shard(&self, index: u32) -> ShardTarget {
        ShardTarget {
            path: self.dir.join(shard_file_name(index)),
            index,
            existing: Vec::new(),
        }
    }

    /// Appends `records` after the target shard's existing records
    ///
    /// The whole shard is rewritten. Appending nothing writes nothing.
    pub fn append(&self, records: &[FormRecord]) -> StorageResult<AppendOutcome> {
        let ShardTarget {
            path,
            index,
            mut existing,
        } = self.select_writable_shard()?;

        if records.is_empty() {
            return Ok(AppendOutcome {
                path,
                index,
                appended: 0,
                total: existing.len(),
            });
        }

        existing.extend_from_slice(records);
        let json = serde_json::to_string_pretty(&existing)?;
        self.storage.write(&path, json.as_bytes())?;

        tracing::debug!(
            "Wrote {} record(s) to {} ({} total)",
            records.len(),
            path.display(),
            existing.len()
        );

        Ok(AppendOutcome {
            path,
            index,
            appended: records.len(),
            total: existing.len(),
        })
    }
}
