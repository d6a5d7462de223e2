//! Statistics over persisted scan progress and result shards
//!
//! This module provides functionality for extracting and displaying
//! progress from what earlier runs left on disk.

use super::result_store::{shard_file_name, ResultStore};
use crate::config::OutputConfig;
use crate::forms::FormRecord;
use crate::state::ScanStateStore;
use crate::storage::{Storage, StorageResult};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;

/// One result shard on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSummary {
    pub file_name: String,
    pub index: u32,
    pub bytes: u64,

    /// Number of form records, or `None` if the shard does not parse
    pub records: Option<usize>,
}

/// Progress summary
#[derive(Debug, Clone)]
pub struct ScanStatistics {
    pub state_path: PathBuf,

    /// Domains attempted in the current cycle
    pub scanned: usize,

    pub last_update: Option<DateTime<Utc>>,

    pub results_dir: PathBuf,

    /// Shards in index order
    pub shards: Vec<ShardSummary>,
}

impl ScanStatistics {
    /// Total form records across all readable shards
    pub fn total_records(&self) -> usize {
        self.shards.iter().filter_map(|s| s.records).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.shards.iter().map(|s| s.bytes).sum()
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to read
/// * `output` - Where the state document and shards live
///
/// # Returns
///
/// * `Ok(ScanStatistics)` - Scan progress and one summary per shard
/// * `Err(StorageError)` - The results directory or a shard could not be read
pub fn load_statistics(
    storage: Arc<dyn Storage>,
    output: &OutputConfig,
) -> StorageResult<ScanStatistics> {
    let state = ScanStateStore::new(storage.clone(), output.state_path.clone()).load();
    let results = ResultStore::new(
        storage.clone(),
        output.results_dir.clone(),
        output.shard_max_bytes,
    );

    let mut shards = Vec::new();
    for index in results.shard_indices()? {
        let file_name = shard_file_name(index);
        let path = output.results_dir.join(&file_name);
        let bytes = storage.file_size(&path)?;
        let records = storage
            .read(&path)
            .ok()
            .and_then(|content| serde_json::from_slice::<Vec<FormRecord>>(&content).ok())
            .map(|records| records.len());

        shards.push(ShardSummary {
            file_name,
            index,
            bytes,
            records,
        });
    }

    Ok(ScanStatistics {
        state_path: output.state_path.clone(),
        scanned: state.scanned.len(),
        last_update: state.last_update,
        results_dir: output.results_dir.clone(),
        shards,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &ScanStatistics) {
    println!("=== Scan Statistics ===\n");

    println!("Scan state ({}):", stats.state_path.display());
    println!("  Domains scanned this cycle: {}", stats.scanned);
    match stats.last_update {
        Some(ts) => println!("  Last update: {}", ts.to_rfc3339()),
        None => println!("  Last update: never"),
    }
    println!();

    println!("Result shards ({}):", stats.results_dir.display());
    if stats.shards.is_empty() {
        println!("  (none)");
    }
    for shard in &stats.shards {
        let records = shard
            .records
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unreadable".to_string());
        println!(
            "  {}: {:.2} MiB, {} records",
            shard.file_name,
            shard.bytes as f64 / (1024.0 * 1024.0),
            records
        );
    }
    println!();

    println!(
        "Total: {} form records in {} shard(s)",
        stats.total_records(),
        stats.shards.len()
    );
}
