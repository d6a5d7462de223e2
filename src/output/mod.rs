//! Output module for persisting harvested forms
//!
//! This module handles:
//! - Appending form records to size-capped, rotating JSON shards
//! - Summarising scan progress and shard contents

mod result_store;
pub mod stats;

pub use result_store::{
    parse_shard_index, shard_file_name, AppendOutcome, ResultStore, ShardTarget,
};
pub use stats::{load_statistics, print_statistics, ScanStatistics, ShardSummary};
