//! State module for tracking scan progress across runs
//!
//! - `ScanState`: which domains have been attempted, and when progress last changed
//! - `ScanStateStore`: loads and saves that record, tolerating missing or corrupt files

mod scan_state;

pub use scan_state::{ScanState, ScanStateStore};
