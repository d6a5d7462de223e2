use crate::storage::{Storage, StorageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Durable record of which domains have been attempted across runs
///
/// `scanned` keeps first-attempt order and never holds duplicates. It only
/// grows, except on [`ScanState::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanState {
    pub scanned: Vec<String>,

    #[serde(rename = "lastUpdate")]
    pub last_update: Option<DateTime<Utc>>,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the domain was already attempted
    pub fn is_scanned(&self, domain: &str) -> bool {
        self.scanned.iter().any(|d| d == domain)
    }

    /// Records an attempt at `domain` and refreshes the timestamp
    pub fn mark_scanned(&mut self, domain: &str, now: DateTime<Utc>) {
        if !self.is_scanned(domain) {
            self.scanned.push(domain.to_string());
        }
        self.last_update = Some(now);
    }

    /// Clears all progress so the whole universe becomes eligible again
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.scanned.clear();
        self.last_update = Some(now);
    }

    /// Returns the domains of `universe` not yet scanned, in universe order
    pub fn unscanned<'a>(&self, universe: &'a [String]) -> Vec<&'a str> {
        let scanned: HashSet<&str> = self.scanned.iter().map(String::as_str).collect();
        universe
            .iter()
            .map(String::as_str)
            .filter(|d| !scanned.contains(d))
            .collect()
    }
}

/// Loads and saves the [`ScanState`] document at a fixed path
pub struct ScanStateStore {
    storage: Arc<dyn Storage>,
    path: PathBuf,
}

impl ScanStateStore {
    pub fn new(storage: Arc<dyn Storage>, path: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted state
    ///
    /// A missing, unreadable, or malformed document yields an empty state;
    /// this never fails.
    pub fn load(&self) -> ScanState {
        let content = match self.storage.read_to_string(&self.path) {
            Ok(content) => content,
            Err(StorageError::NotFound(_)) => {
                tracing::debug!("No scan state at {}, starting fresh", self.path.display());
                return ScanState::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read scan state, starting fresh: {}", e);
                return ScanState::new();
            }
        };

        match serde_json::from_str::<ScanState>(&content) {
            Ok(mut state) => {
                let mut seen = HashSet::new();
                state.scanned.retain(|d| seen.insert(d.clone()));
                state
            }
            Err(e) => {
                tracing::warn!(
                    "Malformed scan state at {}, starting fresh: {}",
                    self.path.display(),
                    e
                );
                ScanState::new()
            }
        }
    }

    /// Overwrites the persisted state with a pretty-printed document
    pub fn save(&self, state: &ScanState) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(state)?;
        self.storage.write(&self.path, json.as_bytes())
    }
}
