//! Formscout: a resumable HTML form harvester
//!
//! This crate discovers domains from public bug-bounty scope lists, walks each
//! domain's same-site link graph within fixed limits, extracts the structure of
//! every HTML form it renders, and persists both the forms and per-domain scan
//! progress so repeated runs keep moving forward.

pub mod config;
pub mod crawler;
pub mod feed;
pub mod forms;
pub mod output;
pub mod renderer;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Formscout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Renderer error: {0}")]
    Render(#[from] renderer::RenderError),

    #[error("Feed error for {url}: {source}")]
    Feed { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Formscout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, RunReport};
pub use forms::{FieldRecord, FormRecord};
pub use state::ScanState;
