//! Configuration module for Formscout
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so a run without a file uses
//! the stock crawl limits and output layout.
//!
//! # Example
//!
//! ```no_run
//! use formscout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("formscout.toml")).unwrap();
//! println!("Results go to {}", config.output.results_dir.display());
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, CrawlerConfig, OutputConfig, RendererConfig, RendererKind, UserAgentConfig,
    DEFAULT_USER_AGENT,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, load_or_default};
