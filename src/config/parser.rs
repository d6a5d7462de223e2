use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Keys missing from the file take their default values.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use formscout::config::load_config;
///
/// let config = load_config(Path::new("formscout.toml")).unwrap();
/// println!("Pages per domain: {}", config.crawler.max_pages_per_domain);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at start-up so a run's output can be tied to the configuration
/// that produced it.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Loads the configuration at `path`, or validated defaults when no path is given
///
/// # Arguments
///
/// * `path` - Optional path to the TOML configuration file
///
/// # Returns
///
/// * `Ok((Config, Some(hash)))` - Configuration loaded from the file
/// * `Ok((Config, None))` - Built-in defaults
/// * `Err(ConfigError)` - The file could not be loaded or failed validation
pub fn load_or_default(path: Option<&Path>) -> ConfigResult<(Config, Option<String>)> {
    match path {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)?;
            Ok((config, Some(hash)))
        }
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok((config, None))
        }
    }
}
