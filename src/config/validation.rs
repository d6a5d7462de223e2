use crate::config::types::{Config, CrawlerConfig, OutputConfig, RendererConfig, RendererKind};
use crate::{ConfigError, ConfigResult};

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_renderer_config(&config.renderer)?;

    if config.user_agent.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent value cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler limits
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    for (name, value) in [
        ("max-pages-per-domain", config.max_pages_per_domain),
        ("max-queue-size", config.max_queue_size),
        ("max-links-per-page", config.max_links_per_page),
        ("max-domain-attempts", config.max_domain_attempts),
    ] {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, value
            )));
        }
    }

    if config.max_links_per_page > config.max_queue_size {
        return Err(ConfigError::Validation(format!(
            "max-links-per-page ({}) cannot exceed max-queue-size ({})",
            config.max_links_per_page, config.max_queue_size
        )));
    }

    if config.navigation_timeout_secs < 1 || config.navigation_timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "navigation-timeout-secs must be between 1 and 600, got {}",
            config.navigation_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.results_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "results-dir cannot be empty".to_string(),
        ));
    }

    if config.state_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "state-path cannot be empty".to_string(),
        ));
    }

    if config.shard_max_bytes < 1 {
        return Err(ConfigError::Validation(
            "shard-max-bytes must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Rejects a browser renderer when the binary was built without it
fn validate_renderer_config(config: &RendererConfig) -> ConfigResult<()> {
    if config.kind == RendererKind::Browser && !cfg!(feature = "browser") {
        return Err(ConfigError::Validation(
            "renderer kind 'browser' requires building with the 'browser' feature".to_string(),
        ));
    }
    Ok(())
}
