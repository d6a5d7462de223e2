use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default browser-like user agent presented to crawled sites
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Formscout
///
/// Every section is optional; a missing file or section yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub renderer: RendererConfig,
}

/// Crawler limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages visited per domain
    #[serde(rename = "max-pages-per-domain")]
    pub max_pages_per_domain: usize,

    /// Maximum number of pending URLs in a domain's frontier
    #[serde(rename = "max-queue-size")]
    pub max_queue_size: usize,

    /// Maximum number of same-site links considered per visited page
    #[serde(rename = "max-links-per-page")]
    pub max_links_per_page: usize,

    /// Per-navigation timeout (seconds)
    #[serde(rename = "navigation-timeout-secs")]
    pub navigation_timeout_secs: u64,

    /// Maximum number of domains attempted in one run
    #[serde(rename = "max-domain-attempts")]
    pub max_domain_attempts: usize,
}

impl CrawlerConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages_per_domain: 50,
            max_queue_size: 100,
            max_links_per_page: 10,
            navigation_timeout_secs: 30,
            max_domain_attempts: 10,
        }
    }
}

/// User agent override sent by the renderer
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding the `forms*.json` shards
    #[serde(rename = "results-dir")]
    pub results_dir: PathBuf,

    /// Path of the scan state document
    #[serde(rename = "state-path")]
    pub state_path: PathBuf,

    /// Size ceiling of a result shard (bytes)
    #[serde(rename = "shard-max-bytes")]
    pub shard_max_bytes: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            state_path: PathBuf::from("state/scan_state.json"),
            shard_max_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Which page renderer drives the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Plain HTTP fetch + static DOM extraction
    #[default]
    Http,
    /// Headless Chromium (requires the `browser` feature)
    Browser,
}

/// Renderer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub kind: RendererKind,
    pub headless: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: RendererKind::Http,
            headless: true,
        }
    }
}
