//! Page renderer boundary
//!
//! The crawler only needs three things from a renderer: load a URL, pull the
//! forms and links out of the loaded page, and release its resources. Those
//! are the [`Renderer`] trait; [`RendererLauncher`] creates one renderer per
//! domain crawl.
//!
//! Two implementations ship:
//! - [`HttpRenderer`]: plain HTTP fetch with static DOM extraction (default)
//! - `BrowserRenderer`: headless Chromium evaluating an extraction script
//!   against the live DOM (requires the `browser` feature)

#[cfg(feature = "browser")]
mod browser;
mod extract;
mod http;

#[cfg(feature = "browser")]
pub use browser::{extract_script, BrowserLauncher, BrowserRenderer};
pub use extract::{extract_page, resolve_link};
pub use http::{HttpLauncher, HttpRenderer};

use crate::config::{Config, RendererKind};
use crate::forms::FormRecord;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to launch renderer: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("No page has been loaded")]
    NoPage,

    #[error("Renderer disconnected: {0}")]
    Disconnected(String),
}

impl RenderError {
    /// True when the renderer itself is unusable, as opposed to one page failing
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Launch(_) | Self::Disconnected(_))
    }
}

/// Result type for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;

/// What extraction returns for one loaded page
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageSnapshot {
    /// URL of the loaded page (after redirects)
    pub url: String,

    /// Every form on the page, in document order
    #[serde(default)]
    pub forms: Vec<FormRecord>,

    /// Absolute http(s) anchor targets, in document order
    #[serde(default)]
    pub links: Vec<String>,
}

/// A page renderer scoped to one domain crawl
#[async_trait]
pub trait Renderer: Send {
    /// Loads `url`, waiting at most `timeout` for the document to be parsed
    async fn navigate(&mut self, url: &str, timeout: Duration) -> RenderResult<()>;

    /// Extracts forms and links from the currently loaded page
    async fn extract(&mut self) -> RenderResult<PageSnapshot>;

    /// Releases all renderer resources
    async fn close(&mut self) -> RenderResult<()>;
}

/// Creates renderers
#[async_trait]
pub trait RendererLauncher: Send + Sync {
    async fn launch(&self) -> RenderResult<Box<dyn Renderer>>;
}

/// Builds the launcher selected by the configuration
pub fn launcher_from_config(config: &Config) -> RenderResult<Box<dyn RendererLauncher>> {
    match config.renderer.kind {
        RendererKind::Http => {
            let launcher = HttpLauncher::new(&config.user_agent)
                .map_err(|e| RenderError::Launch(e.to_string()))?;
            Ok(Box::new(launcher))
        }
        #[cfg(feature = "browser")]
        RendererKind::Browser => Ok(Box::new(BrowserLauncher::new(
            &config.user_agent,
            config.renderer.headless,
        ))),
        #[cfg(not(feature = "browser"))]
        RendererKind::Browser => Err(RenderError::Launch(
            "browser rendering requires the 'browser' feature".to_string(),
        )),
    }
}
