//! Per-domain traversal
//!
//! Walks one domain's same-site link graph breadth-first from its candidate
//! root URLs, collecting every form the renderer extracts along the way.

use super::frontier::{Frontier, FrontierLimits};
use crate::config::CrawlerConfig;
use crate::forms::FormRecord;
use crate::renderer::{RenderError, Renderer, RendererLauncher};
use crate::url::{is_same_site, seed_urls};
use std::time::Duration;
use url::Url;

/// Limits applied to one domain crawl
#[derive(Debug, Clone, Copy)]
pub struct CrawlSettings {
    pub limits: FrontierLimits,
    pub navigation_timeout: Duration,
}

impl From<&CrawlerConfig> for CrawlSettings {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            limits: FrontierLimits::from(config),
            navigation_timeout: config.navigation_timeout(),
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

/// Result of crawling one domain
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    pub domain: String,

    /// Forms in visit order
    pub forms: Vec<FormRecord>,

    /// URLs handed to the renderer
    pub pages_visited: usize,

    /// Visits that failed to load or extract
    pub pages_failed: usize,
}

impl CrawlOutcome {
    fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            ..Self::default()
        }
    }
}

/// Crawls one domain with a freshly launched renderer
///
/// The renderer is closed on every exit path. Single-page failures are logged
/// and skipped; only a fatal renderer error aborts the crawl.
pub async fn crawl_domain(
    launcher: &dyn RendererLauncher,
    domain: &str,
    settings: &CrawlSettings,
) -> Result<CrawlOutcome, RenderError> {
    let mut renderer = launcher.launch().await?;

    let result = traverse(renderer.as_mut(), domain, settings).await;

    if let Err(e) = renderer.close().await {
        tracing::warn!("Failed to close renderer for {}: {}", domain, e);
    }

    result
}

/// Runs the breadth-first visit loop against an already launched renderer
pub async fn traverse(
    renderer: &mut dyn Renderer,
    domain: &str,
    settings: &CrawlSettings,
) -> Result<CrawlOutcome, RenderError> {
    let mut frontier = Frontier::new(seed_urls(domain), settings.limits);
    let mut outcome = CrawlOutcome::new(domain);

    while let Some(url) = frontier.next_url() {
        outcome.pages_visited += 1;
        tracing::debug!(
            "[{}] Visiting {} ({}/{}, {} queued)",
            domain,
            url,
            frontier.visited_count(),
            settings.limits.max_visits,
            frontier.queue_len()
        );

        if let Err(e) = renderer.navigate(&url, settings.navigation_timeout).await {
            if e.is_fatal() {
                return Err(e);
            }
            tracing::debug!("[{}] Navigation failed: {}", domain, e);
            outcome.pages_failed += 1;
            continue;
        }

        let snapshot = match renderer.extract().await {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::debug!("[{}] Extraction failed on {}: {}", domain, url, e);
                outcome.pages_failed += 1;
                continue;
            }
        };

        if !snapshot.forms.is_empty() {
            tracing::info!(
                "[{}] Found {} form(s) on {}",
                domain,
                snapshot.forms.len(),
                snapshot.url
            );
        }
        outcome.forms.extend(snapshot.forms);

        let same_site = snapshot.links.into_iter().filter(|link| {
            Url::parse(link)
                .map(|parsed| is_same_site(&parsed, domain))
                .unwrap_or(false)
        });
        let added = frontier.enqueue_links(same_site);
        tracing::trace!("[{}] Queued {} link(s) from {}", domain, added, url);
    }

    tracing::info!(
        "[{}] Crawl finished: {} page(s) visited, {} failed, {} form(s)",
        domain,
        outcome.pages_visited,
        outcome.pages_failed,
        outcome.forms.len()
    );

    Ok(outcome)
}
