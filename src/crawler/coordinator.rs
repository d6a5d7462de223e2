//! Run coordinator
//!
//! One run aggregates the domain feed, loads scan progress, and crawls
//! unscanned domains in feed order until one of them yields forms or the
//! attempt budget runs out. Progress is persisted after every attempt so an
//! interrupted run only loses the domain in flight.

use super::domain::{crawl_domain, CrawlSettings};
use crate::config::Config;
use crate::feed::{collect_domains, FeedUrls, HttpListSource, ListSource};
use crate::forms::FormRecord;
use crate::output::ResultStore;
use crate::renderer::{launcher_from_config, RendererLauncher};
use crate::state::{ScanState, ScanStateStore};
use crate::storage::{open_storage, Storage};
use crate::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Summary of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Distinct domains in the feed
    pub universe_size: usize,

    /// Domains not yet scanned when the run started
    pub unscanned_before: usize,

    /// Number of domains crawled
    pub domains_attempted: usize,

    /// Crawled domains in attempt order
    pub attempted: Vec<String>,

    /// Form records written to the result store
    pub forms_saved: usize,

    /// Shard the forms were written to
    pub shard: Option<PathBuf>,

    /// True when every domain was already scanned and progress was cleared
    pub state_reset: bool,
}

impl RunReport {
    pub fn found_forms(&self) -> bool {
        self.forms_saved > 0
    }
}

/// What the next run would do, computed without crawling or writing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunPlan {
    pub universe_size: usize,
    pub scanned: usize,
    pub unscanned: usize,
    /// Domains the next run would attempt, in order
    pub next_attempts: Vec<String>,
}

/// Drives one run against injected collaborators
pub struct Coordinator {
    config: Arc<Config>,
    feed: Box<dyn ListSource>,
    feed_urls: FeedUrls,
    launcher: Box<dyn RendererLauncher>,
    storage: Arc<dyn Storage>,
    state_store: ScanStateStore,
    results: ResultStore,
}

impl Coordinator {
    pub fn new(
        config: Config,
        feed: Box<dyn ListSource>,
        launcher: Box<dyn RendererLauncher>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let state_store = ScanStateStore::new(storage.clone(), config.output.state_path.clone());
        let results = ResultStore::new(
            storage.clone(),
            config.output.results_dir.clone(),
            config.output.shard_max_bytes,
        );

        Self {
            config: Arc::new(config),
            feed,
            feed_urls: FeedUrls::default(),
            launcher,
            storage,
            state_store,
            results,
        }
    }

    /// Builds a coordinator with the HTTP feed, the configured renderer, and
    /// filesystem storage
    pub fn from_config(config: Config) -> Result<Self> {
        let feed = HttpListSource::new(&config.user_agent)?;
        let launcher = launcher_from_config(&config)?;
        Ok(Self::new(config, Box::new(feed), launcher, open_storage()))
    }

    /// Overrides where the scope lists are fetched from
    pub fn with_feed_urls(mut self, urls: FeedUrls) -> Self {
        self.feed_urls = urls;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn ensure_directories(&self) -> Result<()> {
        self.storage.create_dir_all(&self.config.output.results_dir)?;
        if let Some(parent) = self
            .config
            .output
            .state_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            self.storage.create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Performs one run
    ///
    /// Only infrastructure failures (directory creation, state or shard
    /// writes) are returned as errors. Feed and crawl failures are logged and
    /// absorbed.
    pub async fn run_once(&self) -> Result<RunReport> {
        self.ensure_directories()?;

        let universe = collect_domains(self.feed.as_ref(), &self.feed_urls).await;
        let mut state = self.state_store.load();
        let unscanned: Vec<String> = state
            .unscanned(&universe)
            .into_iter()
            .map(String::from)
            .collect();

        tracing::info!(
            "Domain universe: {} total, {} scanned, {} remaining",
            universe.len(),
            state.scanned.len(),
            unscanned.len()
        );

        let mut report = RunReport {
            universe_size: universe.len(),
            unscanned_before: unscanned.len(),
            ..RunReport::default()
        };

        if unscanned.is_empty() {
            if universe.is_empty() {
                tracing::warn!("Domain feed is empty; resetting scan state anyway");
            } else {
                tracing::info!("All domains scanned, starting a new cycle");
            }
            state.reset(Utc::now());
            self.state_store.save(&state)?;
            report.state_reset = true;
            return Ok(report);
        }

        let budget = unscanned.len().min(self.config.crawler.max_domain_attempts);
        let found = self
            .attempt_domains(&unscanned[..budget], &mut state, &mut report)
            .await?;

        if let Some(forms) = found {
            let outcome = self.results.append(&forms)?;
            tracing::info!(
                "Saved {} form(s) to {} ({} records in shard)",
                outcome.appended,
                outcome.path.display(),
                outcome.total
            );
            report.forms_saved = outcome.appended;
            report.shard = Some(outcome.path);
        } else {
            tracing::info!(
                "No forms found after {} domain attempt(s)",
                report.domains_attempted
            );
        }

        Ok(report)
    }

    /// Crawls `domains` in order until one yields forms
    async fn attempt_domains(
        &self,
        domains: &[String],
        state: &mut ScanState,
        report: &mut RunReport,
    ) -> Result<Option<Vec<FormRecord>>> {
        let settings = CrawlSettings::from(&self.config.crawler);

        for (i, domain) in domains.iter().enumerate() {
            tracing::info!("[{}/{}] Crawling {}", i + 1, domains.len(), domain);

            let forms = match crawl_domain(self.launcher.as_ref(), domain, &settings).await {
                Ok(outcome) => outcome.forms,
                Err(e) => {
                    tracing::error!("Crawl of {} failed: {}", domain, e);
                    Vec::new()
                }
            };

            report.attempted.push(domain.clone());
            report.domains_attempted += 1;

            state.mark_scanned(domain, Utc::now());
            self.state_store.save(state)?;

            if !forms.is_empty() {
                tracing::info!("{} yielded {} form(s)", domain, forms.len());
                return Ok(Some(forms));
            }
        }

        Ok(None)
    }

    /// Computes what the next run would attempt, without crawling or writing
    pub async fn plan(&self) -> RunPlan {
        let universe = collect_domains(self.feed.as_ref(), &self.feed_urls).await;
        let state = self.state_store.load();
        let unscanned = state.unscanned(&universe);

        RunPlan {
            universe_size: universe.len(),
            scanned: state.scanned.len(),
            unscanned: unscanned.len(),
            next_attempts: unscanned
                .iter()
                .take(self.config.crawler.max_domain_attempts)
                .map(|d| d.to_string())
                .collect(),
        }
    }

    pub fn state_path(&self) -> &Path {
        self.state_store.path()
    }
}
