//! Scripted collaborators for driving the coordinator

use async_trait::async_trait;
use formscout::config::Config;
use formscout::crawler::Coordinator;
use formscout::feed::{FeedUrls, ListSource};
use formscout::renderer::{PageSnapshot, RenderError, RenderResult, Renderer, RendererLauncher};
use formscout::storage::{MemoryStorage, Storage};
use formscout::{FieldRecord, FormRecord, ScoutError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Serves a fixed exact-domain list and an empty wildcard list
pub struct ScriptedFeed {
    exact: Vec<String>,
}

impl ScriptedFeed {
    pub fn new(domains: &[&str]) -> Self {
        Self {
            exact: domains.iter().map(|d| d.to_string()).collect(),
        }
    }
}

#[async_trait]
impl ListSource for ScriptedFeed {
    async fn fetch_list(&self, url: &str) -> Result<Vec<String>, ScoutError> {
        if url == FeedUrls::default().exact {
            Ok(self.exact.clone())
        } else {
            Ok(Vec::new())
        }
    }
}

pub fn form(domain: &str, n: usize) -> FormRecord {
    FormRecord {
        url: format!("https://{}", domain),
        action: format!("https://{}/submit/{}", domain, n),
        method: "post".to_string(),
        fields: vec![FieldRecord {
            field_type: "email".to_string(),
            name: "email".to_string(),
            id: String::new(),
            placeholder: String::new(),
            required: true,
            options: None,
        }],
    }
}

/// Each domain's root page carries a scripted number of forms; any other
/// URL fails to load
#[derive(Clone, Default)]
pub struct ScriptedLauncher {
    forms_by_domain: Arc<HashMap<String, usize>>,
    navigations: Arc<Mutex<Vec<String>>>,
    launches: Arc<Mutex<usize>>,
    closes: Arc<Mutex<usize>>,
}

impl ScriptedLauncher {
    pub fn new(forms_by_domain: &[(&str, usize)]) -> Self {
        Self {
            forms_by_domain: Arc::new(
                forms_by_domain
                    .iter()
                    .map(|(d, n)| (d.to_string(), *n))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn launches(&self) -> usize {
        *self.launches.lock().unwrap()
    }

    pub fn closes(&self) -> usize {
        *self.closes.lock().unwrap()
    }
}

struct ScriptedRenderer {
    script: ScriptedLauncher,
    loaded: Option<String>,
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> RenderResult<()> {
        self.script.navigations.lock().unwrap().push(url.to_string());
        self.loaded = url
            .strip_prefix("https://")
            .filter(|d| self.script.forms_by_domain.contains_key(*d))
            .map(String::from);

        match self.loaded {
            Some(_) => Ok(()),
            None => Err(RenderError::Navigation {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }

    async fn extract(&mut self) -> RenderResult<PageSnapshot> {
        let domain = self.loaded.clone().ok_or(RenderError::NoPage)?;
        let count = self.script.forms_by_domain[&domain];
        Ok(PageSnapshot {
            url: format!("https://{}", domain),
            forms: (0..count).map(|n| form(&domain, n)).collect(),
            links: Vec::new(),
        })
    }

    async fn close(&mut self) -> RenderResult<()> {
        *self.script.closes.lock().unwrap() += 1;
        Ok(())
    }
}

#[async_trait]
impl RendererLauncher for ScriptedLauncher {
    async fn launch(&self) -> RenderResult<Box<dyn Renderer>> {
        *self.launches.lock().unwrap() += 1;
        Ok(Box::new(ScriptedRenderer {
            script: self.clone(),
            loaded: None,
        }))
    }
}

/// Coordinator over in-memory storage with default configuration
pub fn coordinator(
    feed: &[&str],
    launcher: &ScriptedLauncher,
    storage: &Arc<MemoryStorage>,
) -> Coordinator {
    Coordinator::new(
        Config::default(),
        Box::new(ScriptedFeed::new(feed)),
        Box::new(launcher.clone()),
        storage.clone() as Arc<dyn Storage>,
    )
}
