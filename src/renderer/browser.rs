//! Headless Chromium renderer
//!
//! Each launch starts its own browser process, so a domain crawl never shares
//! cookies or cache with the previous one. The extraction script runs against
//! the live DOM and mirrors the static extractor's output shape.

use super::extract::SKIPPED_HREF_SCHEMES;
use super::{PageSnapshot, RenderError, RenderResult, Renderer, RendererLauncher};
use crate::config::UserAgentConfig;
use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

const SKIPPED_PLACEHOLDER: &str = "__SKIPPED_SCHEMES__";

/// In-page extraction script template; evaluates to a `PageSnapshot`-shaped object
const EXTRACT_SCRIPT_TEMPLATE: &str = r#"
(() => {
    const base = document.baseURI;
    const skipped = __SKIPPED_SCHEMES__;
    const resolve = (value) => {
        try { return new URL(value, base).href; } catch (e) { return value; }
    };
    const forms = Array.from(document.querySelectorAll('form')).map((form) => {
        const rawAction = (form.getAttribute('action') || '').trim();
        const rawMethod = (form.getAttribute('method') || '').trim().toLowerCase();
        const fields = Array.from(form.querySelectorAll('input, textarea, select')).map((el) => {
            const field = {
                type: el.type || el.tagName.toLowerCase(),
                name: el.getAttribute('name') || '',
                id: el.getAttribute('id') || '',
                placeholder: el.getAttribute('placeholder') || '',
                required: el.hasAttribute('required'),
            };
            if (el.tagName.toLowerCase() === 'select') {
                field.options = Array.from(el.options).map((o) => o.value);
            }
            return field;
        });
        return {
            url: location.href,
            action: rawAction === '' ? location.href : resolve(rawAction),
            method: ['get', 'post', 'dialog'].includes(rawMethod) ? rawMethod : 'get',
            fields,
        };
    });
    const links = [];
    for (const a of document.querySelectorAll('a[href]')) {
        const raw = (a.getAttribute('href') || '').trim();
        const lower = raw.toLowerCase();
        if (raw === '' || raw.startsWith('#') || skipped.some((s) => lower.startsWith(s))) {
            continue;
        }
        let target;
        try { target = new URL(raw, base); } catch (e) { continue; }
        if (target.protocol === 'http:' || target.protocol === 'https:') {
            links.push(target.href);
        }
    }
    return { url: location.href, forms, links };
})()
"#;

/// Returns the extraction script with the same href filters the static
/// extractor applies
pub fn extract_script() -> String {
    let schemes = SKIPPED_HREF_SCHEMES
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ");
    EXTRACT_SCRIPT_TEMPLATE.replace(SKIPPED_PLACEHOLDER, &format!("[{}]", schemes))
}

/// True when the error means the DevTools connection itself is gone
fn is_connection_lost(error: &CdpError) -> bool {
    matches!(
        error,
        CdpError::Ws(_) | CdpError::ChannelSendError(_) | CdpError::NoResponse
    )
}

/// Launches [`BrowserRenderer`]s
pub struct BrowserLauncher {
    user_agent: String,
    headless: bool,
}

impl BrowserLauncher {
    pub fn new(config: &UserAgentConfig, headless: bool) -> Self {
        Self {
            user_agent: config.value.clone(),
            headless,
        }
    }
}

#[async_trait]
impl RendererLauncher for BrowserLauncher {
    async fn launch(&self) -> RenderResult<Box<dyn Renderer>> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", self.user_agent));
        if !self.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(RenderError::Launch)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                return Err(RenderError::Launch(e.to_string()));
            }
        };

        tracing::debug!("Browser renderer launched (headless: {})", self.headless);
        Ok(Box::new(BrowserRenderer {
            browser,
            page: Some(page),
            handler_task: Some(handler_task),
            loaded: false,
        }))
    }
}

/// Renderer backed by a headless Chromium instance
pub struct BrowserRenderer {
    browser: Browser,
    page: Option<Page>,
    handler_task: Option<JoinHandle<()>>,
    loaded: bool,
}

impl BrowserRenderer {
    fn page(&self) -> RenderResult<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| RenderError::Disconnected("browser already closed".to_string()))
    }

    /// The handler task ends once the browser connection drops
    fn handler_alive(&self) -> bool {
        self.handler_task
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Maps a CDP failure to a page-level error unless the browser is gone
    fn classify(
        &self,
        error: CdpError,
        page_error: impl FnOnce(String) -> RenderError,
    ) -> RenderError {
        if is_connection_lost(&error) || !self.handler_alive() {
            RenderError::Disconnected(error.to_string())
        } else {
            page_error(error.to_string())
        }
    }
}

#[async_trait]
impl Renderer for BrowserRenderer {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> RenderResult<()> {
        self.loaded = false;
        let page = self.page()?;
        let outcome = tokio::time::timeout(timeout, page.goto(url))
            .await
            .map(|loaded| loaded.map(|_| ()));

        match outcome {
            Err(_) => Err(RenderError::Timeout {
                url: url.to_string(),
                timeout,
            }),
            Ok(Err(e)) => Err(self.classify(e, |message| RenderError::Navigation {
                url: url.to_string(),
                message,
            })),
            Ok(Ok(_)) => {
                self.loaded = true;
                Ok(())
            }
        }
    }

    async fn extract(&mut self) -> RenderResult<PageSnapshot> {
        if !self.loaded {
            return Err(RenderError::NoPage);
        }

        let evaluated = self.page()?.evaluate(extract_script()).await;
        match evaluated {
            Ok(result) => result
                .into_value::<PageSnapshot>()
                .map_err(|e| RenderError::Extraction(e.to_string())),
            Err(e) => Err(self.classify(e, RenderError::Extraction)),
        }
    }

    async fn close(&mut self) -> RenderResult<()> {
        self.loaded = false;
        if self.page.take().is_none() {
            return Ok(());
        }

        let result = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| RenderError::Disconnected(e.to_string()));
        let _ = self.browser.wait().await;

        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        result
    }
}
