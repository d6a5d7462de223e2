//! HTTP renderer
//!
//! Fetches pages with a plain HTTP client and extracts from the static HTML.
//! Any HTTP response counts as a loaded page, the way a browser still renders
//! a 404 body; only transport failures and timeouts are navigation errors.

use super::extract::extract_page;
use super::{PageSnapshot, RenderError, RenderResult, Renderer, RendererLauncher};
use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Builds the HTTP client shared by every renderer this launcher creates
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.value.clone())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Launches [`HttpRenderer`]s
pub struct HttpLauncher {
    client: Client,
}

impl HttpLauncher {
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl RendererLauncher for HttpLauncher {
    async fn launch(&self) -> RenderResult<Box<dyn Renderer>> {
        Ok(Box::new(HttpRenderer::new(self.client.clone())))
    }
}

struct LoadedPage {
    url: Url,
    body: String,
}

/// Renderer backed by an HTTP client
pub struct HttpRenderer {
    client: Client,
    page: Option<LoadedPage>,
}

impl HttpRenderer {
    pub fn new(client: Client) -> Self {
        Self { client, page: None }
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> RenderResult<()> {
        self.page = None;

        let to_render_error = |e: reqwest::Error| {
            if e.is_timeout() {
                RenderError::Timeout {
                    url: url.to_string(),
                    timeout,
                }
            } else {
                RenderError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(to_render_error)?;

        let final_url = response.url().clone();
        let body = response.text().await.map_err(to_render_error)?;

        tracing::trace!("Loaded {} ({} bytes)", final_url, body.len());
        self.page = Some(LoadedPage {
            url: final_url,
            body,
        });
        Ok(())
    }

    async fn extract(&mut self) -> RenderResult<PageSnapshot> {
        let page = self.page.as_ref().ok_or(RenderError::NoPage)?;
        Ok(extract_page(&page.body, &page.url))
    }

    async fn close(&mut self) -> RenderResult<()> {
        self.page = None;
        Ok(())
    }
}
