//! Remote plaintext list fetching

use crate::config::UserAgentConfig;
use crate::ScoutError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// A source of newline-delimited lists
#[async_trait]
pub trait ListSource: Send + Sync {
    /// Fetches the list at `url` and returns its raw lines
    async fn fetch_list(&self, url: &str) -> Result<Vec<String>, ScoutError>;
}

/// Fetches lists over HTTP(S)
pub struct HttpListSource {
    client: Client,
}

impl HttpListSource {
    /// Builds a list source with the configured user agent
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.value.clone())
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ListSource for HttpListSource {
    async fn fetch_list(&self, url: &str) -> Result<Vec<String>, ScoutError> {
        let feed_error = |source| ScoutError::Feed {
            url: url.to_string(),
            source,
        };

        let body = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(feed_error)?
            .text()
            .await
            .map_err(feed_error)?;

        Ok(body.lines().map(String::from).collect())
    }
}
