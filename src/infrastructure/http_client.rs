//! HTTP page fetcher for product pages
//!
//! One GET per call with a browser-like User-Agent and a bounded timeout.
//! Failures of any kind (transport, timeout, status >= 400) come back as
//! `ScrapeError::PageUnreachable` so callers only handle a single error kind.

use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::{debug, info, warn};

use crate::domain::errors::{ScrapeError, ScrapeOutcome};
use crate::domain::repositories::PageFetcher;
use crate::infrastructure::config::ScraperConfig;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl HttpClientConfig {
    pub fn from_scraper_config(scraper: &ScraperConfig) -> Self {
        Self {
            timeout_seconds: scraper.timeout_seconds,
            user_agent: scraper.user_agent.clone(),
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 20,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// reqwest-backed [`PageFetcher`]. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn from_scraper_config(scraper: &ScraperConfig) -> Result<Self> {
        Self::with_config(HttpClientConfig::from_scraper_config(scraper))
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {e}"))?;

        debug!(timeout_seconds = config.timeout_seconds, "HTTP client ready");
        Ok(Self { client, config })
    }

    pub const fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> ScrapeOutcome<String> {
        info!(url = %url, "🌐 HTTP GET");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "⚠️ Network error");
            ScrapeError::unreachable(url, e.status().map(|s| s.as_u16()), e.to_string())
        })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            warn!(url = %url, status = status.as_u16(), "❌ HTTP error");
            return Err(ScrapeError::unreachable(
                url,
                Some(status.as_u16()),
                status.canonical_reason().unwrap_or("error status"),
            ));
        }

        let body = response.text().await.map_err(|e| {
            warn!(url = %url, error = %e, "⚠️ Failed to read response body");
            ScrapeError::unreachable(url, Some(status.as_u16()), e.to_string())
        })?;

        debug!(url = %url, bytes = body.len(), "✅ Page fetched");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_browser_user_agent() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout_seconds, 20);
        assert!(config.user_agent.contains("Chrome/124.0"));
    }

    #[test]
    fn config_follows_scraper_settings() {
        let scraper = ScraperConfig {
            timeout_seconds: 5,
            user_agent: "probe/1.0".into(),
            ..ScraperConfig::default()
        };
        let client = HttpClient::from_scraper_config(&scraper).unwrap();
        assert_eq!(client.config().timeout_seconds, 5);
        assert_eq!(client.config().user_agent, "probe/1.0");
    }
}
