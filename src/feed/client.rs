//! HTTP client that fetches the source feed with retries and cache-busting.

use crate::config::Config;
use crate::error::FeedError;
use crate::feed::names::ITEM_MARKER;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};
use wreq::Client;

const USER_AGENT: &str = "Mozilla/5.0 (feed-updater)";

/// Query parameter carrying the cache-busting token.
pub const CACHE_BUST_PARAM: &str = "cb";

/// Trait for retrieving the source feed - enables mocking for tests.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Returns the body of a feed that contains at least one item.
    async fn fetch(&self) -> Result<String>;
}

/// Feed HTTP client with retry and cache-busting.
pub struct FeedClient {
    client: Client,
    source_url: String,
    attempts: u32,
    delay_ms: u64,
}

impl FeedClient {
    /// Creates a new feed client from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            source_url: config.source_url.clone(),
            attempts: config.fetch_attempts.max(1),
            delay_ms: config.fetch_delay_ms,
        })
    }

    /// Performs one GET and accepts the body only if it looks like a feed with items.
    async fn attempt(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Expires", "0")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        let body = response.text().await.context("Failed to read response body")?;

        if !body.contains(ITEM_MARKER) {
            anyhow::bail!("Response contained no {} elements", ITEM_MARKER);
        }

        Ok(body)
    }

    /// Sleeps between attempts.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        debug!("Delaying {}ms before retrying", self.delay_ms);
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch(&self) -> Result<String> {
        for attempt in 1..=self.attempts {
            let url = cache_busted_url(&self.source_url, &cache_bust_token());
            info!("Fetch attempt {}/{} -> {}", attempt, self.attempts, url);

            match self.attempt(&url).await {
                Ok(body) => {
                    info!("Feed fetched successfully ({} bytes)", body.len());
                    return Ok(body);
                }
                Err(e) => warn!("Fetch attempt {} failed: {:#}", attempt, e),
            }

            if attempt < self.attempts {
                self.delay().await;
            }
        }

        Err(FeedError::Fetch { attempts: self.attempts }.into())
    }
}

/// Returns the current unix time in seconds as the cache-busting token.
fn cache_bust_token() -> String {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0).to_string()
}

/// Appends the cache-busting parameter, respecting an existing query string.
pub fn cache_busted_url(base: &str, token: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", base, separator, CACHE_BUST_PARAM, token)
}

/// Reads a feed from a local file, for converting without a network fetch.
pub struct FileSource {
    path: std::path::PathBuf,
}

impl FileSource {
    /// Creates a source that reads the given file.
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileSource {
    async fn fetch(&self) -> Result<String> {
        info!("Reading feed from {}", self.path.display());
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read feed file: {}", self.path.display()))
    }
}
