//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source feed URL (without the cache-busting parameter)
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Where the transformed feed is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Keyword that must appear in an item's category fields
    #[serde(default = "default_keyword")]
    pub keyword: String,

    /// Multiplier from the source currency to NOK
    #[serde(default = "default_conversion_rate")]
    pub conversion_rate: Decimal,

    /// Standard shipping price in the source currency
    #[serde(default = "default_standard_shipping")]
    pub standard_shipping: Decimal,

    /// Converted price (NOK) at or above which shipping is free
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: Decimal,

    /// Number of fetch attempts before giving up
    #[serde(default = "default_fetch_attempts")]
    pub fetch_attempts: u32,

    /// Delay between fetch attempts in milliseconds
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Commit and push the output file after writing it
    #[serde(default)]
    pub publish: bool,

    /// Remote to push to (git's default when unset)
    #[serde(default)]
    pub git_remote: Option<String>,

    /// Branch to push to (git's default when unset)
    #[serde(default)]
    pub git_branch: Option<String>,

    /// Committer name for publish commits
    #[serde(default = "default_git_user_name")]
    pub git_user_name: String,

    /// Committer email for publish commits
    #[serde(default = "default_git_user_email")]
    pub git_user_email: String,

    /// Number of publish attempts before giving up
    #[serde(default = "default_publish_attempts")]
    pub publish_attempts: u32,

    /// Delay between publish attempts in milliseconds
    #[serde(default = "default_publish_delay_ms")]
    pub publish_delay_ms: u64,

    /// Run summary format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_source_url() -> String {
    "https://www.lampster.se/rss/pf-google_nok-no.xml".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("lampster-norge-feed").join("norsk-feed.xml")
}

fn default_keyword() -> String {
    "norsk".to_string()
}

fn default_conversion_rate() -> Decimal {
    Decimal::new(13375, 4)
}

fn default_standard_shipping() -> Decimal {
    Decimal::new(99, 0)
}

fn default_free_shipping_threshold() -> Decimal {
    Decimal::new(73500, 2)
}

fn default_fetch_attempts() -> u32 {
    5
}

fn default_fetch_delay_ms() -> u64 {
    2000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_git_user_name() -> String {
    "lampster-bot".to_string()
}

fn default_git_user_email() -> String {
    "bot@example.com".to_string()
}

fn default_publish_attempts() -> u32 {
    3
}

fn default_publish_delay_ms() -> u64 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            output_path: default_output_path(),
            keyword: default_keyword(),
            conversion_rate: default_conversion_rate(),
            standard_shipping: default_standard_shipping(),
            free_shipping_threshold: default_free_shipping_threshold(),
            fetch_attempts: default_fetch_attempts(),
            fetch_delay_ms: default_fetch_delay_ms(),
            timeout_secs: default_timeout_secs(),
            publish: false,
            git_remote: None,
            git_branch: None,
            git_user_name: default_git_user_name(),
            git_user_email: default_git_user_email(),
            publish_attempts: default_publish_attempts(),
            publish_delay_ms: default_publish_delay_ms(),
            format: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("feed-relay.toml");
        if local_config.exists() {
            debug!("Found feed-relay.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("feed-relay").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("FEED_SOURCE_URL") {
            self.source_url = url;
        }

        if let Ok(output) = std::env::var("FEED_OUTPUT") {
            self.output_path = PathBuf::from(output);
        }

        if let Ok(keyword) = std::env::var("FEED_KEYWORD") {
            self.keyword = keyword;
        }

        if let Ok(publish) = std::env::var("FEED_PUBLISH") {
            match publish.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.publish = true,
                "0" | "false" | "no" => self.publish = false,
                _ => {}
            }
        }

        self
    }

    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.fetch_attempts == 0 {
            anyhow::bail!("fetch_attempts must be at least 1");
        }
        if self.publish_attempts == 0 {
            anyhow::bail!("publish_attempts must be at least 1");
        }
        if self.conversion_rate <= Decimal::ZERO {
            anyhow::bail!("conversion_rate must be positive, got {}", self.conversion_rate);
        }
        if self.keyword.trim().is_empty() {
            anyhow::bail!("keyword must not be empty");
        }
        Ok(())
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Output format for the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
