use anyhow::{bail, Context, Result};
use proscout_sdk::{ProscoutClient, RetryConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_stream_deadline_secs")]
    pub stream_deadline_secs: u64,

    #[serde(default)]
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_stream_deadline_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    10_000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            stream_deadline_secs: default_stream_deadline_secs(),
            retry: RetrySettings::default(),
        }
    }
}

impl CliConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            toml::from_str(&content).context("Failed to parse configuration file")
        } else {
            tracing::debug!(
                "Configuration file {} not found, using defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    /// Apply command-line and environment overrides on top of the file.
    pub fn with_overrides(mut self, base_url: Option<String>, api_key: Option<String>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if api_key.is_some() {
            self.api_key = api_key;
        }
        self
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.retry.max_retries,
            initial_backoff: Duration::from_millis(self.retry.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.retry.max_backoff_ms),
            ..RetryConfig::default()
        }
    }

    pub fn build_client(&self) -> Result<ProscoutClient> {
        if self.stream_deadline_secs == 0 {
            bail!("stream_deadline_secs must be greater than zero");
        }

        let mut builder = ProscoutClient::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .stream_deadline(Duration::from_secs(self.stream_deadline_secs))
            .retry_config(self.retry_config());

        if let Some(api_key) = &self.api_key {
            builder = builder.api_key(api_key);
        }

        builder.build().context("Failed to build search client")
    }
}
