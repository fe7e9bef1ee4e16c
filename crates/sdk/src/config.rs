//! Configuration types for the Proscout SDK.

use std::time::Duration;
use url::Url;

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Wall-clock deadline for a streamed search, measured from channel open.
pub const DEFAULT_STREAM_DEADLINE: Duration = Duration::from_secs(30);

/// Configuration for the Proscout client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the search service.
    pub base_url: Url,
    /// Bearer API key.
    pub api_key: Option<String>,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Deadline after which a streamed search resolves with partial data.
    pub stream_deadline: Duration,
    /// Retry configuration.
    pub retry_config: RetryConfig,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            stream_deadline: DEFAULT_STREAM_DEADLINE,
            retry_config: RetryConfig::default(),
        }
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub backoff_multiplier: f64,
    /// HTTP status codes to retry on.
    pub retry_on_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            retry_on_status_codes: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Calculate backoff duration for a given attempt.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_ms = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let backoff = Duration::from_millis(backoff_ms as u64);
        std::cmp::min(backoff, self.max_backoff)
    }

    /// Check if a status code should trigger a retry.
    ///
    /// Authentication rejections are never retried, whatever the list says.
    pub fn should_retry_status(&self, status: u16) -> bool {
        !matches!(status, 401 | 403) && self.retry_on_status_codes.contains(&status)
    }
}
