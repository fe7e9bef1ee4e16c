//! Main client for the Proscout SDK.

use crate::api::*;
use crate::config::{ClientConfig, RetryConfig, DEFAULT_STREAM_DEADLINE, DEFAULT_TIMEOUT};
use crate::error::{ProscoutError, ProscoutResult};
use crate::transport::{HttpTransport, StreamingSearch};
use proscout_core::{SearchObserver, TracingObserver};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Main client for the profile-search service.
///
/// Cheap to clone; clones share the HTTP connection pool, configuration
/// and observer. No per-request state is kept on the client.
#[derive(Clone)]
pub struct ProscoutClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
    observer: Arc<dyn SearchObserver>,
}

impl ProscoutClient {
    /// Create a new client builder.
    pub fn builder() -> ProscoutClientBuilder {
        ProscoutClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(
        config: ClientConfig,
        observer: Arc<dyn SearchObserver>,
    ) -> ProscoutResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self {
            config,
            http,
            observer,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn observer(&self) -> &dyn SearchObserver {
        &*self.observer
    }

    /// Get the search API.
    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(self)
    }

    /// Get the profiles API.
    pub fn profiles(&self) -> ProfilesApi<'_> {
        ProfilesApi::new(self)
    }

    /// Get the connections API.
    pub fn connections(&self) -> ConnectionsApi<'_> {
        ConnectionsApi::new(self)
    }

    /// Get the introductions API.
    pub fn introductions(&self) -> IntroductionsApi<'_> {
        IntroductionsApi::new(self)
    }

    /// Create the streamed-search transport.
    pub fn streaming(&self) -> StreamingSearch {
        StreamingSearch::new(self.config.clone(), self.observer.clone())
    }
}

impl std::fmt::Debug for ProscoutClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProscoutClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("has_api_key", &self.config.api_key.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for creating a ProscoutClient.
pub struct ProscoutClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    stream_deadline: Duration,
    retry_config: RetryConfig,
    observer: Option<Arc<dyn SearchObserver>>,
}

impl ProscoutClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            stream_deadline: DEFAULT_STREAM_DEADLINE,
            retry_config: RetryConfig::default(),
            observer: None,
        }
    }

    /// Set the base URL of the search service.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the streamed-search deadline.
    pub fn stream_deadline(mut self, deadline: Duration) -> Self {
        self.stream_deadline = deadline;
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Set the observer that receives diagnostic events.
    pub fn observer(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the client.
    pub fn build(self) -> ProscoutResult<ProscoutClient> {
        let base_url_str = self
            .base_url
            .ok_or_else(|| ProscoutError::Config("base_url is required".to_string()))?;

        let base_url = Url::parse(&base_url_str)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ProscoutError::Config(format!(
                "unsupported base_url scheme: {}",
                base_url.scheme()
            )));
        }

        if self.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err(ProscoutError::Config("api_key must not be blank".to_string()));
        }

        if self.stream_deadline.is_zero() {
            return Err(ProscoutError::Config(
                "stream_deadline must be greater than zero".to_string(),
            ));
        }

        let config = ClientConfig {
            base_url,
            api_key: self.api_key,
            timeout: self.timeout,
            stream_deadline: self.stream_deadline,
            retry_config: self.retry_config,
        };

        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(TracingObserver) as Arc<dyn SearchObserver>);

        ProscoutClient::from_config(config, observer)
    }
}

impl Default for ProscoutClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
