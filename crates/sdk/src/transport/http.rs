//! HTTP transport layer for the Proscout SDK.

use crate::config::ClientConfig;
use crate::error::{ProscoutError, ProscoutResult};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> ProscoutResult<Self> {
        let mut headers = header::HeaderMap::new();

        if let Some(ref api_key) = config.api_key {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| ProscoutError::Config("Invalid API key format".to_string()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Build a URL from path segments below the base URL.
    ///
    /// Each segment is percent-encoded on its own, so identifiers containing
    /// `/` or spaces stay a single segment.
    pub fn endpoint(&self, segments: &[&str]) -> ProscoutResult<Url> {
        let mut url = self.config.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| ProscoutError::Config("base_url cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build a URL for a slash-separated path.
    pub fn build_url(&self, path: &str) -> ProscoutResult<Url> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.endpoint(&segments)
    }

    /// Execute a request with retries.
    ///
    /// Idempotent requests retry connect failures, timeouts and the configured
    /// statuses with exponential backoff, or the server's `Retry-After` on 429.
    /// Other requests only retry when the connection was never established.
    /// Authentication rejections return immediately.
    async fn execute_with_retry(
        &self,
        request_builder: RequestBuilder,
        idempotent: bool,
    ) -> ProscoutResult<Response> {
        let retry_config = &self.config.retry_config;
        let mut attempts = 0;

        loop {
            let request = request_builder
                .try_clone()
                .ok_or_else(|| ProscoutError::Config("Request cannot be cloned".to_string()))?;

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if response.status().is_success() {
                        return Ok(response);
                    }

                    let retry_after_secs = retry_after(&response);

                    if idempotent
                        && attempts < retry_config.max_retries
                        && retry_config.should_retry_status(status)
                    {
                        let backoff = match retry_after_secs {
                            Some(secs) if status == 429 => {
                                Duration::from_secs(secs).min(retry_config.max_backoff)
                            }
                            _ => retry_config.backoff_for_attempt(attempts),
                        };
                        warn!(
                            status = status,
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis(),
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(match ProscoutError::from_response(status, &body) {
                        ProscoutError::RateLimited { .. } => {
                            ProscoutError::RateLimited { retry_after_secs }
                        }
                        other => other,
                    });
                }
                Err(e) => {
                    let undelivered = e.is_connect() || (idempotent && e.is_timeout());
                    if attempts < retry_config.max_retries && undelivered {
                        let backoff = retry_config.backoff_for_attempt(attempts);
                        warn!(
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis(),
                            error = %e,
                            "Request could not be delivered, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }
                    if e.is_timeout() {
                        return Err(ProscoutError::Timeout);
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// Read the body and decode it as JSON.
    async fn decode<T: DeserializeOwned>(response: Response) -> ProscoutResult<T> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> ProscoutResult<T> {
        debug!(url = %url, "GET request");

        let response = self.execute_with_retry(self.client.get(url), true).await?;
        Self::decode(response).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        url: Url,
        query: &Q,
    ) -> ProscoutResult<T> {
        debug!(url = %url, "GET request with query");

        let response = self
            .execute_with_retry(self.client.get(url).query(query), true)
            .await?;
        Self::decode(response).await
    }

    /// Execute a POST request without a response body.
    pub async fn post_no_response<B: Serialize>(&self, url: Url, body: &B) -> ProscoutResult<()> {
        debug!(url = %url, "POST request (no response)");

        self.execute_with_retry(self.client.post(url).json(body), false)
            .await?;
        Ok(())
    }
}

fn retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use serde::{Deserialize, Serialize};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestResponse {
        message: String,
        value: i32,
    }

    #[derive(Debug, Serialize)]
    struct TestRequest {
        name: String,
    }

    fn create_config(base_url: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig {
            retry_config: RetryConfig::no_retry(),
            ..ClientConfig::new(Url::parse(base_url).unwrap())
        })
    }

    fn create_config_with_auth(base_url: &str, api_key: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig {
            api_key: Some(api_key.to_string()),
            retry_config: RetryConfig::no_retry(),
            ..ClientConfig::new(Url::parse(base_url).unwrap())
        })
    }

    fn create_config_with_retries(base_url: &str, max_retries: u32) -> Arc<ClientConfig> {
        Arc::new(ClientConfig {
            retry_config: RetryConfig {
                max_retries,
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(5),
                ..RetryConfig::default()
            },
            ..ClientConfig::new(Url::parse(base_url).unwrap())
        })
    }

    #[tokio::test]
    async fn test_get_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "success".to_string(),
                value: 42,
            }))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let url = transport.build_url("/api/test").unwrap();
        let result: TestResponse = transport.get(url).await.unwrap();
        assert_eq!(result.message, "success");
        assert_eq!(result.value, 42);
    }

    #[tokio::test]
    async fn test_get_with_query_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("q", "rust"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "found".to_string(),
                value: 5,
            }))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let url = transport.build_url("api/search").unwrap();
        let params = [("q", "rust"), ("limit", "5")];
        let result: TestResponse = transport.get_with_query(url, &params).await.unwrap();
        assert_eq!(result.value, 5);
    }

    #[tokio::test]
    async fn test_post_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/create"))
            .and(body_json(serde_json::json!({"name": "test"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let request = TestRequest {
            name: "test".to_string(),
        };
        let url = transport.build_url("/api/create").unwrap();
        transport.post_no_response(url, &request).await.unwrap();
    }

    #[tokio::test]
    async fn test_post_is_not_retried_on_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/create"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config_with_retries(&server.uri(), 3)).unwrap();

        let request = TestRequest {
            name: "test".to_string(),
        };
        let url = transport.build_url("/api/create").unwrap();
        let result = transport.post_no_response(url, &request).await;
        assert!(matches!(result, Err(ProscoutError::Api { status: 502, .. })));
    }

    #[tokio::test]
    async fn test_post_connection_refused_is_connect_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport =
            HttpTransport::new(create_config_with_retries(&format!("http://{}", addr), 2)).unwrap();

        let request = TestRequest {
            name: "test".to_string(),
        };
        let url = transport.build_url("/api/create").unwrap();
        let err = transport.post_no_response(url, &request).await.unwrap_err();
        assert!(matches!(err, ProscoutError::Http(ref e) if e.is_connect()));
    }

    #[tokio::test]
    async fn test_authorization_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/protected"))
            .and(header("Authorization", "Bearer sk-test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "authorized".to_string(),
                value: 100,
            }))
            .mount(&server)
            .await;

        let transport =
            HttpTransport::new(create_config_with_auth(&server.uri(), "sk-test-key")).unwrap();

        let url = transport.build_url("/api/protected").unwrap();
        let result: TestResponse = transport.get(url).await.unwrap();
        assert_eq!(result.message, "authorized");
    }

    #[tokio::test]
    async fn test_error_on_400() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/bad"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "Bad Request"})),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let url = transport.build_url("/api/bad").unwrap();
        let result: ProscoutResult<TestResponse> = transport.get(url).await;
        match result {
            Err(ProscoutError::Api { status, message, .. }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bad Request");
            }
            _ => panic!("Expected Api error"),
        }
    }

    #[tokio::test]
    async fn test_error_on_401_is_authentication() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/protected"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config_with_retries(&server.uri(), 3)).unwrap();

        let url = transport.build_url("/api/protected").unwrap();
        let result: ProscoutResult<TestResponse> = transport.get(url).await;
        assert!(matches!(
            result,
            Err(ProscoutError::Authentication { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_retries_on_503_then_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "recovered".to_string(),
                value: 3,
            }))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config_with_retries(&server.uri(), 3)).unwrap();

        let url = transport.build_url("/api/flaky").unwrap();
        let result: TestResponse = transport.get(url).await.unwrap();
        assert_eq!(result.message, "recovered");
    }

    #[tokio::test]
    async fn test_retries_exhausted_returns_last_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/down"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .expect(3)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config_with_retries(&server.uri(), 2)).unwrap();

        let url = transport.build_url("/api/down").unwrap();
        let result: ProscoutResult<TestResponse> = transport.get(url).await;
        assert!(matches!(result, Err(ProscoutError::Api { status: 502, .. })));
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/limited"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let url = transport.build_url("/api/limited").unwrap();
        let result: ProscoutResult<TestResponse> = transport.get(url).await;
        assert!(matches!(
            result,
            Err(ProscoutError::RateLimited {
                retry_after_secs: Some(7)
            })
        ));
    }

    #[tokio::test]
    async fn test_rate_limit_retry_waits_for_retry_after() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/limited"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/limited"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "ok".to_string(),
                value: 1,
            }))
            .expect(1)
            .mount(&server)
            .await;

        let config = Arc::new(ClientConfig {
            retry_config: RetryConfig {
                max_retries: 1,
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_secs(5),
                ..RetryConfig::default()
            },
            ..ClientConfig::new(Url::parse(&server.uri()).unwrap())
        });
        let transport = HttpTransport::new(config).unwrap();

        let started = std::time::Instant::now();
        let url = transport.build_url("/api/limited").unwrap();
        let result: TestResponse = transport.get(url).await.unwrap();

        assert_eq!(result.message, "ok");
        assert!(started.elapsed() >= Duration::from_millis(900));
    }

    #[tokio::test]
    async fn test_retry_after_is_capped_by_max_backoff() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/limited"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "120"))
            .expect(3)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config_with_retries(&server.uri(), 2)).unwrap();

        let started = std::time::Instant::now();
        let url = transport.build_url("/api/limited").unwrap();
        let result: ProscoutResult<TestResponse> = transport.get(url).await;

        assert!(matches!(
            result,
            Err(ProscoutError::RateLimited {
                retry_after_secs: Some(120)
            })
        ));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/garbled"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let url = transport.build_url("/api/garbled").unwrap();
        let result: ProscoutResult<TestResponse> = transport.get(url).await;
        assert!(matches!(result, Err(ProscoutError::Json(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(create_config(&format!("http://{}", addr))).unwrap();

        let url = transport.build_url("/api/search").unwrap();
        let result: ProscoutResult<TestResponse> = transport.get(url).await;
        let err = result.unwrap_err();
        assert!(matches!(err, ProscoutError::Http(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_build_url() {
        let transport = HttpTransport::new(create_config("http://localhost:8080")).unwrap();

        let url = transport.build_url("/api/test").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/test");
    }

    #[test]
    fn test_build_url_keeps_base_path() {
        let transport = HttpTransport::new(create_config("http://localhost:8080/v2/")).unwrap();

        let url = transport.build_url("api/test").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v2/api/test");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let transport = HttpTransport::new(create_config("http://localhost:8080")).unwrap();

        let url = transport
            .endpoint(&["api", "profiles", "jane doe/42"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/profiles/jane%20doe%2F42"
        );
    }
}
