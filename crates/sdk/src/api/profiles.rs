//! Profile API endpoints.

use crate::client::ProscoutClient;
use crate::diagnostics::Invocation;
use crate::error::{ProscoutError, ProscoutResult};
use proscout_core::{Operation, ProfileId, ProfileMatch, ProfileRecord};
use serde::{Deserialize, Serialize};

/// Profile API for single-profile lookups and match suggestions.
pub struct ProfilesApi<'a> {
    client: &'a ProscoutClient,
}

impl<'a> ProfilesApi<'a> {
    pub(crate) fn new(client: &'a ProscoutClient) -> Self {
        Self { client }
    }

    /// Fetch a profile by id; `None` when missing or on any failure.
    pub async fn get(&self, id: &ProfileId) -> Option<ProfileRecord> {
        self.try_get(id).await.ok()
    }

    /// Fetch a profile by id, surfacing failures.
    pub async fn try_get(&self, id: &ProfileId) -> ProscoutResult<ProfileRecord> {
        let invocation = Invocation::start(
            self.client.observer(),
            Operation::GetProfile,
            format!("/api/profiles/{}", id),
        );

        let result: ProscoutResult<_> = async {
            ensure_id(id)?;
            let url = self.client.http.endpoint(&["api", "profiles", id.as_str()])?;
            self.client.http.get::<ProfileRecord>(url).await
        }
        .await;

        match &result {
            Ok(_) => invocation.completed(1, 1),
            Err(err) => invocation.failed(err),
        }
        result
    }

    /// Profiles the service suggests for `id`, best first; empty on failure.
    pub async fn matches(&self, id: &ProfileId, limit: usize) -> Vec<ProfileMatch> {
        self.try_matches(id, limit).await.unwrap_or_default()
    }

    /// Profiles the service suggests for `id`, surfacing failures.
    pub async fn try_matches(&self, id: &ProfileId, limit: usize) -> ProscoutResult<Vec<ProfileMatch>> {
        let invocation = Invocation::start(
            self.client.observer(),
            Operation::ProfileMatches,
            format!("/api/profiles/{}/matches", id),
        );

        let result: ProscoutResult<_> = async {
            ensure_id(id)?;
            if limit == 0 {
                return Err(ProscoutError::InvalidInput(
                    "limit must be at least 1".to_string(),
                ));
            }
            let url = self
                .client
                .http
                .endpoint(&["api", "profiles", id.as_str(), "matches"])?;
            let response: MatchesResponse = self
                .client
                .http
                .get_with_query(url, &[("limit", limit.to_string())])
                .await?;

            let mut matches = response.matches;
            matches.truncate(limit);
            Ok(matches)
        }
        .await;

        match &result {
            Ok(matches) => invocation.completed(matches.len(), matches.len() as u64),
            Err(err) => invocation.failed(err),
        }
        result
    }
}

pub(crate) fn ensure_id(id: &ProfileId) -> ProscoutResult<()> {
    if id.is_empty() {
        return Err(ProscoutError::InvalidInput(
            "profile id must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Raw match response from the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchesResponse {
    #[serde(default, alias = "results")]
    pub matches: Vec<ProfileMatch>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use proscout_core::{FailureKind, RecordingObserver, SearchEventKind};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> (ProscoutClient, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::new());
        let client = ProscoutClient::builder()
            .base_url(server.uri())
            .api_key("sk-test")
            .retry_config(RetryConfig::no_retry())
            .observer(observer.clone())
            .build()
            .unwrap();
        (client, observer)
    }

    #[tokio::test]
    async fn test_get_profile() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/profiles/p-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "p-42",
                "name": "Katherine Johnson",
                "skills": ["orbital mechanics"],
                "education": [{"school": "West Virginia State", "degree": "BS"}]
            })))
            .mount(&server)
            .await;

        let (client, _) = client(&server);
        let profile = client.profiles().get(&ProfileId::new("p-42")).await.unwrap();

        assert_eq!(profile.name, "Katherine Johnson");
        assert_eq!(profile.skills, vec!["orbital mechanics".to_string()]);
        assert_eq!(profile.education[0].degree.as_deref(), Some("BS"));
    }

    #[tokio::test]
    async fn test_get_missing_profile_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/profiles/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
            .mount(&server)
            .await;

        let (client, observer) = client(&server);
        assert!(client.profiles().get(&ProfileId::new("ghost")).await.is_none());

        let err = client
            .profiles()
            .try_get(&ProfileId::new("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProscoutError::NotFound(_)));
        assert_eq!(observer.failures().len(), 2);
    }

    #[tokio::test]
    async fn test_get_rejects_blank_id_without_request() {
        let server = MockServer::start().await;
        let (client, observer) = client(&server);

        let err = client
            .profiles()
            .try_get(&ProfileId::new(""))
            .await
            .unwrap_err();

        assert!(matches!(err, ProscoutError::InvalidInput(_)));
        assert!(matches!(
            observer.failures()[0].kind,
            SearchEventKind::RequestFailed {
                failure: FailureKind::Configuration,
                ..
            }
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_matches_in_server_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/profiles/p-1/matches"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matches": [
                    {"profile": {"id": "p-7", "name": "A"}, "score": 0.91, "reasons": ["same school"]},
                    {"profile": {"id": "p-3", "name": "B"}, "score": 0.72}
                ]
            })))
            .mount(&server)
            .await;

        let (client, _) = client(&server);
        let matches = client.profiles().matches(&ProfileId::new("p-1"), 2).await;

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].profile.id.as_str(), "p-7");
        assert_eq!(matches[0].reasons, vec!["same school".to_string()]);
        assert!(matches[1].reasons.is_empty());
    }

    #[tokio::test]
    async fn test_matches_failure_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/profiles/p-1/matches"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (client, observer) = client(&server);
        let matches = client.profiles().matches(&ProfileId::new("p-1"), 5).await;

        assert!(matches.is_empty());
        assert_eq!(observer.failures().len(), 1);
    }
}
