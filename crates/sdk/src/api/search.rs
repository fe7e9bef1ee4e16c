//! Search API endpoints.

use crate::client::ProscoutClient;
use crate::diagnostics::Invocation;
use crate::error::ProscoutResult;
use proscout_core::{deserialize_millis, Operation, ProfileRecord, SearchQuery, SearchResult};
use serde::{Deserialize, Serialize};

const SEARCH_PATH: &str = "/api/search";

/// Search API for querying profiles.
pub struct SearchApi<'a> {
    client: &'a ProscoutClient,
}

impl<'a> SearchApi<'a> {
    pub(crate) fn new(client: &'a ProscoutClient) -> Self {
        Self { client }
    }

    /// Run a search over HTTP, degrading every failure to an empty result.
    ///
    /// Failures are reported to the client's observer, with the HTTP status
    /// when one was received. Use [`SearchApi::try_execute`] to tell "no
    /// matches" apart from rejected credentials.
    pub async fn execute(&self, query: &SearchQuery) -> SearchResult {
        let invocation = Invocation::start(self.client.observer(), Operation::Search, SEARCH_PATH);

        match self.fetch(query, &invocation).await {
            Ok(result) => {
                invocation.completed(result.len(), result.total_count);
                result
            }
            Err(err) => {
                invocation.failed(&err);
                SearchResult::empty(invocation.elapsed())
            }
        }
    }

    /// Run a search over HTTP, surfacing failures as typed errors.
    pub async fn try_execute(&self, query: &SearchQuery) -> ProscoutResult<SearchResult> {
        let invocation = Invocation::start(self.client.observer(), Operation::Search, SEARCH_PATH);

        let result = self.fetch(query, &invocation).await;
        match &result {
            Ok(result) => invocation.completed(result.len(), result.total_count),
            Err(err) => invocation.failed(err),
        }
        result
    }

    /// Run a search over a dedicated WebSocket channel.
    pub async fn stream(&self, query: &SearchQuery) -> ProscoutResult<SearchResult> {
        self.client.streaming().search(query).await
    }

    async fn fetch(
        &self,
        query: &SearchQuery,
        invocation: &Invocation<'_>,
    ) -> ProscoutResult<SearchResult> {
        let url = self.client.http.build_url(SEARCH_PATH)?;
        let params = query.to_query_params()?;

        let response: SearchResponse = self.client.http.get_with_query(url, &params).await?;

        Ok(SearchResult::normalize(
            response.results,
            response.total_count,
            response.execution_time,
            query.max_results(),
            invocation.elapsed(),
        ))
    }
}

/// Raw search response from the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, alias = "profiles")]
    pub results: Vec<ProfileRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "totalCount")]
    pub total_count: Option<u64>,
    /// Server-side execution time in milliseconds.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "executionTime",
        deserialize_with = "deserialize_millis"
    )]
    pub execution_time: Option<u64>,
}
