//! Connection API endpoints.

use crate::api::profiles::ensure_id;
use crate::client::ProscoutClient;
use crate::diagnostics::Invocation;
use crate::error::ProscoutResult;
use proscout_core::{Operation, ProfileId};
use serde::{Deserialize, Serialize};

const MUTUAL_PATH: &str = "/api/connections/mutual";

/// Connection API for relationships between two profiles.
pub struct ConnectionsApi<'a> {
    client: &'a ProscoutClient,
}

impl<'a> ConnectionsApi<'a> {
    pub(crate) fn new(client: &'a ProscoutClient) -> Self {
        Self { client }
    }

    /// Names of connections shared by `from` and `to`; empty on failure.
    pub async fn mutual(&self, from: &ProfileId, to: &ProfileId) -> Vec<String> {
        self.try_mutual(from, to).await.unwrap_or_default()
    }

    /// Names of connections shared by `from` and `to`, surfacing failures.
    pub async fn try_mutual(&self, from: &ProfileId, to: &ProfileId) -> ProscoutResult<Vec<String>> {
        let invocation =
            Invocation::start(self.client.observer(), Operation::MutualConnections, MUTUAL_PATH);

        let result: ProscoutResult<_> = async {
            ensure_id(from)?;
            ensure_id(to)?;
            let url = self.client.http.build_url(MUTUAL_PATH)?;
            let response: MutualConnectionsResponse = self
                .client
                .http
                .get_with_query(url, &[("from", from.as_str()), ("to", to.as_str())])
                .await?;
            Ok(response.connections)
        }
        .await;

        match &result {
            Ok(names) => invocation.completed(names.len(), names.len() as u64),
            Err(err) => invocation.failed(err),
        }
        result
    }
}

/// Raw mutual-connections response from the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MutualConnectionsResponse {
    #[serde(default, alias = "mutual_connections", alias = "mutualConnections")]
    pub connections: Vec<String>,
}
