//! Introduction API endpoints.

use crate::api::profiles::ensure_id;
use crate::client::ProscoutClient;
use crate::diagnostics::Invocation;
use crate::error::{ProscoutError, ProscoutResult};
use proscout_core::{IntroductionRequest, Operation};

const INTRODUCTIONS_PATH: &str = "/api/introductions";

/// Introduction API for asking one profile to be introduced to another.
pub struct IntroductionsApi<'a> {
    client: &'a ProscoutClient,
}

impl<'a> IntroductionsApi<'a> {
    pub(crate) fn new(client: &'a ProscoutClient) -> Self {
        Self { client }
    }

    /// Submit an introduction request; `false` on any failure.
    pub async fn request(&self, request: &IntroductionRequest) -> bool {
        self.try_request(request).await.is_ok()
    }

    /// Submit an introduction request, surfacing failures.
    pub async fn try_request(&self, request: &IntroductionRequest) -> ProscoutResult<()> {
        let invocation = Invocation::start(
            self.client.observer(),
            Operation::RequestIntroduction,
            INTRODUCTIONS_PATH,
        );

        let result: ProscoutResult<_> = async {
            ensure_id(&request.from_id)?;
            ensure_id(&request.to_id)?;
            if request.from_id == request.to_id {
                return Err(ProscoutError::InvalidInput(
                    "cannot introduce a profile to itself".to_string(),
                ));
            }
            let url = self.client.http.build_url(INTRODUCTIONS_PATH)?;
            self.client.http.post_no_response(url, request).await
        }
        .await;

        match &result {
            Ok(()) => invocation.completed(0, 0),
            Err(err) => invocation.failed(err),
        }
        result
    }
}
