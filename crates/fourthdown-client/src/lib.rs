//! Client for the fourth-down decision service.

use async_trait::async_trait;
use fourthdown_types::{
    game::GameState, recommendation::Recommendation, FourthDownError, Result,
};
use reqwest::{Client, Request};
use tracing::{debug, warn};

pub const RECOMMEND_PATH: &str = "/v1/recommend";
/// Shown when the underlying failure carries no message of its own.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Request failed";

#[async_trait]
pub trait RecommendationClient: Send + Sync {
    async fn recommend(&self, state: &GameState) -> Result<Recommendation>;
}

/// HTTP implementation. Performs no retries and sets no timeout of its own.
#[derive(Clone)]
pub struct HttpRecommendationClient {
    client: Client,
    base_url: String,
}

impl HttpRecommendationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the outbound GET without sending it.
    pub fn build_request(&self, state: &GameState) -> Result<Request> {
        self.client
            .get(format!("{}{}", self.base_url, RECOMMEND_PATH))
            .query(&state.query_pairs())
            .build()
            .map_err(request_failure)
    }
}

#[async_trait]
impl RecommendationClient for HttpRecommendationClient {
    async fn recommend(&self, state: &GameState) -> Result<Recommendation> {
        let request = self.build_request(state)?;
        debug!(url = %request.url(), "requesting recommendation");

        let response = self
            .client
            .execute(request)
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(request_failure)?;
        let body = response.bytes().await.map_err(request_failure)?;

        serde_json::from_slice(&body).map_err(|err| {
            warn!("decision service returned an unreadable body: {err}");
            failure_message(format!("invalid response body: {err}"))
        })
    }
}

fn request_failure(err: reqwest::Error) -> FourthDownError {
    warn!("recommendation request failed: {err}");
    failure_message(err.to_string())
}

/// Wrap a transport message, substituting the fallback text when it is empty.
pub fn failure_message(message: impl Into<String>) -> FourthDownError {
    let message = message.into();
    if message.trim().is_empty() {
        FourthDownError::Request(FALLBACK_FAILURE_MESSAGE.into())
    } else {
        FourthDownError::Request(message)
    }
}
