//! Boundary fetcher backed by the Overpass API.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::convert::overpass_to_features;
use super::AreaQuery;
use crate::error::FetchError;
use crate::models::BoundaryFeature;

const USER_AGENT: &str = "townlands/0.1 (Irish census boundary fetcher)";

/// Why a fetch attempt should be retried after a cooldown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    /// HTTP 429 Too Many Requests
    RateLimited,
    /// HTTP 504 Gateway Timeout
    GatewayTimeout,
}

impl std::fmt::Display for RetryReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryReason::RateLimited => write!(f, "too many requests"),
            RetryReason::GatewayTimeout => write!(f, "gateway timeout"),
        }
    }
}

/// Non-fatal result of a single fetch attempt.
///
/// Fatal failures are carried by the `Err` side of the fetch `Result`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Payload converted; may still hold zero features
    Success(Vec<BoundaryFeature>),
    /// Payload could not be converted into features
    NoData(String),
    /// Service asked us to back off
    Retryable(RetryReason),
}

impl FetchOutcome {
    /// Classify a response status. `None` means the body should be converted.
    pub fn from_status(status: StatusCode) -> Option<Result<FetchOutcome, u16>> {
        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                Some(Ok(FetchOutcome::Retryable(RetryReason::RateLimited)))
            }
            StatusCode::GATEWAY_TIMEOUT => {
                Some(Ok(FetchOutcome::Retryable(RetryReason::GatewayTimeout)))
            }
            s if s.is_success() => None,
            s => Some(Err(s.as_u16())),
        }
    }

    /// Convert a successful response body
    pub fn from_body(query: &AreaQuery, body: &[u8]) -> FetchOutcome {
        match overpass_to_features(body) {
            Ok(features) => FetchOutcome::Success(features),
            Err(e) => {
                warn!(
                    "Failed to convert OSM JSON to GeoJSON for query '{}': {}",
                    query.to_overpass_ql().trim(),
                    e
                );
                FetchOutcome::NoData(e.to_string())
            }
        }
    }
}

/// Source of boundary features for an area query.
///
/// The Overpass client is the production implementation; tests substitute
/// scripted sources.
pub trait BoundarySource {
    fn fetch(
        &self,
        query: &AreaQuery,
    ) -> impl Future<Output = Result<FetchOutcome, FetchError>> + Send;
}

/// Overpass API client issuing form-encoded POST queries
#[derive(Clone)]
pub struct OverpassClient {
    client: Client,
    endpoint: String,
}

impl OverpassClient {
    /// Create a client with the given per-request transport timeout
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl BoundarySource for OverpassClient {
    async fn fetch(&self, query: &AreaQuery) -> Result<FetchOutcome, FetchError> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("data", &query.to_overpass_ql())
            .finish();

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=UTF-8",
            )
            .body(body)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "Overpass response received");

        // Response codes documented at http://overpass-api.de/command_line.html
        match FetchOutcome::from_status(status) {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(code)) => {
                let body = response.text().await.unwrap_or_default();
                Err(FetchError::Status { status: code, body })
            }
            None => {
                let bytes = response.bytes().await?;
                Ok(FetchOutcome::from_body(query, &bytes))
            }
        }
    }
}
