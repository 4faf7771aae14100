//! Bounded retry around a [`BoundarySource`].

use std::time::Duration;

use tracing::{info, info_span, warn, Instrument};

use super::{AreaQuery, BoundarySource, FetchOutcome};
use crate::error::FetchError;
use crate::models::BoundaryFeature;

/// Attempt budget and cooldown applied to one area query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Pause after a 429/504 response before the next attempt
    pub cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            cooldown: Duration::from_secs(600),
        }
    }
}

/// Fetch `query` until a non-empty feature set comes back or the attempt
/// budget runs out.
///
/// * rate-limit / gateway-timeout responses wait `policy.cooldown` first
///   (no wait follows the last attempt)
/// * unconvertible or empty payloads are retried immediately
/// * fatal transport errors are returned as-is
///
/// Returns `Ok(None)` when every attempt came back without data.
pub async fn fetch_with_retry<S: BoundarySource>(
    source: &S,
    query: &AreaQuery,
    policy: &RetryPolicy,
) -> Result<Option<Vec<BoundaryFeature>>, FetchError> {
    let span = info_span!(
        "fetch",
        area = %query.area_name,
        admin_level = query.admin_level.to_osm_level()
    );

    async move {
        for attempt in 1..=policy.max_attempts {
            info!(
                "Querying Overpass for {} {} (attempt {}/{})",
                query.area_name,
                query.admin_level.label(),
                attempt,
                policy.max_attempts
            );

            match source.fetch(query).await? {
                FetchOutcome::Success(features) if !features.is_empty() => {
                    info!("Received {} features", features.len());
                    return Ok(Some(features));
                }
                FetchOutcome::Success(_) => {
                    warn!("No features found in OSM data for {}", query.area_name);
                }
                FetchOutcome::NoData(reason) => {
                    warn!("Attempt {} returned no usable data: {}", attempt, reason);
                }
                FetchOutcome::Retryable(reason) => {
                    if attempt < policy.max_attempts {
                        info!(
                            "Received {} response from Overpass, waiting {:?}",
                            reason, policy.cooldown
                        );
                        tokio::time::sleep(policy.cooldown).await;
                    } else {
                        warn!("Received {} response on final attempt", reason);
                    }
                }
            }
        }

        warn!(
            "No {} data received for {} after {} attempts",
            query.admin_level.label(),
            query.area_name,
            policy.max_attempts
        );
        Ok(None)
    }
    .instrument(span)
    .await
}
