//! Sequential drivers tying the fetch, normalize and join stages together.

use indicatif::ProgressBar;
use tracing::{info, info_span, warn, Instrument};

use crate::config::Config;
use crate::error::FetchError;
use crate::models::BoundaryFeature;
use crate::normalize::{normalize_feature, promote_tags};
use crate::output::filter_by_county;
use crate::overpass::{fetch_with_retry, BoundarySource};
use crate::pip::join_to_parents;

/// Fetch and normalize DEDs for every county, one county at a time.
///
/// Counties without data are logged and skipped. The pacing delay is applied
/// between counties whatever the previous county's outcome, but not after the
/// final county since no request follows it. A fatal fetch error aborts the
/// whole run and discards everything gathered so far.
pub async fn fetch_deds<S: BoundarySource>(
    source: &S,
    counties: &[String],
    config: &Config,
    progress: &ProgressBar,
) -> Result<Vec<BoundaryFeature>, FetchError> {
    let policy = config.retry_policy();
    let mut output = Vec::new();

    for (i, county) in counties.iter().enumerate() {
        let span = info_span!("county", name = %county);

        async {
            let query = config.ded_query(county);
            match fetch_with_retry(source, &query, &policy).await? {
                Some(features) => {
                    info!("Processing DED data for {}", county);
                    output.extend(normalize_all(features, county));
                }
                None => warn!("No DED data received for {}", county),
            }
            Ok::<_, FetchError>(())
        }
        .instrument(span)
        .await?;

        progress.inc(1);

        if i + 1 < counties.len() {
            info!("Pausing for {:?}", config.pacing());
            tokio::time::sleep(config.pacing()).await;
        }
    }

    Ok(output)
}

/// Fetch one county's townlands and join each to its DED.
///
/// `deds` may hold every county's DEDs; only those stamped with `county` are
/// used as join candidates.
pub async fn fetch_townlands<S: BoundarySource>(
    source: &S,
    county: &str,
    deds: &[BoundaryFeature],
    config: &Config,
) -> Result<Vec<BoundaryFeature>, FetchError> {
    let span = info_span!("county", name = %county);

    async {
        let parents = filter_by_county(deds, county);
        if parents.is_empty() {
            warn!("No DEDs loaded for {}", county);
        }

        let query = config.townland_query(county);
        let townlands = match fetch_with_retry(source, &query, &config.retry_policy()).await? {
            Some(features) => features,
            None => {
                warn!("No townland data received for {}", county);
                return Ok(Vec::new());
            }
        };

        info!("Processing townland data for {}", county);
        let townlands: Vec<BoundaryFeature> = townlands
            .into_iter()
            .filter_map(|mut feature| match promote_tags(&mut feature.properties) {
                Ok(()) => Some(feature),
                Err(e) => {
                    warn!("Skipping townland: {}", e);
                    None
                }
            })
            .collect();

        Ok::<_, FetchError>(join_to_parents(townlands, &parents))
    }
    .instrument(span)
    .await
}

fn normalize_all(features: Vec<BoundaryFeature>, county: &str) -> Vec<BoundaryFeature> {
    features
        .into_iter()
        .filter_map(|mut feature| match normalize_feature(&mut feature, county) {
            Ok(()) => Some(feature),
            Err(e) => {
                warn!("Skipping feature in {}: {}", county, e);
                None
            }
        })
        .collect()
}
