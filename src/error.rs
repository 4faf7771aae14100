//! Error types shared by the fetch, normalize and output stages.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures talking to the boundary service.
///
/// Rate limiting and gateway timeouts are not errors; they surface as
/// [`crate::overpass::FetchOutcome::Retryable`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-success status other than 429/504.
    #[error("Overpass returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection, timeout or body read failure.
    #[error("Overpass request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Failed to create the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

/// Overpass payload could not be turned into boundary features.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Invalid Overpass JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Relation {relation} references unknown way {way}")]
    MissingWay { relation: i64, way: i64 },
}

/// A feature could not have its tags promoted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Feature has no '{}' property", crate::models::TAGS_KEY)]
    MissingTags,

    #[error("Feature '{}' property is not an object", crate::models::TAGS_KEY)]
    TagsNotAnObject,
}

/// Failures fetching county metadata from the census API.
#[derive(Debug, Error)]
pub enum CensusError {
    #[error("Census API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Census API returned HTTP {0}")]
    Status(u16),

    #[error("Census API error: {0}")]
    GraphQl(String),

    #[error("Unexpected census API response shape: {0}")]
    Shape(String),
}

/// Failures reading or writing GeoJSON collections.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Invalid GeoJSON in {}: {source}", path.display())]
    GeoJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{} does not contain a FeatureCollection", path.display())]
    NotACollection { path: PathBuf },

    #[error("Failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),
}
