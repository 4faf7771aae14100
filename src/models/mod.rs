//! Core data models for boundary fetching and joining.

pub mod admin;
pub mod feature;

pub use admin::AdminLevel;
pub use feature::{BoundaryFeature, Properties, COUNTY_KEY, DED_KEY, NAME_KEY, TAGS_KEY};
