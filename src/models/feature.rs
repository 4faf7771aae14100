//! Boundary feature: one areal geometry plus its property map.

use geo::{BoundingRect, Centroid, MultiPolygon, Point};
use serde_json::Value;

/// Insertion-ordered property map (serde_json is built with `preserve_order`).
///
/// Inserting a key that already exists overwrites the value in place and keeps
/// the key's original position.
pub type Properties = serde_json::Map<String, Value>;

/// Property holding the nested OSM tag mapping before normalization
pub const TAGS_KEY: &str = "tags";
/// Property naming the county a feature belongs to
pub const COUNTY_KEY: &str = "county";
/// OSM `name` tag, promoted to a top-level property
pub const NAME_KEY: &str = "name";
/// Property naming the DED a townland was joined to
pub const DED_KEY: &str = "ded";

/// A single polygon or multipolygon boundary with metadata.
///
/// Polygons are stored as one-member multipolygons so every feature can be
/// used for containment tests.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub geometry: MultiPolygon<f64>,
    pub properties: Properties,
}

impl BoundaryFeature {
    pub fn new(geometry: MultiPolygon<f64>, properties: Properties) -> Self {
        Self {
            geometry,
            properties,
        }
    }

    /// Area-weighted centroid, `None` for degenerate geometry
    pub fn centroid(&self) -> Option<Point<f64>> {
        self.geometry.centroid()
    }

    /// Get the bounding box of this boundary
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        self.geometry
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    /// String value of a top-level property
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.property_str(NAME_KEY)
    }

    pub fn county(&self) -> Option<&str> {
        self.property_str(COUNTY_KEY)
    }
}
