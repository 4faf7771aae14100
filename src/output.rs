//! GeoJSON FeatureCollection reading and writing.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry};
use tracing::{info, warn};

use crate::error::OutputError;
use crate::models::BoundaryFeature;

impl From<&BoundaryFeature> for Feature {
    fn from(feature: &BoundaryFeature) -> Self {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(geojson::Value::from(&feature.geometry))),
            id: None,
            properties: Some(feature.properties.clone()),
            foreign_members: None,
        }
    }
}

/// Convert a GeoJSON feature back into a boundary. Features without an
/// areal geometry yield `None`.
pub fn feature_to_boundary(feature: Feature) -> Option<BoundaryFeature> {
    let geometry: geo::Geometry<f64> = feature.geometry?.value.try_into().ok()?;

    let geometry = match geometry {
        geo::Geometry::MultiPolygon(mp) => mp,
        geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
        _ => return None,
    };

    Some(BoundaryFeature::new(
        geometry,
        feature.properties.unwrap_or_default(),
    ))
}

/// Write features as a single FeatureCollection, creating parent directories
pub fn write_collection(path: &Path, features: &[BoundaryFeature]) -> Result<(), OutputError> {
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let collection = FeatureCollection {
        bbox: None,
        features: features.iter().map(Feature::from).collect(),
        foreign_members: None,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &collection)?;
    writer.flush().map_err(io_err)?;

    info!("Wrote {} features to {}", features.len(), path.display());
    Ok(())
}

/// Read a FeatureCollection, skipping features without areal geometry
pub fn read_collection(path: &Path) -> Result<Vec<BoundaryFeature>, OutputError> {
    let content = fs::read_to_string(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let geojson: GeoJson = serde_json::from_str(&content).map_err(|source| OutputError::GeoJson {
        path: path.to_path_buf(),
        source,
    })?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(OutputError::NotACollection {
                path: path.to_path_buf(),
            })
        }
    };

    let total = collection.features.len();
    let features: Vec<BoundaryFeature> = collection
        .features
        .into_iter()
        .filter_map(feature_to_boundary)
        .collect();

    if features.len() < total {
        warn!(
            "Skipped {} non-areal features in {}",
            total - features.len(),
            path.display()
        );
    }

    info!("Loaded {} features from {}", features.len(), path.display());
    Ok(features)
}

/// Keep only features whose `county` property equals `county`
pub fn filter_by_county(features: &[BoundaryFeature], county: &str) -> Vec<BoundaryFeature> {
    features
        .iter()
        .filter(|f| f.county() == Some(county))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Properties;
    use geo::polygon;
    use serde_json::{json, Value};

    fn boundary(name: &str, county: &str) -> BoundaryFeature {
        let mut properties = Properties::new();
        properties.insert("name".into(), Value::from(name));
        properties.insert("admin_level".into(), Value::from("9"));
        properties.insert("county".into(), Value::from(county));
        let square = polygon![
            (x: -7.0, y: 54.0),
            (x: -6.9, y: 54.0),
            (x: -6.9, y: 54.1),
            (x: -7.0, y: 54.1),
            (x: -7.0, y: 54.0),
        ];
        BoundaryFeature::new(MultiPolygon::new(vec![square]), properties)
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("deds.geojson");
        let features = vec![
            boundary("Clogher", "County Tyrone"),
            boundary("Emyvale", "County Monaghan"),
        ];

        write_collection(&path, &features).unwrap();
        let loaded = read_collection(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name(), Some("Clogher"));
        assert_eq!(loaded[1].county(), Some("County Monaghan"));
        let keys: Vec<&str> = loaded[0].properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "admin_level", "county"]);
        assert_eq!(loaded[0].geometry, features[0].geometry);
    }

    #[test]
    fn test_written_file_is_feature_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("townlands.geojson");

        write_collection(&path, &[boundary("Clogher", "County Tyrone")]).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["type"], json!("FeatureCollection"));
        assert_eq!(raw["features"][0]["geometry"]["type"], json!("MultiPolygon"));
        assert_eq!(raw["features"][0]["properties"]["name"], json!("Clogher"));
    }

    #[test]
    fn test_non_areal_features_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.geojson");
        let content = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-7.0, 54.0] },
                    "properties": { "name": "Pin" }
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                    },
                    "properties": { "name": "Area" }
                }
            ]
        });
        fs::write(&path, content.to_string()).unwrap();

        let loaded = read_collection(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name(), Some("Area"));
    }

    #[test]
    fn test_not_a_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.geojson");
        fs::write(&path, r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#).unwrap();

        assert!(matches!(
            read_collection(&path),
            Err(OutputError::NotACollection { .. })
        ));
    }

    #[test]
    fn test_filter_by_county() {
        let features = vec![
            boundary("Clogher", "County Tyrone"),
            boundary("Emyvale", "County Monaghan"),
            boundary("Augher", "County Tyrone"),
        ];

        let tyrone = filter_by_county(&features, "County Tyrone");
        let names: Vec<_> = tyrone.iter().filter_map(|f| f.name()).collect();
        assert_eq!(names, vec!["Clogher", "Augher"]);
        assert!(filter_by_county(&features, "Tyrone").is_empty());
    }
}
