//! Conversion of Overpass JSON (`[out:json]`) into boundary features.
//!
//! Only relations become features. Their member ways are resolved to node
//! coordinates, stitched into rings and assembled into a multipolygon.
//! Ways and nodes appear in the payload purely as geometry sources.

use geo::{Coord, MultiPolygon};
use hashbrown::HashMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ConvertError;
use crate::models::{BoundaryFeature, Properties, TAGS_KEY};
use crate::pip::{assemble_polygons, merge_segments_into_rings};

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Element {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
    },
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
    },
    Relation {
        id: i64,
        #[serde(default)]
        members: Vec<Member>,
        #[serde(default)]
        tags: Properties,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Member {
    #[serde(rename = "type")]
    member_type: String,
    #[serde(rename = "ref")]
    reference: i64,
    #[serde(default)]
    role: String,
}

/// Parse an Overpass response body and build one feature per relation that
/// resolves to at least one closed outer ring.
///
/// Each feature carries `type`, `id` and the nested `tags` object.
pub fn overpass_to_features(body: &[u8]) -> Result<Vec<BoundaryFeature>, ConvertError> {
    let response: OverpassResponse = serde_json::from_slice(body)?;

    let mut nodes: HashMap<i64, Coord<f64>> = HashMap::new();
    let mut ways: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut relations = Vec::new();

    for element in response.elements {
        match element {
            Element::Node { id, lat, lon } => {
                nodes.insert(id, Coord { x: lon, y: lat });
            }
            Element::Way { id, nodes: refs } => {
                ways.insert(id, refs);
            }
            Element::Relation { id, members, tags } => relations.push((id, members, tags)),
            Element::Other => {}
        }
    }

    debug!(
        "Overpass payload: {} relations, {} ways, {} nodes",
        relations.len(),
        ways.len(),
        nodes.len()
    );

    let mut features = Vec::with_capacity(relations.len());

    for (id, members, tags) in relations {
        let mut outer_segments = Vec::new();
        let mut inner_segments = Vec::new();

        for member in members.iter().filter(|m| m.member_type == "way") {
            let refs = ways.get(&member.reference).ok_or(ConvertError::MissingWay {
                relation: id,
                way: member.reference,
            })?;

            let coords: Vec<Coord<f64>> = refs.iter().filter_map(|n| nodes.get(n).copied()).collect();

            match member.role.as_str() {
                "outer" | "" => outer_segments.push(coords),
                "inner" => inner_segments.push(coords),
                _ => {}
            }
        }

        let outers = merge_segments_into_rings(outer_segments);
        if outers.is_empty() {
            debug!("Relation {} has no closed outer ring, skipping", id);
            continue;
        }
        let inners = merge_segments_into_rings(inner_segments);

        let mut properties = Properties::new();
        properties.insert("type".to_string(), Value::String("relation".to_string()));
        properties.insert("id".to_string(), Value::from(id));
        properties.insert(TAGS_KEY.to_string(), Value::Object(tags));

        features.push(BoundaryFeature::new(
            MultiPolygon::new(assemble_polygons(outers, inners)),
            properties,
        ));
    }

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;
    use serde_json::json;

    fn square_relation_payload() -> Value {
        json!({
            "version": 0.6,
            "generator": "Overpass API",
            "elements": [
                {
                    "type": "relation",
                    "id": 100,
                    "members": [
                        { "type": "way", "ref": 10, "role": "outer" },
                        { "type": "way", "ref": 11, "role": "outer" },
                        { "type": "way", "ref": 12, "role": "inner" },
                        { "type": "node", "ref": 1, "role": "admin_centre" }
                    ],
                    "tags": {
                        "admin_level": "9",
                        "boundary": "administrative",
                        "name": "Kilcommon",
                        "type": "boundary"
                    }
                },
                { "type": "way", "id": 10, "nodes": [1, 2, 3] },
                { "type": "way", "id": 11, "nodes": [3, 4, 1] },
                { "type": "way", "id": 12, "nodes": [5, 6, 7, 8, 5] },
                { "type": "node", "id": 1, "lat": 0.0, "lon": 0.0 },
                { "type": "node", "id": 2, "lat": 0.0, "lon": 10.0 },
                { "type": "node", "id": 3, "lat": 10.0, "lon": 10.0 },
                { "type": "node", "id": 4, "lat": 10.0, "lon": 0.0 },
                { "type": "node", "id": 5, "lat": 4.0, "lon": 4.0 },
                { "type": "node", "id": 6, "lat": 4.0, "lon": 6.0 },
                { "type": "node", "id": 7, "lat": 6.0, "lon": 6.0 },
                { "type": "node", "id": 8, "lat": 6.0, "lon": 4.0 }
            ]
        })
    }

    #[test]
    fn test_relation_becomes_feature() {
        let body = serde_json::to_vec(&square_relation_payload()).unwrap();
        let features = overpass_to_features(&body).unwrap();

        assert_eq!(features.len(), 1);
        let feature = &features[0];
        assert_eq!(feature.properties["type"], json!("relation"));
        assert_eq!(feature.properties["id"], json!(100));
        assert_eq!(feature.properties["tags"]["name"], json!("Kilcommon"));

        assert_eq!(feature.geometry.0.len(), 1);
        assert_eq!(feature.geometry.0[0].interiors().len(), 1);
        assert!((feature.geometry.unsigned_area() - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_open_relation_skipped() {
        let payload = json!({
            "elements": [
                {
                    "type": "relation",
                    "id": 1,
                    "members": [{ "type": "way", "ref": 10, "role": "outer" }],
                    "tags": { "name": "Broken" }
                },
                { "type": "way", "id": 10, "nodes": [1, 2] },
                { "type": "node", "id": 1, "lat": 0.0, "lon": 0.0 },
                { "type": "node", "id": 2, "lat": 1.0, "lon": 1.0 }
            ]
        });
        let body = serde_json::to_vec(&payload).unwrap();

        assert!(overpass_to_features(&body).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_elements_ignored() {
        let body = br#"{"elements": [{"type": "area", "id": 3600000001}]}"#;
        assert!(overpass_to_features(body).unwrap().is_empty());
    }

    #[test]
    fn test_missing_way_is_error() {
        let payload = json!({
            "elements": [{
                "type": "relation",
                "id": 7,
                "members": [{ "type": "way", "ref": 99, "role": "outer" }],
                "tags": {}
            }]
        });
        let body = serde_json::to_vec(&payload).unwrap();

        assert!(matches!(
            overpass_to_features(&body),
            Err(ConvertError::MissingWay { relation: 7, way: 99 })
        ));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            overpass_to_features(b"<html>rate limited</html>"),
            Err(ConvertError::Json(_))
        ));
        assert!(overpass_to_features(br#"{"remark": "no elements"}"#).is_err());
    }
}
