//! Promotion of nested OSM tags into top-level feature properties.

use serde_json::Value;

use crate::error::NormalizeError;
use crate::models::{BoundaryFeature, Properties, COUNTY_KEY, TAGS_KEY};

/// Move every entry of the nested `tags` object up into `properties`.
///
/// Tag values overwrite existing properties with the same key. The `tags`
/// property is removed. Fails without touching `properties` when `tags` is
/// absent or not an object.
pub fn promote_tags(properties: &mut Properties) -> Result<(), NormalizeError> {
    match properties.get(TAGS_KEY) {
        Some(Value::Object(_)) => {}
        Some(_) => return Err(NormalizeError::TagsNotAnObject),
        None => return Err(NormalizeError::MissingTags),
    }

    // shift_remove keeps the remaining keys in their original order
    if let Some(Value::Object(tags)) = properties.shift_remove(TAGS_KEY) {
        for (key, value) in tags {
            properties.insert(key, value);
        }
    }

    Ok(())
}

/// Promote tags, then stamp the feature with the county it was fetched for.
///
/// The supplied county label takes precedence over any `county` tag.
pub fn normalize_feature(feature: &mut BoundaryFeature, county: &str) -> Result<(), NormalizeError> {
    promote_tags(&mut feature.properties)?;
    feature
        .properties
        .insert(COUNTY_KEY.to_string(), Value::String(county.to_string()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::MultiPolygon;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_tags_promoted_and_removed() {
        let mut properties = props(json!({
            "type": "relation",
            "id": 123,
            "tags": { "name": "Ballymore", "admin_level": "9", "boundary": "administrative" }
        }));

        promote_tags(&mut properties).unwrap();

        assert!(!properties.contains_key("tags"));
        assert_eq!(properties["name"], json!("Ballymore"));
        assert_eq!(properties["admin_level"], json!("9"));
        assert_eq!(properties["boundary"], json!("administrative"));
        assert_eq!(properties["id"], json!(123));

        let keys: Vec<&str> = properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["type", "id", "name", "admin_level", "boundary"]);
    }

    #[test]
    fn test_tag_overwrites_existing_property() {
        let mut properties = props(json!({
            "id": 1,
            "type": "relation",
            "tags": { "type": "boundary" }
        }));

        promote_tags(&mut properties).unwrap();

        assert_eq!(properties["type"], json!("boundary"));
        // Overwritten key keeps its slot
        let keys: Vec<&str> = properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "type"]);
    }

    #[test]
    fn test_missing_tags_is_error() {
        let mut properties = props(json!({ "name": "Already flat" }));
        let before = properties.clone();

        assert_eq!(promote_tags(&mut properties), Err(NormalizeError::MissingTags));
        assert_eq!(properties, before);
    }

    #[test]
    fn test_non_object_tags_is_error() {
        let mut properties = props(json!({ "tags": "name=Foo" }));
        assert_eq!(promote_tags(&mut properties), Err(NormalizeError::TagsNotAnObject));
    }

    #[test]
    fn test_county_label_overrides_county_tag() {
        let mut feature = BoundaryFeature::new(
            MultiPolygon::new(vec![]),
            props(json!({ "tags": { "name": "Kilbride", "county": "Wicklow" } })),
        );

        normalize_feature(&mut feature, "County Wicklow").unwrap();

        assert_eq!(feature.county(), Some("County Wicklow"));
        assert_eq!(feature.name(), Some("Kilbride"));
        assert_eq!(feature.properties.len(), 2);
        assert!(!feature.properties.contains_key("tags"));
    }

    #[test]
    fn test_normalize_twice_fails_second_time() {
        let mut feature = BoundaryFeature::new(
            MultiPolygon::new(vec![]),
            props(json!({ "tags": { "name": "Kilbride" } })),
        );

        normalize_feature(&mut feature, "County Meath").unwrap();
        let after_first = feature.clone();

        assert!(normalize_feature(&mut feature, "County Meath").is_err());
        assert_eq!(feature, after_first);
    }
}
