//! Townland → DED spatial join.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::ParentIndex;
use crate::models::{BoundaryFeature, COUNTY_KEY, DED_KEY, NAME_KEY};

/// Attach each child to the first parent containing the child's centroid.
///
/// Matched children gain `county` (the parent's county) and `ded` (the
/// parent's name). Children with no containing parent are left out of the
/// result. Parents are tried in the order given; the first hit wins even
/// when parents overlap.
pub fn join_to_parents(
    children: Vec<BoundaryFeature>,
    parents: &[BoundaryFeature],
) -> Vec<BoundaryFeature> {
    if parents.is_empty() {
        warn!(
            "No parent boundaries to match against; dropping {} features",
            children.len()
        );
        return Vec::new();
    }

    let index = ParentIndex::build(parents);
    let total = children.len();
    let mut output = Vec::with_capacity(total);

    for mut child in children {
        let centroid = match child.centroid() {
            Some(p) => p,
            None => {
                debug!("Skipping feature {:?} with degenerate geometry", child.name());
                continue;
            }
        };

        let parent = match index.first_containing(&centroid) {
            Some(parent) => parent,
            None => {
                debug!(
                    "No parent contains centroid ({}, {}) of {:?}",
                    centroid.x(),
                    centroid.y(),
                    child.name()
                );
                continue;
            }
        };

        let county = parent
            .properties
            .get(COUNTY_KEY)
            .cloned()
            .unwrap_or(Value::Null);
        let ded = parent
            .properties
            .get(NAME_KEY)
            .cloned()
            .unwrap_or(Value::Null);

        child.properties.insert(COUNTY_KEY.to_string(), county);
        child.properties.insert(DED_KEY.to_string(), ded);
        output.push(child);
    }

    info!(
        "Matched {} of {} features to {} parents",
        output.len(),
        total,
        parents.len()
    );

    output
}
