//! Spatial index over candidate parent boundaries.

use geo::{Contains, Point};
use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

use crate::models::BoundaryFeature;

/// R-tree entry pointing back at a parent by its input position
#[derive(Clone)]
struct IndexedParent {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedParent {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Bounding-box index over a parent slice that answers "first parent in input
/// order containing this point".
pub struct ParentIndex<'a> {
    parents: &'a [BoundaryFeature],
    tree: RTree<IndexedParent>,
}

impl<'a> ParentIndex<'a> {
    /// Build index from parent boundaries
    pub fn build(parents: &'a [BoundaryFeature]) -> Self {
        let indexed: Vec<IndexedParent> = parents
            .iter()
            .enumerate()
            .filter_map(|(position, parent)| {
                let (min_x, min_y, max_x, max_y) = parent.bbox()?;
                Some(IndexedParent {
                    position,
                    envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
                })
            })
            .collect();

        if indexed.len() < parents.len() {
            debug!(
                "{} parent(s) have empty geometry and will never match",
                parents.len() - indexed.len()
            );
        }

        Self {
            parents,
            tree: RTree::bulk_load(indexed),
        }
    }

    /// Find the first parent, in input order, whose polygon contains the point.
    ///
    /// Points on a parent's boundary are not contained.
    pub fn first_containing(&self, point: &Point<f64>) -> Option<&'a BoundaryFeature> {
        let query_envelope = AABB::from_point([point.x(), point.y()]);

        // R-tree order is arbitrary, so restore input order before testing
        let mut candidates: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query_envelope)
            .map(|ip| ip.position)
            .collect();
        candidates.sort_unstable();

        let parents = self.parents;
        candidates
            .into_iter()
            .map(|position| &parents[position])
            .find(|parent| parent.geometry.contains(point))
    }
}
