//! Point-in-Polygon (PIP) joining of child boundaries onto parents.
//!
//! Townlands are matched to their enclosing DED by testing each townland's
//! centroid against the DED polygons, using an R-tree to skip parents whose
//! bounding box cannot contain the point.

pub mod geometry;
mod index;
mod join;

pub use geometry::{assemble_polygons, merge_segments_into_rings};
pub use index::ParentIndex;
pub use join::join_to_parents;
