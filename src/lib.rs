//! Townlands - Irish DED and townland boundaries from OpenStreetMap
//!
//! This library provides shared types and modules for the `deds` and
//! `townlands` binaries: Overpass fetching with rate-limit backoff, tag
//! normalization and the townland → DED point-in-polygon join.

pub mod census;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod output;
pub mod overpass;
pub mod pip;
pub mod pipeline;

pub use models::{AdminLevel, BoundaryFeature, Properties};
