//! Overpass API access: query building, payload conversion and the
//! rate-limit aware fetch loop.

mod client;
pub mod convert;
mod query;
mod retry;

pub use client::{BoundarySource, FetchOutcome, OverpassClient, RetryReason};
pub use convert::overpass_to_features;
pub use query::AreaQuery;
pub use retry::{fetch_with_retry, RetryPolicy};
