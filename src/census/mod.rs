//! Census metadata: which counties to fetch boundaries for.

mod client;
mod counties;

pub use client::{parse_category_labels, CensusClient, CountyVariable};
pub use counties::translate_county_name;
