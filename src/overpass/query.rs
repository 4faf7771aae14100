//! Overpass QL query construction.

use std::time::Duration;

use crate::models::AdminLevel;

/// Immutable description of one boundary request: every relation at
/// `admin_level` inside the county-level area called `area_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaQuery {
    pub area_name: String,
    pub admin_level: AdminLevel,
    /// Server-side timeout embedded in the query
    pub timeout: Duration,
}

impl AreaQuery {
    pub fn new(area_name: impl Into<String>, admin_level: AdminLevel, timeout: Duration) -> Self {
        Self {
            area_name: area_name.into(),
            admin_level,
            timeout,
        }
    }

    /// Render the query, recursing down to ways and nodes so the response
    /// carries full geometry.
    pub fn to_overpass_ql(&self) -> String {
        format!(
            r#"[out:json][timeout:{timeout}];
area["admin_level"="{area_level}"]["name"="{name}"];
(
  relation(area)["admin_level"="{level}"];
);
(._;>;);
out body;
"#,
            timeout = self.timeout.as_secs(),
            area_level = AdminLevel::County.to_osm_level(),
            name = escape_ql_string(&self.area_name),
            level = self.admin_level.to_osm_level(),
        )
    }
}

fn escape_ql_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
