//! Irish administrative levels as tagged in OSM.

/// OSM admin_level mapping to the Irish subdivisions we fetch.
/// See: https://wiki.openstreetmap.org/wiki/Tag:boundary%3Dadministrative#Ireland
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AdminLevel {
    /// County (admin_level=6)
    County,
    /// District Electoral Division (admin_level=9)
    ElectoralDivision,
    /// Townland (admin_level=10)
    Townland,
}

impl AdminLevel {
    /// Get the OSM admin_level number
    pub fn to_osm_level(&self) -> u8 {
        match self {
            AdminLevel::County => 6,
            AdminLevel::ElectoralDivision => 9,
            AdminLevel::Townland => 10,
        }
    }

    /// Human-readable plural used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            AdminLevel::County => "counties",
            AdminLevel::ElectoralDivision => "DEDs",
            AdminLevel::Townland => "townlands",
        }
    }
}

impl std::fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_osm_level())
    }
}
