//! County label translation from census categories to OSM area names.

/// Historic county names used in the 1911 census and their modern OSM names
const HISTORIC_NAMES: &[(&str, &str)] = &[("Queen's Co.", "Laois"), ("King's Co.", "Offaly")];

/// Translate a census county label into the name of the OSM county area.
///
/// `"Queen's Co."` → `"County Laois"`, `"Dublin"` → `"County Dublin"`.
pub fn translate_county_name(label: &str) -> String {
    let label = label.trim();
    let modern = HISTORIC_NAMES
        .iter()
        .find(|(historic, _)| *historic == label)
        .map(|(_, modern)| *modern)
        .unwrap_or(label);

    format!("County {}", modern)
}
