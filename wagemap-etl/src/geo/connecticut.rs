//! Connecticut county ↔ planning-region remap
//!
//! Connecticut replaced its eight legacy counties with nine planning
//! regions as county-equivalents; upstream sources straddle the cutover,
//! some still publishing against legacy county codes. The canonical form is
//! the planning-region code. The alias table is bidirectional but not a
//! bijection: 8 legacy codes vs 9 regions, and the Naugatuck Valley region
//! straddles three legacy counties, so its legacy fallback is the
//! documented statewide sentinel rather than any single county.

/// Statewide sentinel: the legacy fallback for the one region with no
/// single legacy counterpart. `09000` is the state-level FIPS, so a lookup
/// against it degrades to statewide data instead of failing.
pub const CT_STATEWIDE_SENTINEL: &str = "09000";

/// Legacy county code → planning-region code (canonical).
///
/// Not injective: Tolland's territory was folded into the Capitol region.
const LEGACY_TO_REGION: &[(&str, &str)] = &[
    ("09001", "09190"), // Fairfield -> Western Connecticut
    ("09003", "09110"), // Hartford -> Capitol
    ("09005", "09160"), // Litchfield -> Northwest Hills
    ("09007", "09130"), // Middlesex -> Lower Connecticut River Valley
    ("09009", "09170"), // New Haven -> South Central Connecticut
    ("09011", "09180"), // New London -> Southeastern Connecticut
    ("09013", "09110"), // Tolland -> Capitol
    ("09015", "09150"), // Windham -> Northeastern Connecticut
];

/// Planning-region code → legacy county code carrying most of its data.
///
/// Used as a fallback when a source still keys observations by legacy
/// county: look up the region's counterpart before declaring "no data".
const REGION_TO_LEGACY: &[(&str, &str)] = &[
    ("09110", "09003"),               // Capitol -> Hartford
    ("09120", "09001"),               // Greater Bridgeport -> Fairfield
    ("09130", "09007"),               // Lower CT River Valley -> Middlesex
    ("09140", CT_STATEWIDE_SENTINEL), // Naugatuck Valley straddles three counties
    ("09150", "09015"),               // Northeastern -> Windham
    ("09160", "09005"),               // Northwest Hills -> Litchfield
    ("09170", "09009"),               // South Central -> New Haven
    ("09180", "09011"),               // Southeastern -> New London
    ("09190", "09001"),               // Western -> Fairfield
];

/// Display names for the nine planning regions
pub const REGION_NAMES: &[(&str, &str)] = &[
    ("09110", "Capitol Planning Region"),
    ("09120", "Greater Bridgeport Planning Region"),
    ("09130", "Lower Connecticut River Valley Planning Region"),
    ("09140", "Naugatuck Valley Planning Region"),
    ("09150", "Northeastern Connecticut Planning Region"),
    ("09160", "Northwest Hills Planning Region"),
    ("09170", "South Central Connecticut Planning Region"),
    ("09180", "Southeastern Connecticut Planning Region"),
    ("09190", "Western Connecticut Planning Region"),
];

/// The nine current planning-region codes
pub fn region_codes() -> impl Iterator<Item = &'static str> {
    REGION_TO_LEGACY.iter().map(|(region, _)| *region)
}

/// The eight legacy county codes
pub fn legacy_codes() -> impl Iterator<Item = &'static str> {
    LEGACY_TO_REGION.iter().map(|(legacy, _)| *legacy)
}

/// True for any of the nine planning-region codes
pub fn is_region(fips: &str) -> bool {
    REGION_TO_LEGACY.iter().any(|(region, _)| *region == fips)
}

/// True for any of the eight legacy county codes
pub fn is_legacy(fips: &str) -> bool {
    LEGACY_TO_REGION.iter().any(|(legacy, _)| *legacy == fips)
}

/// Canonicalize a county FIPS: legacy Connecticut codes map to their
/// planning region, everything else passes through unchanged.
pub fn to_canonical(fips: &str) -> &str {
    match LEGACY_TO_REGION.iter().find(|(legacy, _)| *legacy == fips) {
        Some((_, region)) => region,
        None => fips,
    }
}

/// Legacy fallback for a planning region, for sources still keyed by
/// legacy county. Returns the statewide sentinel for the region with no
/// single counterpart; never fails for a valid region code.
pub fn legacy_fallback(region: &str) -> Option<&'static str> {
    REGION_TO_LEGACY
        .iter()
        .find(|(r, _)| *r == region)
        .map(|(_, legacy)| *legacy)
}

/// Display name for a planning region
pub fn region_name(region: &str) -> Option<&'static str> {
    REGION_NAMES
        .iter()
        .find(|(r, _)| *r == region)
        .map(|(_, name)| *name)
}
