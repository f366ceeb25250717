//! Candidate county FIPS generation
//!
//! There is no county discovery endpoint on the time-series API, so the
//! labor-force fetcher probes generated candidate codes instead. County
//! codes are odd numbers with a handful of even exceptions (Virginia's
//! independent cities, Alaska's boroughs and census areas, a few
//! late-created counties). Invalid candidates cost one rejected series id,
//! so the generator deliberately over-generates: a wasted id is cheap, an
//! under-generated list silently drops a real county.
//!
//! Connecticut is special-cased to its nine planning-region codes.

use super::connecticut;
use super::states;

/// Highest county code per state, by 2-digit FIPS. Drives the odd-number
/// candidate range; a little slack at the top is harmless.
const MAX_COUNTY_CODE: &[(&str, u32)] = &[
    ("01", 133), ("02", 290), ("04", 27), ("05", 149), ("06", 115),
    ("08", 125), ("10", 5), ("11", 1), ("12", 133), ("13", 321),
    ("15", 9), ("16", 87), ("17", 203), ("18", 183), ("19", 197),
    ("20", 209), ("21", 239), ("22", 127), ("23", 31), ("24", 47),
    ("25", 27), ("26", 165), ("27", 173), ("28", 163), ("29", 229),
    ("30", 111), ("31", 185), ("32", 33), ("33", 19), ("34", 41),
    ("35", 61), ("36", 123), ("37", 199), ("38", 105), ("39", 175),
    ("40", 153), ("41", 71), ("42", 133), ("44", 9), ("45", 91),
    ("46", 137), ("47", 189), ("48", 507), ("49", 57), ("50", 27),
    ("51", 199), ("53", 77), ("54", 109), ("55", 141), ("56", 45),
];

/// Known even-numbered county codes outside the generated ranges:
/// Broomfield CO, La Paz AZ, Oglala Lakota SD, Baltimore/St. Louis/Carson
/// City independent cities.
const EVEN_EXCEPTIONS: &[&str] = &["04012", "08014", "24510", "29510", "32510", "46102"];

/// Generate candidate county FIPS codes for one state.
///
/// Returns an empty list for unknown state codes. Candidates are sorted
/// and unique.
pub fn candidate_county_codes(state_fips: &str) -> Vec<String> {
    // Connecticut counts by planning region, not by the legacy ranges
    if state_fips == "09" {
        return connecticut::region_codes().map(str::to_string).collect();
    }

    if states::by_fips(state_fips).is_none() {
        return Vec::new();
    }

    let max_code = MAX_COUNTY_CODE
        .iter()
        .find(|(fips, _)| *fips == state_fips)
        .map(|(_, max)| *max)
        .unwrap_or(199);

    let mut candidates: Vec<String> = (1..=max_code)
        .step_by(2)
        .map(|code| format!("{}{:03}", state_fips, code))
        .collect();

    match state_fips {
        // Virginia independent cities: 510-840, both parities in use
        "51" => {
            candidates.extend((510..=840).map(|code| format!("51{:03}", code)));
        }
        // Alaska boroughs and census areas use even codes freely
        "02" => {
            candidates.extend((10..=290).step_by(2).map(|code| format!("02{:03}", code)));
        }
        _ => {}
    }

    for exception in EVEN_EXCEPTIONS {
        if exception.starts_with(state_fips) {
            candidates.push((*exception).to_string());
        }
    }

    candidates.sort();
    candidates.dedup();
    candidates
}
