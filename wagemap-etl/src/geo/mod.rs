//! Geographic identity resolution
//!
//! Every upstream source speaks a different identifier dialect: bare
//! 5-digit county FIPS, legacy county codes, zero-padded provider area
//! codes, bare CBSA codes, display names. This module owns the canonical
//! forms (2-digit state FIPS, 5-digit county FIPS with Connecticut
//! planning-region codes, bare CBSA for metros) and the conversions into
//! them. `normalize` is idempotent: feeding it its own output returns the
//! same id.

pub mod connecticut;
pub mod counties;
pub mod metros;
pub mod states;

use std::collections::BTreeMap;
use wagemap_common::models::{GeoKind, GeographicEntity};

/// Identifier dialect a raw id arrives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceScheme {
    /// 5-digit county FIPS, current vintage (CT planning regions)
    CountyFips,
    /// 5-digit county FIPS, legacy vintage (CT eight counties)
    LegacyCountyFips,
    /// Zero-padded 7-digit provider area code (`"0038060"`)
    PaddedAreaCode,
    /// Bare 5-digit CBSA code
    Cbsa,
    /// Metro display name, matched against the curated allow-list
    MetroName,
}

/// Resolver over the static geography tables.
///
/// Built once per run and passed to every stage; an explicit object with a
/// process-scoped lifetime rather than module globals.
pub struct Resolver {
    metro_by_name: BTreeMap<String, &'static metros::Metro>,
    metro_by_cbsa: BTreeMap<&'static str, &'static metros::Metro>,
}

impl Resolver {
    pub fn new() -> Self {
        let mut metro_by_name = BTreeMap::new();
        let mut metro_by_cbsa = BTreeMap::new();
        for metro in metros::METRO_ALLOW_LIST {
            metro_by_name.insert(metro.name.to_lowercase(), metro);
            metro_by_cbsa.insert(metro.cbsa, metro);
        }
        Self {
            metro_by_name,
            metro_by_cbsa,
        }
    }

    /// Normalize a raw identifier into its canonical form.
    ///
    /// Returns `None` only for ids that cannot belong to any known
    /// geography (callers then skip the record); Connecticut ids always
    /// resolve, falling back through the legacy alias table, and the one
    /// planning region with no legacy counterpart resolves via the
    /// documented statewide sentinel rather than failing.
    pub fn normalize(&self, raw: &str, scheme: SourceScheme) -> Option<String> {
        let raw = raw.trim();
        match scheme {
            SourceScheme::CountyFips => {
                if raw.len() != 5 || !raw.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                Some(connecticut::to_canonical(raw).to_string())
            }
            SourceScheme::LegacyCountyFips => {
                if raw.len() != 5 || !raw.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                Some(connecticut::to_canonical(raw).to_string())
            }
            SourceScheme::PaddedAreaCode => {
                let bare = raw.trim_start_matches('0');
                let cbsa = format!("{:0>5}", bare);
                self.metro_by_cbsa.get(cbsa.as_str()).map(|m| m.cbsa.to_string())
            }
            SourceScheme::Cbsa => self
                .metro_by_cbsa
                .get(raw)
                .map(|m| m.cbsa.to_string()),
            SourceScheme::MetroName => self
                .metro_by_name
                .get(&raw.to_lowercase())
                .map(|m| m.cbsa.to_string()),
        }
    }

    /// Metro entity for a canonical CBSA code
    pub fn metro(&self, cbsa: &str) -> Option<GeographicEntity> {
        self.metro_by_cbsa
            .get(cbsa)
            .map(|m| GeographicEntity::new(m.cbsa, GeoKind::Metro, m.name))
    }

    /// All allow-listed metros, in CBSA order
    pub fn metros(&self) -> impl Iterator<Item = GeographicEntity> + '_ {
        self.metro_by_cbsa
            .values()
            .map(|m| GeographicEntity::new(m.cbsa, GeoKind::Metro, m.name))
    }

    /// All states (incl. DC), in FIPS order
    pub fn states(&self) -> impl Iterator<Item = GeographicEntity> {
        states::STATES
            .iter()
            .map(|s| GeographicEntity::new(s.fips, GeoKind::State, s.name))
    }

    /// State entity for a 2-digit FIPS code
    pub fn state(&self, fips: &str) -> Option<GeographicEntity> {
        states::by_fips(fips).map(|s| GeographicEntity::new(s.fips, GeoKind::State, s.name))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent_for_counties() {
        let resolver = Resolver::new();
        for raw in ["06037", "09001", "09110", "51510"] {
            let once = resolver.normalize(raw, SourceScheme::CountyFips).unwrap();
            let twice = resolver.normalize(&once, SourceScheme::CountyFips).unwrap();
            assert_eq!(once, twice, "raw {}", raw);
        }
    }

    #[test]
    fn padded_area_code_resolves_to_bare_cbsa() {
        let resolver = Resolver::new();
        assert_eq!(
            resolver.normalize("0038060", SourceScheme::PaddedAreaCode),
            Some("38060".to_string())
        );
        assert_eq!(
            resolver.normalize("38060", SourceScheme::Cbsa),
            Some("38060".to_string())
        );
    }

    #[test]
    fn metro_name_resolves_case_insensitively() {
        let resolver = Resolver::new();
        assert_eq!(
            resolver.normalize(
                "New York-Newark-Jersey City, NY-NJ-PA",
                SourceScheme::MetroName
            ),
            Some("35620".to_string())
        );
        assert_eq!(
            resolver.normalize(
                "new york-newark-jersey city, ny-nj-pa",
                SourceScheme::MetroName
            ),
            Some("35620".to_string())
        );
    }

    #[test]
    fn unknown_metro_is_none_not_error() {
        let resolver = Resolver::new();
        assert_eq!(resolver.normalize("99999", SourceScheme::Cbsa), None);
        assert_eq!(resolver.normalize("Nowhereville", SourceScheme::MetroName), None);
    }

    #[test]
    fn malformed_county_fips_is_rejected() {
        let resolver = Resolver::new();
        assert_eq!(resolver.normalize("123", SourceScheme::CountyFips), None);
        assert_eq!(resolver.normalize("ABCDE", SourceScheme::CountyFips), None);
    }
}
