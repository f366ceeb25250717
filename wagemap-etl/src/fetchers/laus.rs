//! Labor-force survey fetcher (unemployment rates, labor force levels)
//!
//! Covers four scopes: nation, 51 states, probed counties, and the metro
//! allow-list. County coverage comes from candidate-FIPS probing: the
//! generated id list deliberately over-covers, and codes the provider
//! rejects simply come back with no observations.

use crate::clients::timeseries::{SeriesTransport, TimeseriesClient};
use crate::fetchers::{best_value_for_year, index_by_series};
use crate::geo::{counties, metros, states};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wagemap_common::models::LaborForceRow;

const MEASURE_RATE: u8 = 3;
const MEASURE_UNEMPLOYED: u8 = 4;
const MEASURE_EMPLOYED: u8 = 5;
const MEASURE_LABOR_FORCE: u8 = 6;

const MEASURES: [u8; 4] = [
    MEASURE_RATE,
    MEASURE_UNEMPLOYED,
    MEASURE_EMPLOYED,
    MEASURE_LABOR_FORCE,
];

/// National household-survey series (fixed ids, no geographic component)
const NATIONAL_RATE: &str = "LNS14000000";
const NATIONAL_UNEMPLOYED: &str = "LNS13000000";
const NATIONAL_EMPLOYED: &str = "LNS12000000";
const NATIONAL_LABOR_FORCE: &str = "LNS11000000";

/// Raw artifact handed off to the joiner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LausArtifact {
    pub year: i32,
    pub national: LaborForceRow,
    /// Keyed by 2-digit state FIPS
    pub states: BTreeMap<String, LaborForceRow>,
    /// Keyed by 5-digit county FIPS (canonical vintage)
    pub counties: BTreeMap<String, LaborForceRow>,
    /// Keyed by bare CBSA code
    pub metros: BTreeMap<String, LaborForceRow>,
    /// False when the fetch aborted early (rate limit or repeated failures)
    pub complete: bool,
}

/// State series id for one measure
pub fn state_series(state_fips: &str, measure: u8) -> String {
    format!("LASST{}00000000000{:02}", state_fips, measure)
}

/// County series id for one measure
pub fn county_series(county_fips: &str, measure: u8) -> String {
    format!("LAUCN{}00000000{:02}", county_fips, measure)
}

/// Metro series id for one measure (provider embeds the primary state)
pub fn metro_series(state_fips: &str, cbsa: &str, measure: u8) -> String {
    format!("LAUMT{}{}000000{:02}", state_fips, cbsa, measure)
}

/// Fetch the labor-force survey for every scope
pub async fn fetch<T: SeriesTransport>(
    client: &TimeseriesClient<T>,
    year: i32,
) -> LausArtifact {
    let mut ids: Vec<String> = vec![
        NATIONAL_RATE.to_string(),
        NATIONAL_UNEMPLOYED.to_string(),
        NATIONAL_EMPLOYED.to_string(),
        NATIONAL_LABOR_FORCE.to_string(),
    ];

    for state in states::STATES {
        for measure in MEASURES {
            ids.push(state_series(state.fips, measure));
        }
    }
    for state in states::STATES {
        for county in counties::candidate_county_codes(state.fips) {
            for measure in MEASURES {
                ids.push(county_series(&county, measure));
            }
        }
    }
    for metro in metros::METRO_ALLOW_LIST {
        for measure in MEASURES {
            ids.push(metro_series(metro.state, metro.cbsa, measure));
        }
    }

    tracing::info!(series = ids.len(), year, "Fetching labor-force survey");

    let outcome = client.fetch_series(&ids, (year, year)).await;
    let complete = outcome.is_complete();
    let by_series = index_by_series(outcome.observations);

    let mut artifact = LausArtifact {
        year,
        national: LaborForceRow::default(),
        states: BTreeMap::new(),
        counties: BTreeMap::new(),
        metros: BTreeMap::new(),
        complete,
    };

    for (series_id, observations) in &by_series {
        let value = best_value_for_year(observations, year);
        if value.is_none() {
            continue;
        }
        apply(&mut artifact, series_id, value);
    }

    // Probed candidates that came back empty leave no trace; drop any row
    // that ended up all-null so invalid codes never look like counties.
    artifact.counties.retain(|_, row| {
        row.unemployment_rate.is_some()
            || row.unemployed.is_some()
            || row.employed.is_some()
            || row.labor_force.is_some()
    });

    tracing::info!(
        states = artifact.states.len(),
        counties = artifact.counties.len(),
        metros = artifact.metros.len(),
        complete,
        "Labor-force survey fetched"
    );

    artifact
}

/// Route one extracted value into the artifact by decoding its series id
fn apply(artifact: &mut LausArtifact, series_id: &str, value: Option<f64>) {
    match series_id {
        NATIONAL_RATE => artifact.national.unemployment_rate = value,
        NATIONAL_UNEMPLOYED => artifact.national.unemployed = value,
        NATIONAL_EMPLOYED => artifact.national.employed = value,
        NATIONAL_LABOR_FORCE => artifact.national.labor_force = value,
        _ => {
            let Some(measure) = series_id
                .get(series_id.len().saturating_sub(2)..)
                .and_then(|m| m.parse::<u8>().ok())
            else {
                tracing::warn!(series_id, "Unrecognized measure suffix; skipping");
                return;
            };

            let row = if let Some(fips) = series_id.strip_prefix("LASST").and_then(|s| s.get(..2)) {
                artifact.states.entry(fips.to_string()).or_default()
            } else if let Some(fips) = series_id.strip_prefix("LAUCN").and_then(|s| s.get(..5)) {
                artifact.counties.entry(fips.to_string()).or_default()
            } else if let Some(cbsa) = series_id.strip_prefix("LAUMT").and_then(|s| s.get(2..7)) {
                artifact.metros.entry(cbsa.to_string()).or_default()
            } else {
                tracing::warn!(series_id, "Unrecognized series id shape; skipping");
                return;
            };

            match measure {
                MEASURE_RATE => row.unemployment_rate = value,
                MEASURE_UNEMPLOYED => row.unemployed = value,
                MEASURE_EMPLOYED => row.employed = value,
                MEASURE_LABOR_FORCE => row.labor_force = value,
                other => tracing::warn!(series_id, measure = other, "Unknown measure code"),
            }
        }
    }
}
