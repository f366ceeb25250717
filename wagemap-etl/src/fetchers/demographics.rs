//! Census demographics fetcher (population, income, age)
//!
//! Optional source: requires a census API key. Three calls cover the
//! nation, all states, and all counties. The census API reports
//! suppressed estimates as large negative sentinels (`-666666666`), which
//! must become `None` like any other placeholder.

use crate::clients::census::CensusClient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wagemap_common::models::observation::parse_value;
use wagemap_common::models::DemographicsRow;
use wagemap_common::Result;

const VAR_POPULATION: &str = "B01003_001E";
const VAR_MEDIAN_HH_INCOME: &str = "B19013_001E";
const VAR_MEDIAN_AGE: &str = "B01002_001E";

const VAR_NAME: &str = "NAME";

const VARIABLES: [&str; 4] = [VAR_NAME, VAR_POPULATION, VAR_MEDIAN_HH_INCOME, VAR_MEDIAN_AGE];

/// Raw artifact handed off to the joiner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemographicsArtifact {
    pub year: i32,
    pub national: DemographicsRow,
    /// Keyed by 2-digit state FIPS
    pub states: BTreeMap<String, DemographicsRow>,
    /// Keyed by 5-digit county FIPS as published (current vintage)
    pub counties: BTreeMap<String, DemographicsRow>,
}

/// Parse one census cell defensively: placeholder tokens and the API's
/// negative suppression sentinels both become `None`.
fn census_number(cell: &str) -> Option<f64> {
    parse_value(cell).as_f64().filter(|v| *v > -1_000_000.0)
}

fn row_from(record: &std::collections::BTreeMap<&str, &str>) -> DemographicsRow {
    DemographicsRow {
        name: record
            .get(VAR_NAME)
            .filter(|n| !n.is_empty())
            .map(|n| n.to_string()),
        population: record.get(VAR_POPULATION).copied().and_then(census_number),
        median_household_income: record
            .get(VAR_MEDIAN_HH_INCOME)
            .copied()
            .and_then(census_number),
        median_age: record.get(VAR_MEDIAN_AGE).copied().and_then(census_number),
    }
}

/// Fetch demographics for the nation, all states, and all counties.
///
/// The ACS survey year lags the labor data year; callers pass the most
/// recent published survey year.
pub async fn fetch(client: &CensusClient, year: i32) -> Result<DemographicsArtifact> {
    tracing::info!(year, "Fetching census demographics");

    let mut artifact = DemographicsArtifact {
        year,
        national: DemographicsRow::default(),
        states: BTreeMap::new(),
        counties: BTreeMap::new(),
    };

    let national = client.acs5(year, &VARIABLES, "us:1", None).await?;
    if let Some(record) = national.records().next() {
        artifact.national = row_from(&record);
    }

    let states = client.acs5(year, &VARIABLES, "state:*", None).await?;
    for record in states.records() {
        let Some(fips) = record.get("state").copied() else {
            tracing::warn!("State row without a state column; skipping");
            continue;
        };
        artifact.states.insert(fips.to_string(), row_from(&record));
    }

    let counties = client.acs5(year, &VARIABLES, "county:*", None).await?;
    for record in counties.records() {
        let (Some(state), Some(county)) =
            (record.get("state").copied(), record.get("county").copied())
        else {
            tracing::warn!("County row without state/county columns; skipping");
            continue;
        };
        artifact
            .counties
            .insert(format!("{}{}", state, county), row_from(&record));
    }

    tracing::info!(
        states = artifact.states.len(),
        counties = artifact.counties.len(),
        "Census demographics fetched"
    );
    Ok(artifact)
}
