//! Regional income fetcher (per-capita personal income)
//!
//! Optional source. Rows stay keyed by the provider's own GeoFips: this
//! source has straddled the Connecticut county cutover across releases,
//! and collapsing legacy keys here would merge two counties into one
//! region. The joiner applies the alias-table fallback at lookup time
//! instead.

use crate::clients::bea::BeaClient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wagemap_common::models::observation::parse_value;
use wagemap_common::models::IncomeRow;
use wagemap_common::Result;

/// Regional personal-income table and the per-capita line within it
const TABLE_NAME: &str = "CAINC1";
const LINE_PER_CAPITA_INCOME: u32 = 3;

/// Raw artifact handed off to the joiner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeArtifact {
    pub year: i32,
    /// Keyed by 2-digit state FIPS
    pub states: BTreeMap<String, IncomeRow>,
    /// Keyed by 5-digit county FIPS exactly as published (may be legacy
    /// vintage; the joiner resolves)
    pub counties: BTreeMap<String, IncomeRow>,
}

/// Fetch per-capita income for all states and counties
pub async fn fetch(client: &BeaClient, year: i32) -> Result<IncomeArtifact> {
    tracing::info!(year, "Fetching regional income");

    let mut artifact = IncomeArtifact {
        year,
        states: BTreeMap::new(),
        counties: BTreeMap::new(),
    };

    // State rows arrive with a trailing "000" on the FIPS ("09000")
    for row in client
        .regional(TABLE_NAME, LINE_PER_CAPITA_INCOME, "STATE", year)
        .await?
    {
        let fips = row.geo_fips.trim();
        if fips.len() != 5 || !fips.ends_with("000") {
            continue; // regional aggregates mixed into the state selector
        }
        let value = parse_value(&row.data_value).as_f64();
        if value.is_some() {
            artifact.states.insert(
                fips[..2].to_string(),
                IncomeRow {
                    per_capita_income: value,
                },
            );
        }
    }

    for row in client
        .regional(TABLE_NAME, LINE_PER_CAPITA_INCOME, "COUNTY", year)
        .await?
    {
        let fips = row.geo_fips.trim();
        if fips.len() != 5 || fips.ends_with("000") {
            continue; // skip the statewide rows the county selector includes
        }
        let value = parse_value(&row.data_value).as_f64();
        if value.is_some() {
            artifact.counties.insert(
                fips.to_string(),
                IncomeRow {
                    per_capita_income: value,
                },
            );
        }
    }

    tracing::info!(
        states = artifact.states.len(),
        counties = artifact.counties.len(),
        "Regional income fetched"
    );
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::bea::BeaDataRow;

    fn row(geo_fips: &str, value: &str) -> BeaDataRow {
        serde_json::from_value(serde_json::json!({
            "GeoFips": geo_fips,
            "GeoName": "",
            "TimePeriod": "2024",
            "DataValue": value,
        }))
        .unwrap()
    }

    #[test]
    fn comma_formatted_values_parse() {
        let parsed = parse_value(&row("09000", "84,972").data_value).as_f64();
        assert_eq!(parsed, Some(84_972.0));
    }

    #[test]
    fn suppressed_values_are_none() {
        let parsed = parse_value(&row("09003", "(D)").data_value).as_f64();
        assert_eq!(parsed, None);
    }
}
