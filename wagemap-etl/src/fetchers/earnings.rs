//! Wage/earnings survey fetcher (average hourly earnings, weekly hours)
//!
//! National figures come from the establishment survey's total-private
//! series; state figures from the corresponding state/area series.

use crate::clients::timeseries::{SeriesTransport, TimeseriesClient};
use crate::fetchers::{best_value_for_year, index_by_series};
use crate::geo::states;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wagemap_common::models::EarningsRow;

/// National total-private average hourly earnings
const NATIONAL_HOURLY_EARNINGS: &str = "CES0500000003";
/// National total-private average weekly hours
const NATIONAL_WEEKLY_HOURS: &str = "CES0500000002";

const DATA_TYPE_HOURLY_EARNINGS: u8 = 3;
const DATA_TYPE_WEEKLY_HOURS: u8 = 2;

/// Raw artifact handed off to the joiner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningsArtifact {
    pub year: i32,
    pub national: EarningsRow,
    /// Keyed by 2-digit state FIPS
    pub states: BTreeMap<String, EarningsRow>,
    pub complete: bool,
}

/// State total-private series id for one data type
pub fn state_series(state_fips: &str, data_type: u8) -> String {
    format!("SMU{}000000500000000{:02}", state_fips, data_type)
}

/// Fetch the earnings survey for the nation and all states
pub async fn fetch<T: SeriesTransport>(
    client: &TimeseriesClient<T>,
    year: i32,
) -> EarningsArtifact {
    let mut ids = vec![
        NATIONAL_HOURLY_EARNINGS.to_string(),
        NATIONAL_WEEKLY_HOURS.to_string(),
    ];
    for state in states::STATES {
        ids.push(state_series(state.fips, DATA_TYPE_HOURLY_EARNINGS));
        ids.push(state_series(state.fips, DATA_TYPE_WEEKLY_HOURS));
    }

    tracing::info!(series = ids.len(), year, "Fetching earnings survey");

    let outcome = client.fetch_series(&ids, (year, year)).await;
    let complete = outcome.is_complete();
    let by_series = index_by_series(outcome.observations);

    let mut artifact = EarningsArtifact {
        year,
        national: EarningsRow::default(),
        states: BTreeMap::new(),
        complete,
    };

    for (series_id, observations) in &by_series {
        let value = best_value_for_year(observations, year);
        if value.is_none() {
            continue;
        }
        match series_id.as_str() {
            NATIONAL_HOURLY_EARNINGS => artifact.national.avg_hourly_earnings = value,
            NATIONAL_WEEKLY_HOURS => artifact.national.avg_weekly_hours = value,
            other => {
                let Some(fips) = other.strip_prefix("SMU").and_then(|s| s.get(..2)) else {
                    tracing::warn!(series_id, "Unrecognized earnings series; skipping");
                    continue;
                };
                let row = artifact.states.entry(fips.to_string()).or_default();
                match other.get(other.len().saturating_sub(2)..) {
                    Some("03") => row.avg_hourly_earnings = value,
                    Some("02") => row.avg_weekly_hours = value,
                    _ => tracing::warn!(series_id, "Unknown earnings data type"),
                }
            }
        }
    }

    tracing::info!(states = artifact.states.len(), complete, "Earnings survey fetched");
    artifact
}
