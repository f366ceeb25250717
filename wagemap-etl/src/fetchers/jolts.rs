//! Job-openings survey fetcher (openings, hires, quits rates)

use crate::clients::timeseries::{SeriesTransport, TimeseriesClient};
use crate::fetchers::{best_value_for_year, index_by_series};
use crate::geo::states;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wagemap_common::models::JoltsRow;

/// Data elements the survey publishes as rates
const ELEMENT_OPENINGS: &str = "JOR";
const ELEMENT_HIRES: &str = "HIR";
const ELEMENT_QUITS: &str = "QUR";

/// Series id for one state (use `"00"` for the national series)
pub fn series(state_fips: &str, element: &str) -> String {
    format!("JTS000000{}0000000{}", state_fips, element)
}

/// Raw artifact handed off to the joiner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoltsArtifact {
    pub year: i32,
    pub national: JoltsRow,
    /// Keyed by 2-digit state FIPS
    pub states: BTreeMap<String, JoltsRow>,
    pub complete: bool,
}

/// Fetch the job-openings survey for the nation and all states
pub async fn fetch<T: SeriesTransport>(client: &TimeseriesClient<T>, year: i32) -> JoltsArtifact {
    let mut ids = Vec::new();
    for element in [ELEMENT_OPENINGS, ELEMENT_HIRES, ELEMENT_QUITS] {
        ids.push(series("00", element));
        for state in states::STATES {
            ids.push(series(state.fips, element));
        }
    }

    tracing::info!(series = ids.len(), year, "Fetching job-openings survey");

    let outcome = client.fetch_series(&ids, (year, year)).await;
    let complete = outcome.is_complete();
    let by_series = index_by_series(outcome.observations);

    let mut artifact = JoltsArtifact {
        year,
        national: JoltsRow::default(),
        states: BTreeMap::new(),
        complete,
    };

    for (series_id, observations) in &by_series {
        let value = best_value_for_year(observations, year);
        if value.is_none() {
            continue;
        }

        let Some(fips) = series_id.get(9..11) else {
            tracing::warn!(series_id, "Unrecognized openings series; skipping");
            continue;
        };
        let row = if fips == "00" {
            &mut artifact.national
        } else {
            artifact.states.entry(fips.to_string()).or_default()
        };

        match series_id.get(series_id.len().saturating_sub(3)..) {
            Some(ELEMENT_OPENINGS) => row.openings_rate = value,
            Some(ELEMENT_HIRES) => row.hires_rate = value,
            Some(ELEMENT_QUITS) => row.quits_rate = value,
            _ => tracing::warn!(series_id, "Unknown openings data element"),
        }
    }

    tracing::info!(states = artifact.states.len(), complete, "Job-openings survey fetched");
    artifact
}
