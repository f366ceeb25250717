//! Consumer price survey fetcher (national all-items index)
//!
//! Fetches two years so the year-over-year change can be computed from
//! annual averages. The index level alone is not meaningful to consumers;
//! the ticker wants the percent change.

use crate::clients::timeseries::{SeriesTransport, TimeseriesClient};
use crate::fetchers::{best_value_for_year, index_by_series};
use serde::{Deserialize, Serialize};
use wagemap_common::models::CpiRow;

/// National all-items index, all urban consumers, not seasonally adjusted
const NATIONAL_ALL_ITEMS: &str = "CUUR0000SA0";

/// Raw artifact handed off to the joiner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpiArtifact {
    pub year: i32,
    pub national: CpiRow,
    pub complete: bool,
}

/// Fetch the consumer price index and derive the year-over-year change
pub async fn fetch<T: SeriesTransport>(client: &TimeseriesClient<T>, year: i32) -> CpiArtifact {
    let ids = vec![NATIONAL_ALL_ITEMS.to_string()];

    tracing::info!(year, "Fetching consumer price index");

    let outcome = client.fetch_series(&ids, (year - 1, year)).await;
    let complete = outcome.is_complete();
    let by_series = index_by_series(outcome.observations);

    let observations = by_series
        .get(NATIONAL_ALL_ITEMS)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let current = best_value_for_year(observations, year);
    let previous = best_value_for_year(observations, year - 1);

    let yoy_pct_change = match (current, previous) {
        (Some(current), Some(previous)) if previous != 0.0 => {
            Some((current / previous - 1.0) * 100.0)
        }
        _ => None,
    };

    CpiArtifact {
        year,
        national: CpiRow {
            index_value: current,
            yoy_pct_change,
        },
        complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wagemap_common::models::SeriesObservation;

    fn obs(year: i32, period: &str, value: Option<f64>) -> SeriesObservation {
        SeriesObservation {
            series_id: NATIONAL_ALL_ITEMS.to_string(),
            year,
            period: period.to_string(),
            value,
            sentinel: value.is_none(),
        }
    }

    #[test]
    fn yoy_from_annual_averages() {
        let observations = vec![obs(2023, "M13", Some(304.7)), obs(2024, "M13", Some(313.7))];
        let current = best_value_for_year(&observations, 2024).unwrap();
        let previous = best_value_for_year(&observations, 2023).unwrap();
        let yoy = (current / previous - 1.0) * 100.0;
        assert!((yoy - 2.9537).abs() < 0.001);
    }
}
