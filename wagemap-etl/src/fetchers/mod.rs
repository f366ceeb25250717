//! Per-source fetchers
//!
//! One module per upstream dataset. Each fetcher builds provider request
//! identifiers from {geographic scope × metric}, feeds them to a client,
//! extracts one clean value per identifier, and returns a typed artifact —
//! its handoff to the joiner. Fetchers share no state: artifacts are
//! written to disk independently and the joiner runs only once the ones it
//! needs exist.

pub mod cpi;
pub mod demographics;
pub mod earnings;
pub mod income;
pub mod jolts;
pub mod laus;
pub mod oews;
pub mod projections;

use std::collections::BTreeMap;
use wagemap_common::models::SeriesObservation;

/// Group observations by series id (ordered for deterministic iteration)
pub fn index_by_series(
    observations: Vec<SeriesObservation>,
) -> BTreeMap<String, Vec<SeriesObservation>> {
    let mut by_series: BTreeMap<String, Vec<SeriesObservation>> = BTreeMap::new();
    for observation in observations {
        by_series
            .entry(observation.series_id.clone())
            .or_default()
            .push(observation);
    }
    by_series
}

/// Extract the single best value from one series' observations.
///
/// Prefers the annual-average pseudo-period of the most recent year that
/// has one; otherwise falls back to the most recent (year, period)
/// observation carrying a value. A series with no valid observation yields
/// `None`, never `0`.
pub fn best_value(observations: &[SeriesObservation]) -> Option<f64> {
    let annual = observations
        .iter()
        .filter(|o| o.is_annual_average() && o.value.is_some())
        .max_by_key(|o| o.year);
    if let Some(observation) = annual {
        return observation.value;
    }

    observations
        .iter()
        .filter(|o| o.value.is_some())
        .max_by(|a, b| (a.year, &a.period).cmp(&(b.year, &b.period)))
        .and_then(|o| o.value)
}

/// Best value for a specific year only (annual average preferred, else the
/// latest month of that year)
pub fn best_value_for_year(observations: &[SeriesObservation], year: i32) -> Option<f64> {
    let of_year: Vec<&SeriesObservation> =
        observations.iter().filter(|o| o.year == year).collect();

    if let Some(annual) = of_year
        .iter()
        .find(|o| o.is_annual_average() && o.value.is_some())
    {
        return annual.value;
    }

    of_year
        .iter()
        .filter(|o| o.value.is_some())
        .max_by(|a, b| a.period.cmp(&b.period))
        .and_then(|o| o.value)
}
