//! Joiner / record builder
//!
//! First point where cross-source state combines. Every source is
//! optional here: a missing artifact only nulls the fields it would have
//! supplied, never crashes record construction. Per-metric precedence is
//! fixed and explicit; the only synthesis beyond it is the documented
//! county roll-up and population-weighted fallbacks. Output collections
//! are ordered maps and sorted vectors, so identical inputs produce
//! byte-identical records.

pub mod aggregate;

use crate::fetchers::cpi::CpiArtifact;
use crate::fetchers::demographics::DemographicsArtifact;
use crate::fetchers::earnings::EarningsArtifact;
use crate::fetchers::income::IncomeArtifact;
use crate::fetchers::jolts::JoltsArtifact;
use crate::fetchers::laus::LausArtifact;
use crate::fetchers::oews::OewsArtifact;
use crate::fetchers::projections::ProjectionsArtifact;
use crate::geo::{connecticut, Resolver};
use aggregate::{sum_non_null, weighted_mean};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use wagemap_common::models::{
    CountyRecord, MajorGroup, MetroRecord, NationalSnapshot, OccupationRecord, ProjectionRow,
    StateRecord,
};

/// Raw artifacts available to one join run; any may be absent
#[derive(Debug, Default)]
pub struct JoinInputs {
    pub laus: Option<LausArtifact>,
    pub earnings: Option<EarningsArtifact>,
    pub cpi: Option<CpiArtifact>,
    pub jolts: Option<JoltsArtifact>,
    pub demographics: Option<DemographicsArtifact>,
    pub income: Option<IncomeArtifact>,
}

/// Canonical per-geography dataset for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDataset {
    pub national: NationalSnapshot,
    /// Keyed by 2-digit state FIPS
    pub states: BTreeMap<String, StateRecord>,
    /// Keyed by canonical 5-digit county FIPS
    pub counties: BTreeMap<String, CountyRecord>,
    /// Keyed by bare CBSA code (allow-listed metros only)
    pub metros: BTreeMap<String, MetroRecord>,
}

/// Canonical per-occupation dataset for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OccupationDataset {
    pub national: Vec<OccupationRecord>,
    pub states: BTreeMap<String, Vec<OccupationRecord>>,
    pub metros: BTreeMap<String, Vec<OccupationRecord>>,
    pub major_groups: Vec<MajorGroup>,
    /// National outlook keyed by SOC code
    pub projections: BTreeMap<String, ProjectionRow>,
}

/// Build canonical geography records from whatever sources are present
pub fn build(resolver: &Resolver, inputs: &JoinInputs) -> CanonicalDataset {
    let mut dataset = CanonicalDataset {
        national: build_national(inputs),
        ..Default::default()
    };

    // Counties first: state records fall back onto county roll-ups
    for fips in county_keys(inputs) {
        let record = build_county(&fips, inputs);
        dataset.counties.insert(fips, record);
    }

    for state in resolver.states() {
        let record = build_state(&state.canonical_id, &state.display_name, inputs, &dataset.counties);
        dataset.states.insert(state.canonical_id, record);
    }

    if let Some(laus) = &inputs.laus {
        for (cbsa, row) in &laus.metros {
            let Some(metro) = resolver.metro(cbsa) else {
                continue; // not on the allow-list
            };
            dataset.metros.insert(
                cbsa.clone(),
                MetroRecord {
                    cbsa: cbsa.clone(),
                    name: metro.display_name,
                    unemployment_rate: row.unemployment_rate,
                    employed: row.employed,
                    labor_force: row.labor_force,
                },
            );
        }
    }

    tracing::info!(
        states = dataset.states.len(),
        counties = dataset.counties.len(),
        metros = dataset.metros.len(),
        "Canonical geography records built"
    );
    dataset
}

/// Assemble the occupation dataset, sorted for deterministic output
pub fn build_occupations(
    oews: Option<OewsArtifact>,
    projections: Option<ProjectionsArtifact>,
) -> OccupationDataset {
    let mut dataset = OccupationDataset::default();

    if let Some(oews) = oews {
        dataset.national = oews.national;
        dataset.states = oews.states;
        dataset.metros = oews.metros;
        dataset.major_groups = oews.major_groups;
    }
    if let Some(projections) = projections {
        dataset.projections = projections.occupations;
    }

    dataset.national.sort_by(|a, b| a.soc_code.cmp(&b.soc_code));
    for records in dataset.states.values_mut() {
        records.sort_by(|a, b| a.soc_code.cmp(&b.soc_code));
    }
    for records in dataset.metros.values_mut() {
        records.sort_by(|a, b| a.soc_code.cmp(&b.soc_code));
    }
    dataset.major_groups.sort_by(|a, b| a.code.cmp(&b.code));

    dataset
}

fn build_national(inputs: &JoinInputs) -> NationalSnapshot {
    NationalSnapshot {
        unemployment_rate: inputs
            .laus
            .as_ref()
            .and_then(|l| l.national.unemployment_rate),
        labor_force: inputs.laus.as_ref().and_then(|l| l.national.labor_force),
        avg_hourly_earnings: inputs
            .earnings
            .as_ref()
            .and_then(|e| e.national.avg_hourly_earnings),
        cpi_yoy_pct_change: inputs.cpi.as_ref().and_then(|c| c.national.yoy_pct_change),
        job_openings_rate: inputs.jolts.as_ref().and_then(|j| j.national.openings_rate),
        quits_rate: inputs.jolts.as_ref().and_then(|j| j.national.quits_rate),
    }
}

/// Every canonical county key any source knows about
fn county_keys(inputs: &JoinInputs) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    if let Some(laus) = &inputs.laus {
        keys.extend(laus.counties.keys().cloned());
    }
    if let Some(demographics) = &inputs.demographics {
        keys.extend(
            demographics
                .counties
                .keys()
                .map(|k| connecticut::to_canonical(k).to_string()),
        );
    }
    if let Some(income) = &inputs.income {
        keys.extend(
            income
                .counties
                .keys()
                .map(|k| connecticut::to_canonical(k).to_string()),
        );
    }
    keys
}

fn build_county(fips: &str, inputs: &JoinInputs) -> CountyRecord {
    let laus = inputs.laus.as_ref().and_then(|l| l.counties.get(fips));
    let demographics = inputs
        .demographics
        .as_ref()
        .and_then(|d| ct_aware_county(&d.counties, fips));

    // Income rows keep their published keys; fall back through the alias
    // table before declaring no data for a Connecticut region
    let per_capita_income = inputs.income.as_ref().and_then(|income| {
        if let Some(row) = ct_aware_county(&income.counties, fips) {
            return row.per_capita_income;
        }
        // Statewide sentinel: degrade to the state figure
        if connecticut::legacy_fallback(fips) == Some(connecticut::CT_STATEWIDE_SENTINEL) {
            return income
                .states
                .get("09")
                .and_then(|row| row.per_capita_income);
        }
        None
    });

    let name = demographics
        .and_then(|row| row.name.clone())
        .or_else(|| connecticut::region_name(fips).map(str::to_string))
        .unwrap_or_else(|| fips.to_string());

    CountyRecord {
        fips: fips.to_string(),
        name,
        unemployment_rate: laus.and_then(|row| row.unemployment_rate),
        labor_force: laus.and_then(|row| row.labor_force),
        population: demographics.and_then(|row| row.population),
        median_household_income: demographics.and_then(|row| row.median_household_income),
        median_age: demographics.and_then(|row| row.median_age),
        per_capita_income,
    }
}

/// County lookup that tries the canonical key, then its legacy alias
fn ct_aware_county<'a, V>(map: &'a BTreeMap<String, V>, fips: &str) -> Option<&'a V> {
    if let Some(row) = map.get(fips) {
        return Some(row);
    }
    if connecticut::is_region(fips) {
        if let Some(legacy) = connecticut::legacy_fallback(fips) {
            if legacy != connecticut::CT_STATEWIDE_SENTINEL {
                return map.get(legacy);
            }
        }
    }
    None
}

fn build_state(
    fips: &str,
    name: &str,
    inputs: &JoinInputs,
    counties: &BTreeMap<String, CountyRecord>,
) -> StateRecord {
    let state_counties: Vec<&CountyRecord> = counties
        .values()
        .filter(|c| c.fips.starts_with(fips))
        .collect();

    let laus = inputs.laus.as_ref().and_then(|l| l.states.get(fips));
    let demographics = inputs.demographics.as_ref().and_then(|d| d.states.get(fips));

    // Unemployment rate: survey's direct state series first; a ratio
    // derived from county counts only when it is absent
    let unemployment_rate = laus
        .and_then(|row| row.unemployment_rate)
        .or_else(|| derived_unemployment_rate(inputs, fips));

    let labor_force = laus
        .and_then(|row| row.labor_force)
        .or_else(|| sum_non_null(state_counties.iter().map(|c| c.labor_force)));

    let employed = laus.and_then(|row| row.employed);

    let population = demographics
        .and_then(|row| row.population)
        .or_else(|| sum_non_null(state_counties.iter().map(|c| c.population)));

    // Median household income: survey value first; else approximate with a
    // population-weighted average of county medians
    let median_household_income = demographics
        .and_then(|row| row.median_household_income)
        .or_else(|| {
            weighted_mean(
                state_counties
                    .iter()
                    .map(|c| (c.median_household_income, c.population)),
            )
        });

    StateRecord {
        fips: fips.to_string(),
        name: name.to_string(),
        unemployment_rate,
        labor_force,
        employed,
        avg_hourly_earnings: inputs
            .earnings
            .as_ref()
            .and_then(|e| e.states.get(fips))
            .and_then(|row| row.avg_hourly_earnings),
        job_openings_rate: inputs
            .jolts
            .as_ref()
            .and_then(|j| j.states.get(fips))
            .and_then(|row| row.openings_rate),
        population,
        median_household_income,
        median_age: demographics.and_then(|row| row.median_age),
        per_capita_income: inputs
            .income
            .as_ref()
            .and_then(|i| i.states.get(fips))
            .and_then(|row| row.per_capita_income),
    }
}

/// Unemployed ÷ labor force over counties reporting both, as a percentage
fn derived_unemployment_rate(inputs: &JoinInputs, state_fips: &str) -> Option<f64> {
    let laus = inputs.laus.as_ref()?;
    let mut unemployed_sum = 0.0;
    let mut labor_force_sum = 0.0;
    let mut contributing = 0usize;

    for (fips, row) in &laus.counties {
        if !fips.starts_with(state_fips) {
            continue;
        }
        // A county missing either count would bias the ratio; exclude it
        // from both sums
        if let (Some(unemployed), Some(labor_force)) = (row.unemployed, row.labor_force) {
            unemployed_sum += unemployed;
            labor_force_sum += labor_force;
            contributing += 1;
        }
    }

    if contributing == 0 || labor_force_sum == 0.0 {
        return None;
    }
    Some(unemployed_sum / labor_force_sum * 100.0)
}
