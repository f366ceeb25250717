//! Per-source partial rows and joined canonical records
//!
//! Each fetcher hands off rows of exactly one shape; the joiner merges them
//! into canonical per-geography records. Absent metrics stay `None` all the
//! way through: the joiner never fabricates a value, and publishers omit
//! null fields from output.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Per-source partial rows (fetcher → joiner handoff)
// ---------------------------------------------------------------------------

/// Labor-force survey row (one geography)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaborForceRow {
    pub unemployment_rate: Option<f64>,
    pub unemployed: Option<f64>,
    pub employed: Option<f64>,
    pub labor_force: Option<f64>,
}

/// Earnings survey row (one geography)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EarningsRow {
    pub avg_hourly_earnings: Option<f64>,
    pub avg_weekly_hours: Option<f64>,
}

/// Consumer price survey row (one index area)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpiRow {
    /// Index level for the reference period
    pub index_value: Option<f64>,
    /// Percent change vs the same period one year earlier
    pub yoy_pct_change: Option<f64>,
}

/// Job-openings survey row (one geography)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoltsRow {
    pub openings_rate: Option<f64>,
    pub hires_rate: Option<f64>,
    pub quits_rate: Option<f64>,
}

/// Census demographics row (one geography)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicsRow {
    /// Display name as published ("Los Angeles County, California")
    pub name: Option<String>,
    pub population: Option<f64>,
    pub median_household_income: Option<f64>,
    pub median_age: Option<f64>,
}

/// Regional income row (one geography)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeRow {
    pub per_capita_income: Option<f64>,
}

/// Employment projection row (one occupation, national)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub soc_code: String,
    pub base_employment: Option<f64>,
    pub projected_employment: Option<f64>,
    pub pct_change: Option<f64>,
    pub annual_openings: Option<f64>,
}

// ---------------------------------------------------------------------------
// Canonical records (joiner output)
// ---------------------------------------------------------------------------

/// Canonical state labor/economic snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    /// 2-digit state FIPS
    pub fips: String,
    pub name: String,
    pub unemployment_rate: Option<f64>,
    pub labor_force: Option<f64>,
    pub employed: Option<f64>,
    pub avg_hourly_earnings: Option<f64>,
    pub job_openings_rate: Option<f64>,
    pub population: Option<f64>,
    pub median_household_income: Option<f64>,
    pub median_age: Option<f64>,
    pub per_capita_income: Option<f64>,
}

/// Canonical county demographic + labor record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountyRecord {
    /// 5-digit county FIPS
    pub fips: String,
    pub name: String,
    pub unemployment_rate: Option<f64>,
    pub labor_force: Option<f64>,
    pub population: Option<f64>,
    pub median_household_income: Option<f64>,
    pub median_age: Option<f64>,
    pub per_capita_income: Option<f64>,
}

/// Canonical metro labor snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetroRecord {
    /// Bare 5-digit CBSA code
    pub cbsa: String,
    pub name: String,
    pub unemployment_rate: Option<f64>,
    pub employed: Option<f64>,
    pub labor_force: Option<f64>,
}

/// Canonical national headline snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NationalSnapshot {
    pub unemployment_rate: Option<f64>,
    pub labor_force: Option<f64>,
    pub avg_hourly_earnings: Option<f64>,
    pub cpi_yoy_pct_change: Option<f64>,
    pub job_openings_rate: Option<f64>,
    pub quits_rate: Option<f64>,
}
