//! Occupation records from the occupational wage survey
//!
//! One record per (geography, SOC code). Wage figures are `None` when the
//! survey suppressed them; annual figures at the publication cap carry a
//! distinct flag so consumers can tell a true value from a top-coded one.

use serde::{Deserialize, Serialize};

/// Wage percentile set (10th/25th/75th/90th); the median lives on the record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WagePercentiles {
    pub p10: Option<f64>,
    pub p25: Option<f64>,
    pub p75: Option<f64>,
    pub p90: Option<f64>,
}

/// One occupation's employment and wage figures within one geography
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationRecord {
    /// Standard Occupational Classification code (`"29-1141"`)
    pub soc_code: String,
    /// Occupation title (`"Registered Nurses"`)
    pub title: String,
    /// Total employment in this occupation and geography
    pub employment: Option<f64>,
    /// Mean hourly wage
    pub hourly_mean: Option<f64>,
    /// Median hourly wage
    pub hourly_median: Option<f64>,
    /// Mean annual wage
    pub annual_mean: Option<f64>,
    /// Median annual wage
    pub annual_median: Option<f64>,
    /// Annual wage percentiles
    pub annual_percentiles: WagePercentiles,
    /// Hourly wage percentiles
    pub hourly_percentiles: WagePercentiles,
    /// True when any annual figure was top-coded at the publication cap
    pub wage_capped: bool,
}

impl OccupationRecord {
    /// 2-digit SOC major group prefix (`"29-1141"` → `"29"`)
    pub fn major_group(&self) -> &str {
        self.soc_code.get(..2).unwrap_or(&self.soc_code)
    }
}

/// Title of a 2-digit SOC major group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorGroup {
    /// 2-digit prefix (`"29"`)
    pub code: String,
    /// Group title (`"Healthcare Practitioners and Technical Occupations"`)
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_group_is_two_digit_prefix() {
        let record = OccupationRecord {
            soc_code: "29-1141".to_string(),
            title: "Registered Nurses".to_string(),
            employment: Some(3_175_390.0),
            hourly_mean: None,
            hourly_median: None,
            annual_mean: None,
            annual_median: None,
            annual_percentiles: WagePercentiles::default(),
            hourly_percentiles: WagePercentiles::default(),
            wage_capped: false,
        };
        assert_eq!(record.major_group(), "29");
    }
}
