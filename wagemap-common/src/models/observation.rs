//! Raw time-series observations and defensive numeric parsing
//!
//! Observations are immutable once fetched: a later run supersedes them by
//! rewriting the raw artifact, never by mutating records in place.

use serde::{Deserialize, Serialize};

/// Pseudo-period the provider uses for the annual average of a year's
/// monthly observations.
pub const ANNUAL_AVERAGE_PERIOD: &str = "M13";

/// One (series, year, period) data point as fetched from a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesObservation {
    /// Opaque provider series identifier
    pub series_id: String,
    /// Observation year
    pub year: i32,
    /// Provider period code (`M01`..`M12`, `M13` annual average, `A01`, ...)
    pub period: String,
    /// Parsed value; `None` when the provider sent a placeholder sentinel
    pub value: Option<f64>,
    /// True when the raw value was a sentinel token rather than a number
    pub sentinel: bool,
}

impl SeriesObservation {
    /// True for the annual-average pseudo-period
    pub fn is_annual_average(&self) -> bool {
        self.period == ANNUAL_AVERAGE_PERIOD
    }
}

/// Result of parsing one raw provider value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedValue {
    /// Clean numeric value
    Number(f64),
    /// Numeric value the provider truncated at its publication cap
    /// (annual wages at or above the cap are reported as the cap itself)
    Capped(f64),
    /// Placeholder sentinel; no usable value
    Missing,
}

impl ParsedValue {
    /// The numeric value, if any (capped values are still numeric)
    pub fn as_f64(self) -> Option<f64> {
        match self {
            ParsedValue::Number(v) | ParsedValue::Capped(v) => Some(v),
            ParsedValue::Missing => None,
        }
    }

    pub fn is_capped(self) -> bool {
        matches!(self, ParsedValue::Capped(_))
    }
}

/// Annual wage figure providers substitute for capped values.
///
/// Wage surveys top-code high salaries: any annual wage at or above this
/// amount is published as exactly this amount, flagged upstream with `#`.
pub const WAGE_ANNUAL_CAP: f64 = 208_000.0;

/// Hourly wage equivalent of the annual cap
pub const WAGE_HOURLY_CAP: f64 = 100.0;

/// Parse one raw provider value into a clean float, `Capped`, or `Missing`.
///
/// Handles the placeholder tokens government sources actually emit (`-`,
/// `*`, `**`, `(D)`, `N/A`, `NA`, empty), the capped-wage marker `#`, and
/// comma-formatted numbers (`"1,234.5"`). No sentinel string may survive
/// past the fetcher boundary, so this is the single place raw strings
/// become numbers.
pub fn parse_value(raw: &str) -> ParsedValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedValue::Missing;
    }
    match trimmed {
        "-" | "*" | "**" | "(D)" | "N/A" | "NA" | "n/a" => return ParsedValue::Missing,
        "#" => return ParsedValue::Capped(WAGE_ANNUAL_CAP),
        _ => {}
    }

    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => ParsedValue::Number(v),
        _ => ParsedValue::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_value("4.2"), ParsedValue::Number(4.2));
        assert_eq!(parse_value(" 17 "), ParsedValue::Number(17.0));
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_value("1,234,567"), ParsedValue::Number(1_234_567.0));
        assert_eq!(parse_value("50,637.5"), ParsedValue::Number(50_637.5));
    }

    #[test]
    fn sentinels_become_missing_never_zero() {
        for raw in ["-", "*", "**", "(D)", "N/A", "NA", "", "  "] {
            assert_eq!(parse_value(raw), ParsedValue::Missing, "raw {:?}", raw);
        }
    }

    #[test]
    fn cap_marker_is_capped_not_missing() {
        let parsed = parse_value("#");
        assert!(parsed.is_capped());
        assert_eq!(parsed.as_f64(), Some(WAGE_ANNUAL_CAP));
    }

    #[test]
    fn garbage_is_missing() {
        assert_eq!(parse_value("abc"), ParsedValue::Missing);
        assert_eq!(parse_value("NaN"), ParsedValue::Missing);
    }
}
