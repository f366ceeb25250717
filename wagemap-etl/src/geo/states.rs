//! State lookup tables: FIPS, postal abbreviation, display name

/// One state (or DC) entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    /// 2-digit FIPS code
    pub fips: &'static str,
    /// Postal abbreviation
    pub postal: &'static str,
    /// Display name
    pub name: &'static str,
}

/// The 50 states plus the District of Columbia, in FIPS order
pub const STATES: &[State] = &[
    State { fips: "01", postal: "AL", name: "Alabama" },
    State { fips: "02", postal: "AK", name: "Alaska" },
    State { fips: "04", postal: "AZ", name: "Arizona" },
    State { fips: "05", postal: "AR", name: "Arkansas" },
    State { fips: "06", postal: "CA", name: "California" },
    State { fips: "08", postal: "CO", name: "Colorado" },
    State { fips: "09", postal: "CT", name: "Connecticut" },
    State { fips: "10", postal: "DE", name: "Delaware" },
    State { fips: "11", postal: "DC", name: "District of Columbia" },
    State { fips: "12", postal: "FL", name: "Florida" },
    State { fips: "13", postal: "GA", name: "Georgia" },
    State { fips: "15", postal: "HI", name: "Hawaii" },
    State { fips: "16", postal: "ID", name: "Idaho" },
    State { fips: "17", postal: "IL", name: "Illinois" },
    State { fips: "18", postal: "IN", name: "Indiana" },
    State { fips: "19", postal: "IA", name: "Iowa" },
    State { fips: "20", postal: "KS", name: "Kansas" },
    State { fips: "21", postal: "KY", name: "Kentucky" },
    State { fips: "22", postal: "LA", name: "Louisiana" },
    State { fips: "23", postal: "ME", name: "Maine" },
    State { fips: "24", postal: "MD", name: "Maryland" },
    State { fips: "25", postal: "MA", name: "Massachusetts" },
    State { fips: "26", postal: "MI", name: "Michigan" },
    State { fips: "27", postal: "MN", name: "Minnesota" },
    State { fips: "28", postal: "MS", name: "Mississippi" },
    State { fips: "29", postal: "MO", name: "Missouri" },
    State { fips: "30", postal: "MT", name: "Montana" },
    State { fips: "31", postal: "NE", name: "Nebraska" },
    State { fips: "32", postal: "NV", name: "Nevada" },
    State { fips: "33", postal: "NH", name: "New Hampshire" },
    State { fips: "34", postal: "NJ", name: "New Jersey" },
    State { fips: "35", postal: "NM", name: "New Mexico" },
    State { fips: "36", postal: "NY", name: "New York" },
    State { fips: "37", postal: "NC", name: "North Carolina" },
    State { fips: "38", postal: "ND", name: "North Dakota" },
    State { fips: "39", postal: "OH", name: "Ohio" },
    State { fips: "40", postal: "OK", name: "Oklahoma" },
    State { fips: "41", postal: "OR", name: "Oregon" },
    State { fips: "42", postal: "PA", name: "Pennsylvania" },
    State { fips: "44", postal: "RI", name: "Rhode Island" },
    State { fips: "45", postal: "SC", name: "South Carolina" },
    State { fips: "46", postal: "SD", name: "South Dakota" },
    State { fips: "47", postal: "TN", name: "Tennessee" },
    State { fips: "48", postal: "TX", name: "Texas" },
    State { fips: "49", postal: "UT", name: "Utah" },
    State { fips: "50", postal: "VT", name: "Vermont" },
    State { fips: "51", postal: "VA", name: "Virginia" },
    State { fips: "53", postal: "WA", name: "Washington" },
    State { fips: "54", postal: "WV", name: "West Virginia" },
    State { fips: "55", postal: "WI", name: "Wisconsin" },
    State { fips: "56", postal: "WY", name: "Wyoming" },
];

/// Lookup by 2-digit FIPS
pub fn by_fips(fips: &str) -> Option<&'static State> {
    STATES.iter().find(|s| s.fips == fips)
}

/// Lookup by postal abbreviation
pub fn by_postal(postal: &str) -> Option<&'static State> {
    STATES.iter().find(|s| s.postal.eq_ignore_ascii_case(postal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_one_states() {
        assert_eq!(STATES.len(), 51);
    }

    #[test]
    fn fips_codes_are_unique_and_sorted() {
        for pair in STATES.windows(2) {
            assert!(pair[0].fips < pair[1].fips);
        }
    }

    #[test]
    fn lookups_work() {
        assert_eq!(by_fips("09").unwrap().postal, "CT");
        assert_eq!(by_postal("tx").unwrap().fips, "48");
        assert!(by_fips("03").is_none());
    }
}
