//! Curated metro allow-list
//!
//! Not every source covers every metro, and the presentation layer only
//! renders the majors, so the pipeline works from a fixed allow-list of
//! CBSA codes rather than the full federal delineation file. Canonical key
//! is the bare 5-digit CBSA code.

/// One allow-listed metro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metro {
    /// Bare 5-digit CBSA code (canonical)
    pub cbsa: &'static str,
    /// 2-digit FIPS of the metro's primary state (series-id construction)
    pub state: &'static str,
    /// Official delineation title
    pub name: &'static str,
}

/// Major metros the pipeline publishes, in CBSA order
pub const METRO_ALLOW_LIST: &[Metro] = &[
    Metro { cbsa: "12060", state: "13", name: "Atlanta-Sandy Springs-Roswell, GA" },
    Metro { cbsa: "12420", state: "48", name: "Austin-Round Rock, TX" },
    Metro { cbsa: "12580", state: "24", name: "Baltimore-Columbia-Towson, MD" },
    Metro { cbsa: "14460", state: "25", name: "Boston-Cambridge-Newton, MA-NH" },
    Metro { cbsa: "16740", state: "37", name: "Charlotte-Concord-Gastonia, NC-SC" },
    Metro { cbsa: "16980", state: "17", name: "Chicago-Naperville-Elgin, IL-IN-WI" },
    Metro { cbsa: "17140", state: "39", name: "Cincinnati, OH-KY-IN" },
    Metro { cbsa: "17460", state: "39", name: "Cleveland-Elyria, OH" },
    Metro { cbsa: "18140", state: "39", name: "Columbus, OH" },
    Metro { cbsa: "19100", state: "48", name: "Dallas-Fort Worth-Arlington, TX" },
    Metro { cbsa: "19740", state: "08", name: "Denver-Aurora-Lakewood, CO" },
    Metro { cbsa: "19820", state: "26", name: "Detroit-Warren-Dearborn, MI" },
    Metro { cbsa: "26420", state: "48", name: "Houston-The Woodlands-Sugar Land, TX" },
    Metro { cbsa: "26900", state: "18", name: "Indianapolis-Carmel-Anderson, IN" },
    Metro { cbsa: "28140", state: "29", name: "Kansas City, MO-KS" },
    Metro { cbsa: "29820", state: "32", name: "Las Vegas-Henderson-Paradise, NV" },
    Metro { cbsa: "31080", state: "06", name: "Los Angeles-Long Beach-Anaheim, CA" },
    Metro { cbsa: "33100", state: "12", name: "Miami-Fort Lauderdale-West Palm Beach, FL" },
    Metro { cbsa: "33460", state: "27", name: "Minneapolis-St. Paul-Bloomington, MN-WI" },
    Metro { cbsa: "34980", state: "47", name: "Nashville-Davidson--Murfreesboro--Franklin, TN" },
    Metro { cbsa: "35620", state: "36", name: "New York-Newark-Jersey City, NY-NJ-PA" },
    Metro { cbsa: "36740", state: "12", name: "Orlando-Kissimmee-Sanford, FL" },
    Metro { cbsa: "37980", state: "42", name: "Philadelphia-Camden-Wilmington, PA-NJ-DE-MD" },
    Metro { cbsa: "38060", state: "04", name: "Phoenix-Mesa-Scottsdale, AZ" },
    Metro { cbsa: "38300", state: "42", name: "Pittsburgh, PA" },
    Metro { cbsa: "38900", state: "41", name: "Portland-Vancouver-Hillsboro, OR-WA" },
    Metro { cbsa: "40140", state: "06", name: "Riverside-San Bernardino-Ontario, CA" },
    Metro { cbsa: "40900", state: "06", name: "Sacramento--Roseville--Arden-Arcade, CA" },
    Metro { cbsa: "41180", state: "29", name: "St. Louis, MO-IL" },
    Metro { cbsa: "41700", state: "48", name: "San Antonio-New Braunfels, TX" },
    Metro { cbsa: "41740", state: "06", name: "San Diego-Carlsbad, CA" },
    Metro { cbsa: "41860", state: "06", name: "San Francisco-Oakland-Hayward, CA" },
    Metro { cbsa: "42660", state: "53", name: "Seattle-Tacoma-Bellevue, WA" },
    Metro { cbsa: "45300", state: "12", name: "Tampa-St. Petersburg-Clearwater, FL" },
    Metro { cbsa: "47900", state: "11", name: "Washington-Arlington-Alexandria, DC-VA-MD-WV" },
];

/// Zero-padded 7-digit provider form of a CBSA code
pub fn padded_area_code(cbsa: &str) -> String {
    format!("{:0>7}", cbsa)
}
