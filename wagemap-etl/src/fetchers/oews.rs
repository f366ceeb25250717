//! Occupational wage survey fetcher (bulk CSV download)
//!
//! One flat file covers every (area, occupation) pair: national, state,
//! and metro rows are distinguished by an area-type column. Wage cells use
//! the survey's sentinel vocabulary (`*`, `**` suppression, `#` for
//! top-coded wages); `#` keeps the cap value but marks the record so
//! rankings can tell a true $208,000 from a truncated one.

use crate::clients::bulkfile::{parse_csv, AliasedField, BulkFileClient, FieldAliases, FieldMap};
use crate::geo::{Resolver, SourceScheme};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wagemap_common::models::observation::{parse_value, ParsedValue, WAGE_HOURLY_CAP};
use wagemap_common::models::{MajorGroup, OccupationRecord, WagePercentiles};
use wagemap_common::Result;

/// Declared column aliases for the survey export. Spellings drift between
/// releases; the table is validated against the real header before any row
/// is read.
const FIELDS: &[AliasedField] = &[
    AliasedField { canonical: "area", aliases: &["AREA", "area_code", "AREA_FIPS"], required: true },
    AliasedField { canonical: "area_type", aliases: &["AREA_TYPE", "areatype", "AREA_TYPE_CODE"], required: true },
    AliasedField { canonical: "occ_code", aliases: &["OCC_CODE", "occ code", "OCC_CODE_2010"], required: true },
    AliasedField { canonical: "occ_title", aliases: &["OCC_TITLE", "occ title"], required: true },
    AliasedField { canonical: "o_group", aliases: &["O_GROUP", "OCC_GROUP", "group"], required: false },
    AliasedField { canonical: "tot_emp", aliases: &["TOT_EMP", "employment"], required: true },
    AliasedField { canonical: "h_mean", aliases: &["H_MEAN", "hourly mean wage"], required: false },
    AliasedField { canonical: "a_mean", aliases: &["A_MEAN", "annual mean wage"], required: false },
    AliasedField { canonical: "h_median", aliases: &["H_MEDIAN", "H_PCT50", "hourly median wage"], required: false },
    AliasedField { canonical: "a_median", aliases: &["A_MEDIAN", "A_PCT50", "annual median wage"], required: false },
    AliasedField { canonical: "h_pct10", aliases: &["H_PCT10"], required: false },
    AliasedField { canonical: "h_pct25", aliases: &["H_PCT25"], required: false },
    AliasedField { canonical: "h_pct75", aliases: &["H_PCT75"], required: false },
    AliasedField { canonical: "h_pct90", aliases: &["H_PCT90"], required: false },
    AliasedField { canonical: "a_pct10", aliases: &["A_PCT10"], required: false },
    AliasedField { canonical: "a_pct25", aliases: &["A_PCT25"], required: false },
    AliasedField { canonical: "a_pct75", aliases: &["A_PCT75"], required: false },
    AliasedField { canonical: "a_pct90", aliases: &["A_PCT90"], required: false },
];

pub const ALIASES: FieldAliases = FieldAliases::new(FIELDS);

const AREA_TYPE_NATIONAL: &str = "1";
const AREA_TYPE_STATE: &str = "2";
const AREA_TYPE_METRO: &str = "4";

/// Raw artifact handed off to the joiner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OewsArtifact {
    pub year: i32,
    pub national: Vec<OccupationRecord>,
    /// Keyed by 2-digit state FIPS
    pub states: BTreeMap<String, Vec<OccupationRecord>>,
    /// Keyed by bare CBSA code (allow-listed metros only)
    pub metros: BTreeMap<String, Vec<OccupationRecord>>,
    /// 2-digit SOC major groups seen in the file, for the hierarchy index
    pub major_groups: Vec<MajorGroup>,
}

/// Download URL for one survey year's flat file
pub fn default_url(year: i32) -> String {
    format!(
        "https://www.bls.gov/oes/special-requests/oesm{:02}all.csv",
        year.rem_euclid(100)
    )
}

/// Download and parse the survey for one year
pub async fn fetch(client: &BulkFileClient, resolver: &Resolver, year: i32) -> Result<OewsArtifact> {
    let text = client.fetch_text(&default_url(year)).await?;
    parse(&text, resolver, year)
}

/// Parse the flat file into per-scope occupation records
pub fn parse(text: &str, resolver: &Resolver, year: i32) -> Result<OewsArtifact> {
    let (field_map, rows) = parse_csv(text, &ALIASES)?;

    let mut artifact = OewsArtifact {
        year,
        national: Vec::new(),
        states: BTreeMap::new(),
        metros: BTreeMap::new(),
        major_groups: Vec::new(),
    };
    let mut skipped = 0usize;

    for row in &rows {
        let Some(occ_code) = field_map.get(row, "occ_code").filter(|c| !c.is_empty()) else {
            skipped += 1;
            continue;
        };
        let Some(occ_title) = field_map.get(row, "occ_title").filter(|t| !t.is_empty()) else {
            skipped += 1;
            continue;
        };

        // Major-group rows only feed the hierarchy titles; the "total all
        // occupations" row feeds nothing.
        if is_total_row(occ_code) {
            continue;
        }
        if is_major_group_row(&field_map, row, occ_code) {
            let code = occ_code.get(..2).unwrap_or(occ_code).to_string();
            if !artifact.major_groups.iter().any(|g| g.code == code) {
                artifact.major_groups.push(MajorGroup {
                    code,
                    title: occ_title.to_string(),
                });
            }
            continue;
        }

        let record = build_record(&field_map, row, occ_code, occ_title);

        let area = field_map.get(row, "area").unwrap_or_default();
        match field_map.get(row, "area_type").unwrap_or_default() {
            AREA_TYPE_NATIONAL => artifact.national.push(record),
            AREA_TYPE_STATE => {
                let fips = normalize_state_area(area);
                artifact.states.entry(fips).or_default().push(record);
            }
            AREA_TYPE_METRO => {
                // Only allow-listed metros are published; others drop here
                if let Some(cbsa) = resolver.normalize(area, SourceScheme::PaddedAreaCode) {
                    artifact.metros.entry(cbsa).or_default().push(record);
                }
            }
            _ => {} // nonmetropolitan and other area types are out of scope
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "Wage survey rows skipped for missing code/title");
    }
    artifact.major_groups.sort_by(|a, b| a.code.cmp(&b.code));

    tracing::info!(
        national = artifact.national.len(),
        states = artifact.states.len(),
        metros = artifact.metros.len(),
        major_groups = artifact.major_groups.len(),
        "Wage survey parsed"
    );
    Ok(artifact)
}

fn is_total_row(occ_code: &str) -> bool {
    occ_code == "00-0000"
}

fn is_major_group_row(field_map: &FieldMap, row: &csv::StringRecord, occ_code: &str) -> bool {
    match field_map.get(row, "o_group") {
        Some(group) if !group.is_empty() => group.eq_ignore_ascii_case("major"),
        // Older files lack the group column; fall back to the code shape
        _ => occ_code.ends_with("-0000"),
    }
}

/// State rows publish the FIPS with inconsistent padding across releases
fn normalize_state_area(area: &str) -> String {
    let bare = area.trim_start_matches('0');
    format!("{:0>2}", bare)
}

/// Parse one wage cell; `#` resolves to the hourly or annual cap
fn parse_wage(cell: Option<&str>, hourly: bool) -> (Option<f64>, bool) {
    let Some(cell) = cell else {
        return (None, false);
    };
    match parse_value(cell) {
        ParsedValue::Number(v) => (Some(v), false),
        ParsedValue::Capped(annual_cap) => {
            let value = if hourly { WAGE_HOURLY_CAP } else { annual_cap };
            (Some(value), true)
        }
        ParsedValue::Missing => (None, false),
    }
}

fn build_record(
    field_map: &FieldMap,
    row: &csv::StringRecord,
    occ_code: &str,
    occ_title: &str,
) -> OccupationRecord {
    let mut capped = false;
    let mut wage = |canonical: &str, hourly: bool| {
        let (value, was_capped) = parse_wage(field_map.get(row, canonical), hourly);
        capped |= was_capped;
        value
    };

    let hourly_mean = wage("h_mean", true);
    let hourly_median = wage("h_median", true);
    let annual_mean = wage("a_mean", false);
    let annual_median = wage("a_median", false);
    let hourly_percentiles = WagePercentiles {
        p10: wage("h_pct10", true),
        p25: wage("h_pct25", true),
        p75: wage("h_pct75", true),
        p90: wage("h_pct90", true),
    };
    let annual_percentiles = WagePercentiles {
        p10: wage("a_pct10", false),
        p25: wage("a_pct25", false),
        p75: wage("a_pct75", false),
        p90: wage("a_pct90", false),
    };
    let employment = field_map
        .get(row, "tot_emp")
        .and_then(|c| parse_value(c).as_f64());

    OccupationRecord {
        soc_code: occ_code.to_string(),
        title: occ_title.to_string(),
        employment,
        hourly_mean,
        hourly_median,
        annual_mean,
        annual_median,
        annual_percentiles,
        hourly_percentiles,
        wage_capped: capped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "AREA,AREA_TYPE,OCC_CODE,OCC_TITLE,O_GROUP,TOT_EMP,H_MEAN,A_MEAN,H_MEDIAN,A_MEDIAN,H_PCT10,H_PCT25,H_PCT75,H_PCT90,A_PCT10,A_PCT25,A_PCT75,A_PCT90";

    fn parse_lines(lines: &[&str]) -> OewsArtifact {
        let text = format!("{}\n{}\n", HEADER, lines.join("\n"));
        parse(&text, &Resolver::new(), 2024).unwrap()
    }

    #[test]
    fn routes_rows_by_area_type() {
        let artifact = parse_lines(&[
            "99,1,29-1141,Registered Nurses,detailed,\"3,175,390\",42.80,89030,41.38,86070,30.48,35.24,49.07,62.25,63400,73310,102080,129480",
            "09,2,29-1141,Registered Nurses,detailed,35180,47.50,98800,46.10,95890,35.10,40.20,54.30,66.40,73000,83600,112900,138100",
            "0035620,4,29-1141,Registered Nurses,detailed,182550,51.20,106500,49.80,103580,37.90,43.40,58.70,71.70,78800,90300,122100,149100",
        ]);

        assert_eq!(artifact.national.len(), 1);
        assert_eq!(artifact.states["09"].len(), 1);
        assert_eq!(artifact.metros["35620"].len(), 1);
        assert_eq!(artifact.national[0].employment, Some(3_175_390.0));
    }

    #[test]
    fn capped_annual_wage_is_flagged_not_dropped() {
        let artifact = parse_lines(&[
            "99,1,29-1061,Anesthesiologists,detailed,33470,*,#,*,#,*,*,*,*,145000,190000,#,#",
        ]);

        let record = &artifact.national[0];
        assert!(record.wage_capped);
        assert_eq!(record.annual_mean, Some(208_000.0));
        assert_eq!(record.hourly_mean, None);
    }

    #[test]
    fn suppressed_wages_are_none_never_zero() {
        let artifact = parse_lines(&[
            "99,1,25-1081,Education Teachers,detailed,**,*,78240,*,72080,*,*,*,*,43630,55330,94480,122280",
        ]);

        let record = &artifact.national[0];
        assert_eq!(record.employment, None);
        assert_eq!(record.hourly_mean, None);
        assert_eq!(record.annual_mean, Some(78_240.0));
    }

    #[test]
    fn major_group_rows_feed_hierarchy_not_records() {
        let artifact = parse_lines(&[
            "99,1,29-0000,Healthcare Practitioners and Technical Occupations,major,9120950,41.32,85940,36.65,76230,18.92,25.08,48.32,63.79,39350,52170,100510,132680",
            "99,1,29-1141,Registered Nurses,detailed,3175390,42.80,89030,41.38,86070,30.48,35.24,49.07,62.25,63400,73310,102080,129480",
        ]);

        assert_eq!(artifact.national.len(), 1);
        assert_eq!(artifact.major_groups.len(), 1);
        assert_eq!(artifact.major_groups[0].code, "29");
    }

    #[test]
    fn total_row_is_ignored() {
        let artifact = parse_lines(&[
            "99,1,00-0000,All Occupations,total,151853870,31.48,65470,23.11,48060,13.92,17.84,37.68,60.00,28960,37110,78370,124800",
        ]);
        assert!(artifact.national.is_empty());
        assert!(artifact.major_groups.is_empty());
    }

    #[test]
    fn unlisted_metro_rows_are_dropped() {
        let artifact = parse_lines(&[
            "0012345,4,29-1141,Registered Nurses,detailed,100,1,1,1,1,1,1,1,1,1,1,1,1",
        ]);
        assert!(artifact.metros.is_empty());
    }
}
