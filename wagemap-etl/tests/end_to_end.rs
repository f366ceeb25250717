//! Fixture run through the joiner and publisher: one state, three
//! counties, two occupations, with hand-computable expected outputs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wagemap_common::models::{
    DemographicsRow, IncomeRow, LaborForceRow, MajorGroup, OccupationRecord, ProjectionRow,
    WagePercentiles,
};
use wagemap_etl::fetchers::demographics::DemographicsArtifact;
use wagemap_etl::fetchers::income::IncomeArtifact;
use wagemap_etl::fetchers::laus::LausArtifact;
use wagemap_etl::fetchers::oews::OewsArtifact;
use wagemap_etl::fetchers::projections::ProjectionsArtifact;
use wagemap_etl::geo::Resolver;
use wagemap_etl::joiner::{self, JoinInputs};
use wagemap_etl::publish;

const STATE: &str = "06";
const COUNTIES: [&str; 3] = ["06037", "06059", "06073"];

fn laus_fixture() -> LausArtifact {
    let mut artifact = LausArtifact {
        year: 2024,
        national: LaborForceRow {
            unemployment_rate: Some(4.1),
            labor_force: Some(168_000_000.0),
            ..Default::default()
        },
        states: BTreeMap::new(),
        counties: BTreeMap::new(),
        metros: BTreeMap::new(),
        complete: true,
    };
    artifact.states.insert(
        STATE.to_string(),
        LaborForceRow {
            unemployment_rate: Some(5.3),
            labor_force: Some(19_500_000.0),
            employed: Some(18_466_500.0),
            ..Default::default()
        },
    );
    for (fips, rate) in COUNTIES.iter().zip([5.9, 4.1, 4.5]) {
        artifact.counties.insert(
            fips.to_string(),
            LaborForceRow {
                unemployment_rate: Some(rate),
                labor_force: Some(1_000_000.0),
                ..Default::default()
            },
        );
    }
    artifact
}

/// Populations 100 / 200 / absent, incomes 50 000 / 60 000 / 70 000.
/// No state-level census row, so the state median household income must be
/// the population-weighted county average:
/// (100·50000 + 200·60000) / 300 = 56 666.67
fn demographics_fixture() -> DemographicsArtifact {
    let mut artifact = DemographicsArtifact {
        year: 2023,
        national: DemographicsRow::default(),
        states: BTreeMap::new(),
        counties: BTreeMap::new(),
    };
    let rows = [
        ("06037", Some(100.0), 50_000.0),
        ("06059", Some(200.0), 60_000.0),
        ("06073", None, 70_000.0),
    ];
    for (fips, population, income) in rows {
        artifact.counties.insert(
            fips.to_string(),
            DemographicsRow {
                name: Some(format!("County {fips}")),
                population,
                median_household_income: Some(income),
                median_age: None,
            },
        );
    }
    artifact
}

fn income_fixture() -> IncomeArtifact {
    let mut artifact = IncomeArtifact {
        year: 2024,
        states: BTreeMap::new(),
        counties: BTreeMap::new(),
    };
    artifact.states.insert(
        STATE.to_string(),
        IncomeRow {
            per_capita_income: Some(81_255.0),
        },
    );
    artifact
}

fn occupation(soc: &str, title: &str, employment: f64, annual_median: Option<f64>) -> OccupationRecord {
    OccupationRecord {
        soc_code: soc.to_string(),
        title: title.to_string(),
        employment: Some(employment),
        hourly_mean: None,
        hourly_median: None,
        annual_mean: None,
        annual_median,
        annual_percentiles: WagePercentiles::default(),
        hourly_percentiles: WagePercentiles::default(),
        wage_capped: false,
    }
}

fn oews_fixture() -> OewsArtifact {
    let mut artifact = OewsArtifact {
        year: 2024,
        national: vec![
            occupation("29-1141", "Registered Nurses", 3_175_390.0, Some(86_070.0)),
            occupation("15-1252", "Software Developers", 1_656_880.0, Some(130_160.0)),
        ],
        states: BTreeMap::new(),
        metros: BTreeMap::new(),
        major_groups: vec![
            MajorGroup {
                code: "15".to_string(),
                title: "Computer and Mathematical Occupations".to_string(),
            },
            MajorGroup {
                code: "29".to_string(),
                title: "Healthcare Practitioners and Technical Occupations".to_string(),
            },
        ],
    };
    artifact.states.insert(
        STATE.to_string(),
        vec![occupation("29-1141", "Registered Nurses", 324_400.0, Some(133_340.0))],
    );
    artifact
}

fn projections_fixture() -> ProjectionsArtifact {
    let mut occupations = BTreeMap::new();
    occupations.insert(
        "29-1141".to_string(),
        ProjectionRow {
            soc_code: "29-1141".to_string(),
            base_employment: Some(3_175.4),
            projected_employment: Some(3_369.9),
            pct_change: Some(6.1),
            annual_openings: Some(193.1),
        },
    );
    ProjectionsArtifact { occupations }
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("reading {}: {e}", path.display()));
    serde_json::from_str(&text).unwrap()
}

fn run_fixture(output_dir: &Path) {
    let inputs = JoinInputs {
        laus: Some(laus_fixture()),
        demographics: Some(demographics_fixture()),
        income: Some(income_fixture()),
        ..Default::default()
    };
    let geography = joiner::build(&Resolver::new(), &inputs);
    let occupations = joiner::build_occupations(Some(oews_fixture()), Some(projections_fixture()));
    publish::publish_all(output_dir, &geography, &occupations, 2024).unwrap();
}

#[test]
fn state_record_uses_direct_series_and_weighted_fallback() {
    let inputs = JoinInputs {
        laus: Some(laus_fixture()),
        demographics: Some(demographics_fixture()),
        income: Some(income_fixture()),
        ..Default::default()
    };
    let geography = joiner::build(&Resolver::new(), &inputs);

    let state = &geography.states[STATE];
    // Direct series wins over any county-derived ratio
    assert_eq!(state.unemployment_rate, Some(5.3));
    // No census state row: population-weighted county fallback
    let mhi = state.median_household_income.unwrap();
    assert!((mhi - 56_666.666_666_666_664).abs() < 1e-6, "got {mhi}");
    // Population roll-up sums only the two counties that reported one
    assert_eq!(state.population, Some(300.0));
    assert_eq!(state.per_capita_income, Some(81_255.0));
    assert_eq!(geography.counties.len(), 3);
}

#[test]
fn published_files_exist_and_agree() {
    let dir = TempDir::new().unwrap();
    run_fixture(dir.path());

    let occupation_doc = read_json(&dir.path().join("occupations/29-1141.json"));
    let area_doc = read_json(&dir.path().join("areas/06.json"));
    let national_doc = read_json(&dir.path().join("national.json"));

    // Cross-index consistency: the same figure wherever it appears
    let from_occupation = occupation_doc["states"][STATE]["ad"].as_f64().unwrap();
    let from_area = area_doc["occupations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["soc"] == "29-1141")
        .unwrap()["ad"]
        .as_f64()
        .unwrap();
    assert_eq!(from_occupation, 133_340.0);
    assert_eq!(from_occupation, from_area);

    let from_national = national_doc["occupations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["soc"] == "29-1141")
        .unwrap()["ad"]
        .as_f64()
        .unwrap();
    assert_eq!(from_national, occupation_doc["us"]["ad"].as_f64().unwrap());

    // Outlook joined from the projections matrix
    assert_eq!(occupation_doc["outlook"]["pct"].as_f64(), Some(6.1));

    // Area snapshot carries the joined state metrics
    assert_eq!(area_doc["snapshot"]["ur"].as_f64(), Some(5.3));
    assert_eq!(area_doc["counties"].as_array().unwrap().len(), 3);
}

#[test]
fn absent_metrics_are_omitted_not_zero() {
    let dir = TempDir::new().unwrap();
    run_fixture(dir.path());

    let area_doc = read_json(&dir.path().join("areas/06.json"));
    // No earnings or openings source ran; the keys must be absent entirely
    assert!(area_doc["snapshot"].get("ahe").is_none());
    assert!(area_doc["snapshot"].get("jor").is_none());

    let national_doc = read_json(&dir.path().join("national.json"));
    assert!(national_doc["snapshot"].get("cpi").is_none());
    assert_eq!(national_doc["snapshot"]["ur"].as_f64(), Some(4.1));
}

#[test]
fn search_index_is_sorted_and_stemmed() {
    let dir = TempDir::new().unwrap();
    run_fixture(dir.path());

    let index = read_json(&dir.path().join("search-index.json"));
    let entries = index["entries"].as_array().unwrap();

    let occupations: Vec<&serde_json::Value> = entries
        .iter()
        .filter(|e| e["kind"] == "occupation")
        .collect();
    // Employment descending: nurses (3.17M) before developers (1.66M)
    assert_eq!(occupations[0]["id"], "29-1141");
    assert_eq!(occupations[1]["id"], "15-1252");

    let keywords: Vec<&str> = occupations[0]["keywords"]
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k.as_str().unwrap())
        .collect();
    assert!(keywords.contains(&"registered"));
    assert!(keywords.contains(&"nurses"));
    assert!(keywords.contains(&"nurse"));
}

#[test]
fn hierarchy_groups_national_occupations() {
    let dir = TempDir::new().unwrap();
    run_fixture(dir.path());

    let hierarchy = read_json(&dir.path().join("hierarchy.json"));
    let groups = hierarchy["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["code"], "15");
    assert_eq!(
        groups[1]["title"],
        "Healthcare Practitioners and Technical Occupations"
    );
    assert_eq!(groups[1]["occupations"][0]["soc"], "29-1141");
}

#[test]
fn ticker_carries_only_present_headline_metrics() {
    let dir = TempDir::new().unwrap();
    run_fixture(dir.path());

    let ticker = read_json(&dir.path().join("summary-ticker.json"));
    assert_eq!(ticker["year"], 2024);
    let ids: Vec<&str> = ticker["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"unemployment-rate"));
    assert!(ids.contains(&"labor-force"));
    assert!(!ids.contains(&"cpi-yoy"), "no consumer-price source ran");
}

#[test]
fn rerun_is_byte_identical() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    run_fixture(first.path());
    run_fixture(second.path());

    for file in ["national.json", "hierarchy.json", "search-index.json", "areas/06.json"] {
        let a = fs::read(first.path().join(file)).unwrap();
        let b = fs::read(second.path().join(file)).unwrap();
        assert_eq!(a, b, "{file} differs between identical runs");
    }
}
