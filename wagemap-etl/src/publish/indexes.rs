//! Index file document types and projections
//!
//! Every document here is a pure projection of the in-memory canonical
//! dataset, so cross-file consistency is structural rather than checked.
//! Field names are short serde renames and null metrics are omitted
//! outright; the published files are read-optimized, not self-describing.

use crate::joiner::{CanonicalDataset, OccupationDataset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wagemap_common::models::{
    CountyRecord, GeoKind, MetroRecord, NationalSnapshot, OccupationRecord, ProjectionRow,
    StateRecord,
};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Wage and employment figures for one occupation in one geography
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WageDoc {
    #[serde(rename = "e", skip_serializing_if = "Option::is_none")]
    pub employment: Option<f64>,
    #[serde(rename = "hm", skip_serializing_if = "Option::is_none")]
    pub hourly_mean: Option<f64>,
    #[serde(rename = "hd", skip_serializing_if = "Option::is_none")]
    pub hourly_median: Option<f64>,
    #[serde(rename = "am", skip_serializing_if = "Option::is_none")]
    pub annual_mean: Option<f64>,
    #[serde(rename = "ad", skip_serializing_if = "Option::is_none")]
    pub annual_median: Option<f64>,
    #[serde(rename = "a10", skip_serializing_if = "Option::is_none")]
    pub annual_p10: Option<f64>,
    #[serde(rename = "a25", skip_serializing_if = "Option::is_none")]
    pub annual_p25: Option<f64>,
    #[serde(rename = "a75", skip_serializing_if = "Option::is_none")]
    pub annual_p75: Option<f64>,
    #[serde(rename = "a90", skip_serializing_if = "Option::is_none")]
    pub annual_p90: Option<f64>,
    #[serde(rename = "h10", skip_serializing_if = "Option::is_none")]
    pub hourly_p10: Option<f64>,
    #[serde(rename = "h25", skip_serializing_if = "Option::is_none")]
    pub hourly_p25: Option<f64>,
    #[serde(rename = "h75", skip_serializing_if = "Option::is_none")]
    pub hourly_p75: Option<f64>,
    #[serde(rename = "h90", skip_serializing_if = "Option::is_none")]
    pub hourly_p90: Option<f64>,
    /// Top-coded at the publication cap; value kept, flag distinguishes
    #[serde(rename = "cap", skip_serializing_if = "is_false")]
    pub capped: bool,
}

impl WageDoc {
    pub fn from_record(record: &OccupationRecord) -> Self {
        Self {
            employment: record.employment,
            hourly_mean: record.hourly_mean,
            hourly_median: record.hourly_median,
            annual_mean: record.annual_mean,
            annual_median: record.annual_median,
            annual_p10: record.annual_percentiles.p10,
            annual_p25: record.annual_percentiles.p25,
            annual_p75: record.annual_percentiles.p75,
            annual_p90: record.annual_percentiles.p90,
            hourly_p10: record.hourly_percentiles.p10,
            hourly_p25: record.hourly_percentiles.p25,
            hourly_p75: record.hourly_percentiles.p75,
            hourly_p90: record.hourly_percentiles.p90,
            capped: record.wage_capped,
        }
    }
}

/// Decade-out employment outlook for one occupation (national)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlookDoc {
    #[serde(rename = "base", skip_serializing_if = "Option::is_none")]
    pub base_employment: Option<f64>,
    #[serde(rename = "proj", skip_serializing_if = "Option::is_none")]
    pub projected_employment: Option<f64>,
    #[serde(rename = "pct", skip_serializing_if = "Option::is_none")]
    pub pct_change: Option<f64>,
    #[serde(rename = "open", skip_serializing_if = "Option::is_none")]
    pub annual_openings: Option<f64>,
}

impl OutlookDoc {
    fn from_row(row: &ProjectionRow) -> Self {
        Self {
            base_employment: row.base_employment,
            projected_employment: row.projected_employment,
            pct_change: row.pct_change,
            annual_openings: row.annual_openings,
        }
    }
}

/// `occupations/<soc>.json`: one occupation across every geography
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccupationDoc {
    pub soc: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlook: Option<OutlookDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub us: Option<WageDoc>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub states: BTreeMap<String, WageDoc>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metros: BTreeMap<String, WageDoc>,
}

/// Labor/economic snapshot metrics for an area
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotDoc {
    #[serde(rename = "ur", skip_serializing_if = "Option::is_none")]
    pub unemployment_rate: Option<f64>,
    #[serde(rename = "lf", skip_serializing_if = "Option::is_none")]
    pub labor_force: Option<f64>,
    #[serde(rename = "emp", skip_serializing_if = "Option::is_none")]
    pub employed: Option<f64>,
    #[serde(rename = "ahe", skip_serializing_if = "Option::is_none")]
    pub avg_hourly_earnings: Option<f64>,
    #[serde(rename = "jor", skip_serializing_if = "Option::is_none")]
    pub job_openings_rate: Option<f64>,
    #[serde(rename = "pop", skip_serializing_if = "Option::is_none")]
    pub population: Option<f64>,
    #[serde(rename = "mhi", skip_serializing_if = "Option::is_none")]
    pub median_household_income: Option<f64>,
    #[serde(rename = "age", skip_serializing_if = "Option::is_none")]
    pub median_age: Option<f64>,
    #[serde(rename = "pci", skip_serializing_if = "Option::is_none")]
    pub per_capita_income: Option<f64>,
}

impl SnapshotDoc {
    fn from_state(record: &StateRecord) -> Self {
        Self {
            unemployment_rate: record.unemployment_rate,
            labor_force: record.labor_force,
            employed: record.employed,
            avg_hourly_earnings: record.avg_hourly_earnings,
            job_openings_rate: record.job_openings_rate,
            population: record.population,
            median_household_income: record.median_household_income,
            median_age: record.median_age,
            per_capita_income: record.per_capita_income,
        }
    }

    fn from_metro(record: &MetroRecord) -> Self {
        Self {
            unemployment_rate: record.unemployment_rate,
            labor_force: record.labor_force,
            employed: record.employed,
            ..Default::default()
        }
    }
}

/// County row within a state area document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountyDoc {
    pub fips: String,
    pub name: String,
    #[serde(rename = "ur", skip_serializing_if = "Option::is_none")]
    pub unemployment_rate: Option<f64>,
    #[serde(rename = "lf", skip_serializing_if = "Option::is_none")]
    pub labor_force: Option<f64>,
    #[serde(rename = "pop", skip_serializing_if = "Option::is_none")]
    pub population: Option<f64>,
    #[serde(rename = "mhi", skip_serializing_if = "Option::is_none")]
    pub median_household_income: Option<f64>,
    #[serde(rename = "age", skip_serializing_if = "Option::is_none")]
    pub median_age: Option<f64>,
    #[serde(rename = "pci", skip_serializing_if = "Option::is_none")]
    pub per_capita_income: Option<f64>,
}

impl CountyDoc {
    fn from_record(record: &CountyRecord) -> Self {
        Self {
            fips: record.fips.clone(),
            name: record.name.clone(),
            unemployment_rate: record.unemployment_rate,
            labor_force: record.labor_force,
            population: record.population,
            median_household_income: record.median_household_income,
            median_age: record.median_age,
            per_capita_income: record.per_capita_income,
        }
    }
}

/// Occupation row within an area or national document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaOccupationDoc {
    pub soc: String,
    pub title: String,
    #[serde(flatten)]
    pub wages: WageDoc,
}

impl AreaOccupationDoc {
    fn from_record(record: &OccupationRecord) -> Self {
        Self {
            soc: record.soc_code.clone(),
            title: record.title.clone(),
            wages: WageDoc::from_record(record),
        }
    }
}

/// `areas/<area>.json`: one area across every occupation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaDoc {
    pub id: String,
    pub kind: Option<GeoKind>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub counties: Vec<CountyDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub occupations: Vec<AreaOccupationDoc>,
}

/// `national.json`: headline snapshot plus all national occupations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NationalDoc {
    pub snapshot: NationalSnapshotDoc,
    pub occupations: Vec<AreaOccupationDoc>,
}

/// National headline metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NationalSnapshotDoc {
    #[serde(rename = "ur", skip_serializing_if = "Option::is_none")]
    pub unemployment_rate: Option<f64>,
    #[serde(rename = "lf", skip_serializing_if = "Option::is_none")]
    pub labor_force: Option<f64>,
    #[serde(rename = "ahe", skip_serializing_if = "Option::is_none")]
    pub avg_hourly_earnings: Option<f64>,
    #[serde(rename = "cpi", skip_serializing_if = "Option::is_none")]
    pub cpi_yoy_pct_change: Option<f64>,
    #[serde(rename = "jor", skip_serializing_if = "Option::is_none")]
    pub job_openings_rate: Option<f64>,
    #[serde(rename = "qr", skip_serializing_if = "Option::is_none")]
    pub quits_rate: Option<f64>,
}

impl NationalSnapshotDoc {
    fn from_snapshot(snapshot: &NationalSnapshot) -> Self {
        Self {
            unemployment_rate: snapshot.unemployment_rate,
            labor_force: snapshot.labor_force,
            avg_hourly_earnings: snapshot.avg_hourly_earnings,
            cpi_yoy_pct_change: snapshot.cpi_yoy_pct_change,
            job_openings_rate: snapshot.job_openings_rate,
            quits_rate: snapshot.quits_rate,
        }
    }
}

/// `hierarchy.json`: occupations grouped by 2-digit SOC major group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyDoc {
    pub groups: Vec<GroupDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupDoc {
    pub code: String,
    pub title: String,
    pub occupations: Vec<GroupMemberDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupMemberDoc {
    pub soc: String,
    pub title: String,
    #[serde(rename = "e", skip_serializing_if = "Option::is_none")]
    pub employment: Option<f64>,
    #[serde(rename = "ad", skip_serializing_if = "Option::is_none")]
    pub annual_median: Option<f64>,
}

/// `summary-ticker.json`: the handful of headline metrics for the ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerDoc {
    pub year: i32,
    pub items: Vec<TickerItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerItem {
    pub id: String,
    pub label: String,
    pub value: f64,
    pub unit: String,
}

/// One `OccupationDoc` per SOC code seen at any scope
pub fn occupation_docs(occupations: &OccupationDataset) -> BTreeMap<String, OccupationDoc> {
    let mut docs: BTreeMap<String, OccupationDoc> = BTreeMap::new();

    let doc_for = |docs: &mut BTreeMap<String, OccupationDoc>, record: &OccupationRecord| {
        docs.entry(record.soc_code.clone())
            .or_insert_with(|| OccupationDoc {
                soc: record.soc_code.clone(),
                title: record.title.clone(),
                ..Default::default()
            });
    };

    for record in &occupations.national {
        doc_for(&mut docs, record);
        if let Some(doc) = docs.get_mut(&record.soc_code) {
            doc.us = Some(WageDoc::from_record(record));
        }
    }
    for (fips, records) in &occupations.states {
        for record in records {
            doc_for(&mut docs, record);
            if let Some(doc) = docs.get_mut(&record.soc_code) {
                doc.states
                    .insert(fips.clone(), WageDoc::from_record(record));
            }
        }
    }
    for (cbsa, records) in &occupations.metros {
        for record in records {
            doc_for(&mut docs, record);
            if let Some(doc) = docs.get_mut(&record.soc_code) {
                doc.metros
                    .insert(cbsa.clone(), WageDoc::from_record(record));
            }
        }
    }
    for (soc, row) in &occupations.projections {
        // Outlook only attaches to occupations the wage survey knows
        if let Some(doc) = docs.get_mut(soc) {
            doc.outlook = Some(OutlookDoc::from_row(row));
        }
    }

    docs
}

/// One `AreaDoc` per state and per allow-listed metro
pub fn area_docs(
    geography: &CanonicalDataset,
    occupations: &OccupationDataset,
) -> BTreeMap<String, AreaDoc> {
    let mut docs = BTreeMap::new();

    for (fips, state) in &geography.states {
        let counties = geography
            .counties
            .values()
            .filter(|c| c.fips.starts_with(fips.as_str()))
            .map(CountyDoc::from_record)
            .collect();
        let occupation_rows = occupations
            .states
            .get(fips)
            .map(|records| records.iter().map(AreaOccupationDoc::from_record).collect())
            .unwrap_or_default();

        docs.insert(
            fips.clone(),
            AreaDoc {
                id: fips.clone(),
                kind: Some(GeoKind::State),
                name: state.name.clone(),
                snapshot: Some(SnapshotDoc::from_state(state)),
                counties,
                occupations: occupation_rows,
            },
        );
    }

    // Metro areas: snapshot when the labor survey covered them, occupation
    // rows when the wage survey did; either alone still publishes
    let mut metro_ids: Vec<&String> = geography.metros.keys().collect();
    metro_ids.extend(occupations.metros.keys());
    metro_ids.sort();
    metro_ids.dedup();

    for cbsa in metro_ids {
        let record = geography.metros.get(cbsa);
        let occupation_rows: Vec<AreaOccupationDoc> = occupations
            .metros
            .get(cbsa)
            .map(|records| records.iter().map(AreaOccupationDoc::from_record).collect())
            .unwrap_or_default();
        let name = record
            .map(|m| m.name.clone())
            .unwrap_or_else(|| cbsa.clone());

        docs.insert(
            cbsa.clone(),
            AreaDoc {
                id: cbsa.clone(),
                kind: Some(GeoKind::Metro),
                name,
                snapshot: record.map(SnapshotDoc::from_metro),
                counties: Vec::new(),
                occupations: occupation_rows,
            },
        );
    }

    docs
}

pub fn national_doc(
    geography: &CanonicalDataset,
    occupations: &OccupationDataset,
) -> NationalDoc {
    NationalDoc {
        snapshot: NationalSnapshotDoc::from_snapshot(&geography.national),
        occupations: occupations
            .national
            .iter()
            .map(AreaOccupationDoc::from_record)
            .collect(),
    }
}

pub fn hierarchy_doc(occupations: &OccupationDataset) -> HierarchyDoc {
    let titles: BTreeMap<&str, &str> = occupations
        .major_groups
        .iter()
        .map(|g| (g.code.as_str(), g.title.as_str()))
        .collect();

    let mut members: BTreeMap<String, Vec<GroupMemberDoc>> = BTreeMap::new();
    for record in &occupations.national {
        members
            .entry(record.major_group().to_string())
            .or_default()
            .push(GroupMemberDoc {
                soc: record.soc_code.clone(),
                title: record.title.clone(),
                employment: record.employment,
                annual_median: record.annual_median,
            });
    }

    HierarchyDoc {
        groups: members
            .into_iter()
            .map(|(code, occupations)| GroupDoc {
                title: titles.get(code.as_str()).unwrap_or(&"").to_string(),
                code,
                occupations,
            })
            .collect(),
    }
}

pub fn ticker_doc(geography: &CanonicalDataset, year: i32) -> TickerDoc {
    let snapshot = &geography.national;
    let mut items = Vec::new();
    let mut push = |id: &str, label: &str, value: Option<f64>, unit: &str| {
        if let Some(value) = value {
            items.push(TickerItem {
                id: id.to_string(),
                label: label.to_string(),
                value,
                unit: unit.to_string(),
            });
        }
    };

    push(
        "unemployment-rate",
        "Unemployment rate",
        snapshot.unemployment_rate,
        "%",
    );
    push(
        "cpi-yoy",
        "Inflation (CPI, year over year)",
        snapshot.cpi_yoy_pct_change,
        "%",
    );
    push(
        "avg-hourly-earnings",
        "Average hourly earnings",
        snapshot.avg_hourly_earnings,
        "$",
    );
    push(
        "job-openings-rate",
        "Job openings rate",
        snapshot.job_openings_rate,
        "%",
    );
    push("quits-rate", "Quits rate", snapshot.quits_rate, "%");
    push("labor-force", "Civilian labor force", snapshot.labor_force, "");

    TickerDoc { year, items }
}
