//! Multi-index publisher
//!
//! Projects the joined dataset into the denormalized JSON index files the
//! presentation layer reads: per-occupation, per-area, national summary,
//! SOC hierarchy, headline ticker, and the search index. Each file is a
//! projection of the same in-memory dataset and is replaced atomically.

pub mod indexes;
pub mod search;
pub mod writer;

use crate::joiner::{CanonicalDataset, OccupationDataset};
use std::path::Path;
use wagemap_common::Result;

/// What a publish pass wrote, for logging and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub occupation_files: usize,
    pub area_files: usize,
    pub total_files: usize,
}

/// Write every index file under `output_dir`
pub fn publish_all(
    output_dir: &Path,
    geography: &CanonicalDataset,
    occupations: &OccupationDataset,
    year: i32,
) -> Result<PublishReport> {
    let occupation_docs = indexes::occupation_docs(occupations);
    for (soc, doc) in &occupation_docs {
        writer::write_json(&output_dir.join("occupations").join(format!("{soc}.json")), doc)?;
    }

    let area_docs = indexes::area_docs(geography, occupations);
    for (id, doc) in &area_docs {
        writer::write_json(&output_dir.join("areas").join(format!("{id}.json")), doc)?;
    }

    writer::write_json(
        &output_dir.join("national.json"),
        &indexes::national_doc(geography, occupations),
    )?;
    writer::write_json(
        &output_dir.join("hierarchy.json"),
        &indexes::hierarchy_doc(occupations),
    )?;
    writer::write_json(
        &output_dir.join("summary-ticker.json"),
        &indexes::ticker_doc(geography, year),
    )?;
    writer::write_json(
        &output_dir.join("search-index.json"),
        &search::build_index(geography, occupations),
    )?;

    let report = PublishReport {
        occupation_files: occupation_docs.len(),
        area_files: area_docs.len(),
        total_files: occupation_docs.len() + area_docs.len() + 4,
    };
    tracing::info!(
        occupations = report.occupation_files,
        areas = report.area_files,
        total = report.total_files,
        "Index files published"
    );
    Ok(report)
}
