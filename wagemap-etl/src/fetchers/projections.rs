//! Employment projections fetcher (bulk CSV download, national only)
//!
//! The projections program publishes a decade-out employment outlook per
//! occupation. Only the national matrix exists; projections join onto
//! occupation records at every scope as a national outlook.

use crate::clients::bulkfile::{parse_csv, AliasedField, BulkFileClient, FieldAliases};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wagemap_common::models::observation::parse_value;
use wagemap_common::models::ProjectionRow;
use wagemap_common::Result;

const FIELDS: &[AliasedField] = &[
    AliasedField {
        canonical: "occ_code",
        aliases: &["OCC_CODE", "occupation code", "matrix_occ_code"],
        required: true,
    },
    AliasedField {
        canonical: "base_employment",
        aliases: &["EMP_BASE", "employment_base", "base year employment"],
        required: true,
    },
    AliasedField {
        canonical: "projected_employment",
        aliases: &["EMP_PROJ", "employment_projected", "projected year employment"],
        required: true,
    },
    AliasedField {
        canonical: "pct_change",
        aliases: &["EMP_CHANGE_PCT", "percent change", "pct_change"],
        required: false,
    },
    AliasedField {
        canonical: "annual_openings",
        aliases: &["OPENINGS_ANNUAL", "annual openings", "occupational openings"],
        required: false,
    },
];

pub const ALIASES: FieldAliases = FieldAliases::new(FIELDS);

/// Download URL for the national projections matrix
pub fn default_url() -> String {
    "https://www.bls.gov/emp/ind-occ-matrix/occupation.csv".to_string()
}

/// Raw artifact handed off to the joiner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionsArtifact {
    /// Keyed by SOC code
    pub occupations: BTreeMap<String, ProjectionRow>,
}

/// Download and parse the projections matrix
pub async fn fetch(client: &BulkFileClient) -> Result<ProjectionsArtifact> {
    let text = client.fetch_text(&default_url()).await?;
    parse(&text)
}

/// Parse the matrix CSV into per-occupation rows
pub fn parse(text: &str) -> Result<ProjectionsArtifact> {
    let (field_map, rows) = parse_csv(text, &ALIASES)?;

    let mut occupations = BTreeMap::new();
    for row in &rows {
        let Some(occ_code) = field_map.get(row, "occ_code").filter(|c| !c.is_empty()) else {
            continue;
        };
        if occ_code == "00-0000" {
            continue;
        }

        let number = |canonical: &str| {
            field_map
                .get(row, canonical)
                .and_then(|c| parse_value(c).as_f64())
        };

        occupations.insert(
            occ_code.to_string(),
            ProjectionRow {
                soc_code: occ_code.to_string(),
                base_employment: number("base_employment"),
                projected_employment: number("projected_employment"),
                pct_change: number("pct_change"),
                annual_openings: number("annual_openings"),
            },
        );
    }

    tracing::info!(occupations = occupations.len(), "Projections matrix parsed");
    Ok(ProjectionsArtifact { occupations })
}
