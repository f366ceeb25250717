//! Bulk CSV download client with declared field aliases
//!
//! Spreadsheet-style exports rename and re-case their columns between
//! releases (`AREA` vs `area_code`, `OCC_CODE` vs `occ code`). Instead of
//! probing several candidate names per row at lookup time, each bulk source
//! declares a field-alias table up front; the table is resolved against the
//! actual header once, before any row is read, and a missing required
//! column fails the source load with a config error.

use std::collections::BTreeMap;
use std::time::Duration;
use wagemap_common::{Error, Result};

const USER_AGENT: &str = "wagemap/0.1.0 (https://github.com/wagemap/wagemap)";

/// One logical column and the header spellings it may appear under
#[derive(Debug, Clone, Copy)]
pub struct AliasedField {
    /// Name the fetcher uses
    pub canonical: &'static str,
    /// Acceptable header spellings (matched case-insensitively)
    pub aliases: &'static [&'static str],
    /// Required columns fail resolution when absent; optional ones resolve
    /// to "always empty"
    pub required: bool,
}

/// Declared alias table for one bulk source
#[derive(Debug, Clone)]
pub struct FieldAliases {
    fields: &'static [AliasedField],
}

impl FieldAliases {
    pub const fn new(fields: &'static [AliasedField]) -> Self {
        Self { fields }
    }

    /// Resolve the table against an actual CSV header.
    ///
    /// Runs once per file, at load time; row iteration then uses plain
    /// index lookups.
    pub fn resolve(&self, headers: &csv::StringRecord) -> Result<FieldMap> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut indices = BTreeMap::new();
        let mut missing = Vec::new();

        for field in self.fields {
            let index = field
                .aliases
                .iter()
                .find_map(|alias| normalized.iter().position(|h| h == &alias.to_lowercase()));

            match index {
                Some(i) => {
                    indices.insert(field.canonical.to_string(), i);
                }
                None if field.required => missing.push(field.canonical),
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "bulk file header missing required columns: {} (header: {})",
                missing.join(", "),
                headers.iter().collect::<Vec<_>>().join(",")
            )));
        }

        Ok(FieldMap { indices })
    }
}

/// Resolved canonical-name → column-index map for one file
#[derive(Debug, Clone)]
pub struct FieldMap {
    indices: BTreeMap<String, usize>,
}

impl FieldMap {
    /// Cell for a canonical field, `None` for optional fields absent from
    /// this file
    pub fn get<'r>(&self, record: &'r csv::StringRecord, canonical: &str) -> Option<&'r str> {
        self.indices
            .get(canonical)
            .and_then(|&i| record.get(i))
            .map(str::trim)
    }
}

/// HTTP downloader for bulk CSV exports
pub struct BulkFileClient {
    http_client: reqwest::Client,
}

impl BulkFileClient {
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Download a CSV export as text
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        tracing::info!(url, "Downloading bulk file");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("{}: {}", status, url)));
        }

        let body = response.text().await.map_err(|e| Error::Http(e.to_string()))?;
        tracing::info!(url, bytes = body.len(), "Bulk file downloaded");
        Ok(body)
    }
}

/// Parse CSV text against a declared alias table.
///
/// Malformed rows are skipped per-record with a warning; only a missing
/// required column (a schema change, not a data problem) is fatal.
pub fn parse_csv(text: &str, aliases: &FieldAliases) -> Result<(FieldMap, Vec<csv::StringRecord>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::Parse(format!("CSV header: {}", e)))?
        .clone();
    let field_map = aliases.resolve(&headers)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        match result {
            Ok(record) => rows.push(record),
            Err(e) => {
                skipped += 1;
                tracing::warn!(error = %e, "Skipping malformed CSV row");
            }
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, kept = rows.len(), "Bulk file had malformed rows");
    }

    Ok((field_map, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_FIELDS: &[AliasedField] = &[
        AliasedField {
            canonical: "area",
            aliases: &["AREA", "area_code", "AREA_FIPS"],
            required: true,
        },
        AliasedField {
            canonical: "occ_code",
            aliases: &["OCC_CODE", "occ code"],
            required: true,
        },
        AliasedField {
            canonical: "note",
            aliases: &["NOTE", "footnote"],
            required: false,
        },
    ];

    const TEST_ALIASES: FieldAliases = FieldAliases::new(TEST_FIELDS);

    #[test]
    fn resolves_aliases_case_insensitively() {
        let text = "Area_Code,occ code\n0038060,29-1141\n";
        let (field_map, rows) = parse_csv(text, &TEST_ALIASES).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(field_map.get(&rows[0], "area"), Some("0038060"));
        assert_eq!(field_map.get(&rows[0], "occ_code"), Some("29-1141"));
    }

    #[test]
    fn missing_required_column_is_config_error() {
        let text = "AREA,WRONG\n1,2\n";
        let err = parse_csv(text, &TEST_ALIASES).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {:?}", err);
    }

    #[test]
    fn missing_optional_column_resolves_to_none() {
        let text = "AREA,OCC_CODE\n0038060,29-1141\n";
        let (field_map, rows) = parse_csv(text, &TEST_ALIASES).unwrap();
        assert_eq!(field_map.get(&rows[0], "note"), None);
    }

    #[test]
    fn validation_happens_before_row_iteration() {
        // A file with a bad header and a million rows must fail on the
        // header alone; rows are never consulted for schema discovery.
        let text = "BOGUS\nrow1\nrow2\n";
        assert!(parse_csv(text, &TEST_ALIASES).is_err());
    }
}
