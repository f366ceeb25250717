//! Census REST API client
//!
//! The census API is a query-parameter GET API returning rows as a JSON
//! array of string arrays, header row first:
//!
//! ```json
//! [["NAME","B01003_001E","state","county"],
//!  ["Hartford County, Connecticut","894730","09","003"]]
//! ```
//!
//! This source is optional: the fetcher is skipped entirely when no key is
//! configured.

use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use wagemap_common::{Error, Result};

const CENSUS_BASE_URL: &str = "https://api.census.gov/data";
const USER_AGENT: &str = "wagemap/0.1.0 (https://github.com/wagemap/wagemap)";

/// A parsed census response: named columns over string cells
#[derive(Debug, Clone)]
pub struct CensusTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CensusTable {
    /// Parse the array-of-arrays payload; the first row is the header
    pub fn parse(payload: &Value) -> Result<Self> {
        let outer = payload
            .as_array()
            .ok_or_else(|| Error::Parse("census payload is not an array".to_string()))?;
        let mut rows_iter = outer.iter();
        let header = rows_iter
            .next()
            .ok_or_else(|| Error::Parse("census payload is empty".to_string()))?;

        let columns = string_row(header)?;
        let mut rows = Vec::new();
        for row in rows_iter {
            match string_row(row) {
                Ok(cells) if cells.len() == columns.len() => rows.push(cells),
                Ok(cells) => {
                    tracing::warn!(
                        expected = columns.len(),
                        got = cells.len(),
                        "Skipping census row with wrong arity"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed census row");
                }
            }
        }

        Ok(Self { columns, rows })
    }

    /// Iterate rows as column-name → cell maps (ordered for determinism)
    pub fn records(&self) -> impl Iterator<Item = BTreeMap<&str, &str>> {
        self.rows.iter().map(move |row| {
            self.columns
                .iter()
                .map(String::as_str)
                .zip(row.iter().map(String::as_str))
                .collect()
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn string_row(value: &Value) -> Result<Vec<String>> {
    let cells = value
        .as_array()
        .ok_or_else(|| Error::Parse("census row is not an array".to_string()))?;
    Ok(cells
        .iter()
        .map(|c| match c {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect())
}

/// Keyed GET client for the census API
pub struct CensusClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl CensusClient {
    pub fn new(api_key: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: CENSUS_BASE_URL.to_string(),
        })
    }

    /// Query one ACS 5-year table slice.
    ///
    /// `variables` are the column codes to fetch, `geo_for` / `geo_in` the
    /// geography predicate (`"county:*"`, `Some("state:09")`).
    pub async fn acs5(
        &self,
        year: i32,
        variables: &[&str],
        geo_for: &str,
        geo_in: Option<&str>,
    ) -> Result<CensusTable> {
        let url = format!("{}/{}/acs/acs5", self.base_url, year);
        let get = format!("NAME,{}", variables.join(","));

        let mut query: Vec<(&str, String)> = vec![
            ("get", get),
            ("for", geo_for.to_string()),
            ("key", self.api_key.clone()),
        ];
        if let Some(geo_in) = geo_in {
            query.push(("in", geo_in.to_string()));
        }

        tracing::debug!(year, geo_for, ?geo_in, "Querying census API");

        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Http(format!("{}: {}", status, error_text)));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        let table = CensusTable::parse(&payload)?;
        tracing::info!(year, geo_for, rows = table.len(), "Census query complete");
        Ok(table)
    }
}
