//! Regional-income REST API client
//!
//! Keyed GET API wrapping results in a `BEAAPI` envelope. Data values come
//! back comma-formatted (`"50,637"`) and use `(D)` / `(NA)` suppression
//! tokens, so every value runs through the shared defensive parser before
//! leaving this module's callers.

use serde::Deserialize;
use std::time::Duration;
use wagemap_common::{Error, Result};

const BEA_BASE_URL: &str = "https://apps.bea.gov/api/data";
const USER_AGENT: &str = "wagemap/0.1.0 (https://github.com/wagemap/wagemap)";

/// Outer envelope of every regional-income API response
#[derive(Debug, Clone, Deserialize)]
pub struct BeaEnvelope {
    #[serde(rename = "BEAAPI")]
    pub beaapi: BeaBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BeaBody {
    #[serde(rename = "Results", default)]
    pub results: Option<BeaResults>,
    #[serde(rename = "Error", default)]
    pub error: Option<BeaError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BeaResults {
    #[serde(rename = "Data", default)]
    pub data: Vec<BeaDataRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BeaError {
    #[serde(rename = "APIErrorDescription", default)]
    pub description: String,
}

/// One (geography, year) cell of a regional table
#[derive(Debug, Clone, Deserialize)]
pub struct BeaDataRow {
    #[serde(rename = "GeoFips")]
    pub geo_fips: String,
    #[serde(rename = "GeoName", default)]
    pub geo_name: String,
    #[serde(rename = "TimePeriod", default)]
    pub time_period: String,
    /// Comma-formatted number or a suppression token
    #[serde(rename = "DataValue", default)]
    pub data_value: String,
}

/// Keyed GET client for the regional-income API
pub struct BeaClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl BeaClient {
    pub fn new(api_key: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: BEA_BASE_URL.to_string(),
        })
    }

    /// Fetch one line of a regional table for a geography set.
    ///
    /// `geo_fips` is the provider's geography selector (`"STATE"`,
    /// `"COUNTY"`, or an explicit FIPS list).
    pub async fn regional(
        &self,
        table_name: &str,
        line_code: u32,
        geo_fips: &str,
        year: i32,
    ) -> Result<Vec<BeaDataRow>> {
        tracing::debug!(table_name, line_code, geo_fips, year, "Querying regional income API");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("UserID", self.api_key.as_str()),
                ("method", "GetData"),
                ("datasetname", "Regional"),
                ("TableName", table_name),
                ("LineCode", &line_code.to_string()),
                ("GeoFips", geo_fips),
                ("Year", &year.to_string()),
                ("ResultFormat", "json"),
            ])
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Http(format!("{}: {}", status, error_text)));
        }

        let envelope: BeaEnvelope = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        if let Some(error) = envelope.beaapi.error {
            return Err(Error::Http(format!("provider error: {}", error.description)));
        }

        let rows = envelope.beaapi.results.unwrap_or_default().data;
        tracing::info!(table_name, geo_fips, year, rows = rows.len(), "Regional income query complete");
        Ok(rows)
    }
}
