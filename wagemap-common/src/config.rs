//! Configuration and credential resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file (`wagemap.toml` in the working directory)
//! 4. Compiled default
//!
//! Provider credentials are environment-only: they are issued per user and
//! must never land in a config file that could be committed.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable carrying the time-series API key (required source)
pub const ENV_BLS_API_KEY: &str = "WAGEMAP_BLS_API_KEY";
/// Environment variable carrying the census API key (optional source)
pub const ENV_CENSUS_API_KEY: &str = "WAGEMAP_CENSUS_API_KEY";
/// Environment variable carrying the regional-income API key (optional source)
pub const ENV_BEA_API_KEY: &str = "WAGEMAP_BEA_API_KEY";

/// Optional TOML config file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Directory the publisher writes index files into
    pub output_dir: Option<String>,
    /// Directory fetchers write raw artifacts into
    pub raw_dir: Option<String>,
    /// Reference year override for all sources
    pub target_year: Option<i32>,
}

impl TomlConfig {
    /// Load `wagemap.toml` from the given path; a missing file is not an error
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("parse {}: {}", path.display(), e)))
    }
}

/// Provider credentials resolved from the environment
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Time-series API key; required, checked before any network call
    pub bls_api_key: String,
    /// Census API key; optional, its absence skips the demographics source
    pub census_api_key: Option<String>,
    /// Regional-income API key; optional, its absence skips the income source
    pub bea_api_key: Option<String>,
}

impl Credentials {
    /// Resolve credentials from the environment.
    ///
    /// A missing required key is fatal here, before any network call; missing
    /// optional keys only log a warning so the run can degrade gracefully.
    pub fn from_env() -> Result<Self> {
        let bls_api_key = read_env(ENV_BLS_API_KEY).ok_or_else(|| {
            Error::MissingCredential(format!(
                "{} is not set; obtain a key at https://data.bls.gov/registrationEngine/",
                ENV_BLS_API_KEY
            ))
        })?;

        let census_api_key = read_env(ENV_CENSUS_API_KEY);
        if census_api_key.is_none() {
            tracing::warn!(
                "{} not set; demographics source will be skipped",
                ENV_CENSUS_API_KEY
            );
        }

        let bea_api_key = read_env(ENV_BEA_API_KEY);
        if bea_api_key.is_none() {
            tracing::warn!(
                "{} not set; regional income source will be skipped",
                ENV_BEA_API_KEY
            );
        }

        Ok(Self {
            bls_api_key,
            census_api_key,
            bea_api_key,
        })
    }
}

/// Read an environment variable, treating empty/whitespace values as unset
fn read_env(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Fully resolved run settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory for published index files
    pub output_dir: PathBuf,
    /// Directory for per-source raw artifacts
    pub raw_dir: PathBuf,
    /// Reference year for all sources (defaults to the previous calendar year,
    /// the most recent year with complete annual averages)
    pub target_year: i32,
}

impl Settings {
    /// Resolve settings from CLI arguments, environment, and TOML config
    pub fn resolve(
        cli_output_dir: Option<&str>,
        cli_year: Option<i32>,
        toml_config: &TomlConfig,
    ) -> Self {
        let output_dir = cli_output_dir
            .map(PathBuf::from)
            .or_else(|| std::env::var("WAGEMAP_OUTPUT_DIR").ok().map(PathBuf::from))
            .or_else(|| toml_config.output_dir.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("public/data"));

        let raw_dir = std::env::var("WAGEMAP_RAW_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| toml_config.raw_dir.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| output_dir.join("raw"));

        let target_year = cli_year
            .or_else(|| {
                std::env::var("WAGEMAP_TARGET_YEAR")
                    .ok()
                    .and_then(|v| v.parse().ok())
            })
            .or(toml_config.target_year)
            .unwrap_or_else(default_target_year);

        Self {
            output_dir,
            raw_dir,
            target_year,
        }
    }
}

/// Previous calendar year: annual averages for the current year do not exist
/// until the year is over.
fn default_target_year() -> i32 {
    use chrono::Datelike;
    chrono::Utc::now().year() - 1
}
