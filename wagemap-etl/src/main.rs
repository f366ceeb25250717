//! wagemap-etl - labor-market statistics pipeline
//!
//! Batch job: fetch the configured statistical sources, join them into
//! canonical per-geography and per-occupation records, and publish the
//! denormalized JSON index files the presentation layer serves. Exit code
//! 0 on success (including deliberate skips of optional sources), 1 when
//! a required stage fails.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wagemap_common::config::{Credentials, Settings, TomlConfig};
use wagemap_etl::pipeline::PipelineOrchestrator;

#[derive(Debug, Parser)]
#[command(name = "wagemap-etl", version, about = "Labor-market statistics ingestion and publishing")]
struct Cli {
    /// Reference year for all sources (default: previous calendar year)
    #[arg(long)]
    year: Option<i32>,

    /// Directory index files are written into
    #[arg(long)]
    output_dir: Option<String>,

    /// Skip the fetch phase and re-join existing raw artifacts
    #[arg(long)]
    skip_fetch: bool,

    /// TOML config file path
    #[arg(long, default_value = "wagemap.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting wagemap-etl");

    let toml_config = TomlConfig::load(&cli.config)?;
    let settings = Settings::resolve(cli.output_dir.as_deref(), cli.year, &toml_config);

    // Credentials only matter when we are actually fetching
    let credentials = if cli.skip_fetch {
        Credentials::from_env().unwrap_or(Credentials {
            bls_api_key: String::new(),
            census_api_key: None,
            bea_api_key: None,
        })
    } else {
        Credentials::from_env()?
    };

    let orchestrator = PipelineOrchestrator::new(settings, credentials);
    orchestrator.run(cli.skip_fetch).await?;

    Ok(())
}
