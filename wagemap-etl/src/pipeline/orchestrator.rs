//! Pipeline orchestrator
//!
//! # Phase progression
//! FETCH → JOIN → PUBLISH
//!
//! The fetch phase runs one sub-step per source, sequentially (the batch
//! client's cooldown is the rate limiter; fanning sources out would defeat
//! it). Required sources propagate their errors and fail the run; optional
//! sources log a warning and leave their artifact absent, which the joiner
//! already tolerates.

use crate::clients::bea::BeaClient;
use crate::clients::bulkfile::BulkFileClient;
use crate::clients::census::CensusClient;
use crate::clients::timeseries::{BatchPolicy, HttpTransport, SeriesTransport, TimeseriesClient};
use crate::fetchers;
use crate::geo::Resolver;
use crate::joiner::{self, CanonicalDataset, JoinInputs, OccupationDataset};
use crate::pipeline::artifacts::ArtifactStore;
use crate::pipeline::source;
use crate::publish;
use anyhow::{Context, Result};
use wagemap_common::config::{Credentials, Settings};

/// Counts from one completed run, for the exit log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub states: usize,
    pub counties: usize,
    pub metros: usize,
    pub occupations: usize,
    pub files_written: usize,
}

pub struct PipelineOrchestrator {
    settings: Settings,
    credentials: Credentials,
    resolver: Resolver,
    store: ArtifactStore,
}

impl PipelineOrchestrator {
    pub fn new(settings: Settings, credentials: Credentials) -> Self {
        let store = ArtifactStore::new(settings.raw_dir.clone());
        Self {
            settings,
            credentials,
            resolver: Resolver::new(),
            store,
        }
    }

    /// Execute the full pipeline.
    ///
    /// With `skip_fetch` the fetch phase is bypassed and the join runs
    /// against whatever raw artifacts the previous run left behind.
    pub async fn run(&self, skip_fetch: bool) -> Result<RunSummary> {
        let start = std::time::Instant::now();
        tracing::info!(
            year = self.settings.target_year,
            output_dir = %self.settings.output_dir.display(),
            skip_fetch,
            "Starting pipeline run"
        );

        if skip_fetch {
            tracing::info!("FETCH phase skipped; joining existing raw artifacts");
        } else {
            self.phase_fetch().await?;
        }

        let (geography, occupations) = self.phase_join()?;
        let report = self.phase_publish(&geography, &occupations)?;

        let summary = RunSummary {
            states: geography.states.len(),
            counties: geography.counties.len(),
            metros: geography.metros.len(),
            occupations: occupations.national.len(),
            files_written: report.total_files,
        };
        tracing::info!(
            elapsed_secs = start.elapsed().as_secs(),
            states = summary.states,
            counties = summary.counties,
            occupations = summary.occupations,
            files = summary.files_written,
            "Pipeline run complete"
        );
        Ok(summary)
    }

    /// FETCH: one sub-step per source, raw artifact written after each
    async fn phase_fetch(&self) -> Result<()> {
        let year = self.settings.target_year;
        tracing::info!(year, "FETCH phase starting");

        // Time-series sources share one keyed client and its quota
        let transport = HttpTransport::new(self.credentials.bls_api_key.clone())?;
        let client = TimeseriesClient::new(transport, BatchPolicy::default());
        self.fetch_timeseries(&client).await?;

        // Bulk downloads need no credential; wages are required, the
        // projections matrix only enriches them
        let bulk = BulkFileClient::new()?;
        let oews = fetchers::oews::fetch(&bulk, &self.resolver, year)
            .await
            .context("occupational wage survey fetch")?;
        self.store
            .save(source::OEWS, &oews)
            .context("saving occupational wage artifact")?;

        match fetchers::projections::fetch(&bulk).await {
            Ok(projections) => self
                .store
                .save(source::PROJECTIONS, &projections)
                .context("saving projections artifact")?,
            Err(e) => {
                tracing::warn!(error = %e, "Projections source failed; continuing without outlook data");
            }
        }

        // Keyed optional sources: no key or a failed fetch both degrade to
        // an absent artifact
        if let Some(key) = &self.credentials.census_api_key {
            // The five-year demographic survey publishes a year behind the
            // labor data
            let survey_year = year - 1;
            match CensusClient::new(key.clone()) {
                Ok(census) => match fetchers::demographics::fetch(&census, survey_year).await {
                    Ok(artifact) => self
                        .store
                        .save(source::DEMOGRAPHICS, &artifact)
                        .context("saving demographics artifact")?,
                    Err(e) => {
                        tracing::warn!(error = %e, "Demographics source failed; continuing without it");
                    }
                },
                Err(e) => tracing::warn!(error = %e, "Census client init failed; skipping demographics"),
            }
        }

        if let Some(key) = &self.credentials.bea_api_key {
            match BeaClient::new(key.clone()) {
                Ok(bea) => match fetchers::income::fetch(&bea, year).await {
                    Ok(artifact) => self
                        .store
                        .save(source::INCOME, &artifact)
                        .context("saving income artifact")?,
                    Err(e) => {
                        tracing::warn!(error = %e, "Regional income source failed; continuing without it");
                    }
                },
                Err(e) => tracing::warn!(error = %e, "Income client init failed; skipping income"),
            }
        }

        tracing::info!("FETCH phase complete");
        Ok(())
    }

    /// The four required time-series sources, over any transport.
    ///
    /// An aborted fetch (quota signal or repeated batch failures) still
    /// saves its partial raw artifact for inspection, then fails the
    /// phase: the run must exit non-zero before PUBLISH can overwrite the
    /// previous run's index files with partial data.
    async fn fetch_timeseries<T: SeriesTransport>(
        &self,
        client: &TimeseriesClient<T>,
    ) -> Result<()> {
        let year = self.settings.target_year;

        let laus = fetchers::laus::fetch(client, year).await;
        self.store
            .save(source::LAUS, &laus)
            .context("saving labor-force artifact")?;
        required_complete("labor-force survey", laus.complete)?;

        let earnings = fetchers::earnings::fetch(client, year).await;
        self.store
            .save(source::EARNINGS, &earnings)
            .context("saving earnings artifact")?;
        required_complete("earnings survey", earnings.complete)?;

        let cpi = fetchers::cpi::fetch(client, year).await;
        self.store
            .save(source::CPI, &cpi)
            .context("saving consumer-price artifact")?;
        required_complete("consumer price index", cpi.complete)?;

        let jolts = fetchers::jolts::fetch(client, year).await;
        self.store
            .save(source::JOLTS, &jolts)
            .context("saving job-openings artifact")?;
        required_complete("job-openings survey", jolts.complete)?;

        Ok(())
    }

    /// JOIN: load raw artifacts and build canonical records
    fn phase_join(&self) -> Result<(CanonicalDataset, OccupationDataset)> {
        tracing::info!(raw_dir = %self.store.raw_dir().display(), "JOIN phase starting");

        let inputs = JoinInputs {
            laus: self.store.load(source::LAUS)?,
            earnings: self.store.load(source::EARNINGS)?,
            cpi: self.store.load(source::CPI)?,
            jolts: self.store.load(source::JOLTS)?,
            demographics: self.store.load(source::DEMOGRAPHICS)?,
            income: self.store.load(source::INCOME)?,
        };
        if inputs.laus.is_none() {
            tracing::warn!("No labor-force artifact found; geography records will lack labor metrics");
        }

        let geography = joiner::build(&self.resolver, &inputs);
        let occupations = joiner::build_occupations(
            self.store.load(source::OEWS)?,
            self.store.load(source::PROJECTIONS)?,
        );
        Ok((geography, occupations))
    }

    /// PUBLISH: project the dataset into index files
    fn phase_publish(
        &self,
        geography: &CanonicalDataset,
        occupations: &OccupationDataset,
    ) -> Result<publish::PublishReport> {
        tracing::info!(output_dir = %self.settings.output_dir.display(), "PUBLISH phase starting");
        let report = publish::publish_all(
            &self.settings.output_dir,
            geography,
            occupations,
            self.settings.target_year,
        )?;
        Ok(report)
    }
}

/// A required source that aborted early fails the run: its partial raw
/// artifact is already on disk, but publishing from it would overwrite
/// good index files with partial data.
fn required_complete(name: &str, complete: bool) -> Result<()> {
    if complete {
        Ok(())
    } else {
        anyhow::bail!("{name} fetch aborted before completing; raw artifact kept, publish skipped")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::timeseries::{
        DataPoint, ResultsBlock, SeriesBlock, TimeseriesResponse,
    };
    use std::time::Duration;
    use tempfile::TempDir;

    /// Answers every batch with the provider's quota message
    struct QuotaTransport;

    impl SeriesTransport for QuotaTransport {
        async fn post_batch(
            &self,
            _ids: &[String],
            _start_year: i32,
            _end_year: i32,
        ) -> wagemap_common::Result<TimeseriesResponse> {
            Ok(TimeseriesResponse {
                status: "REQUEST_NOT_PROCESSED".to_string(),
                message: vec![
                    "daily threshold of 500 requests has been reached for this registration key"
                        .to_string(),
                ],
                results: None,
            })
        }
    }

    /// Answers every batch with one observation
    struct HealthyTransport;

    impl SeriesTransport for HealthyTransport {
        async fn post_batch(
            &self,
            ids: &[String],
            _start_year: i32,
            _end_year: i32,
        ) -> wagemap_common::Result<TimeseriesResponse> {
            Ok(TimeseriesResponse {
                status: "REQUEST_SUCCEEDED".to_string(),
                message: vec![],
                results: Some(ResultsBlock {
                    series: ids
                        .iter()
                        .map(|id| SeriesBlock {
                            series_id: id.clone(),
                            data: vec![DataPoint {
                                year: "2024".to_string(),
                                period: "M13".to_string(),
                                value: "4.2".to_string(),
                            }],
                        })
                        .collect(),
                }),
            })
        }
    }

    fn orchestrator(raw_dir: &std::path::Path) -> PipelineOrchestrator {
        let settings = Settings {
            output_dir: raw_dir.join("out"),
            raw_dir: raw_dir.to_path_buf(),
            target_year: 2024,
        };
        let credentials = Credentials {
            bls_api_key: "test-key".to_string(),
            census_api_key: None,
            bea_api_key: None,
        };
        PipelineOrchestrator::new(settings, credentials)
    }

    fn instant_policy() -> BatchPolicy {
        BatchPolicy {
            inter_batch_delay: Duration::ZERO,
            backoff_base: Duration::ZERO,
            ..BatchPolicy::default()
        }
    }

    #[tokio::test]
    async fn quota_abort_on_required_source_fails_the_fetch_phase() {
        let dir = TempDir::new().unwrap();
        let orchestrator = orchestrator(dir.path());
        let client = TimeseriesClient::new(QuotaTransport, instant_policy());

        let err = orchestrator.fetch_timeseries(&client).await.unwrap_err();
        assert!(
            err.to_string().contains("aborted"),
            "unexpected error: {err:#}"
        );
        // The partial raw artifact is kept for inspection even though the
        // run fails
        assert!(orchestrator.store.exists(source::LAUS));
        // The failure propagates before later sources run, so nothing was
        // published and the run exits non-zero through main's Result
        assert!(!orchestrator.settings.output_dir.exists());
    }

    #[tokio::test]
    async fn complete_time_series_sources_pass_the_phase() {
        let dir = TempDir::new().unwrap();
        let orchestrator = orchestrator(dir.path());
        let client = TimeseriesClient::new(HealthyTransport, instant_policy());

        orchestrator.fetch_timeseries(&client).await.unwrap();
        for name in [source::LAUS, source::EARNINGS, source::CPI, source::JOLTS] {
            assert!(orchestrator.store.exists(name), "missing artifact {name}");
        }
    }

    #[test]
    fn required_complete_only_errors_on_incomplete() {
        assert!(required_complete("labor-force survey", true).is_ok());
        let err = required_complete("labor-force survey", false).unwrap_err();
        assert!(err.to_string().contains("labor-force survey"));
    }
}
