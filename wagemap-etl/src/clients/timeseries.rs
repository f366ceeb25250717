//! Rate-limited batch client for the bulk time-series API
//!
//! The provider accepts up to 50 series ids per POST and enforces a
//! requests-per-window quota. The client stays under it with a fixed
//! inter-batch cooldown, retries transient failures with backoff
//! proportional to the attempt number, and fails fast the moment the
//! provider signals its daily threshold: that signal arrives in the
//! response body (status + message text), often with HTTP 200, and
//! retrying before the quota window resets cannot succeed.
//!
//! Each batch attempt runs through an explicit state machine
//! (`Idle → Attempting → {Success, RetryWait, Aborted}`); batches, not
//! individual series ids, are the unit of retry and abort. A run that
//! aborts still returns every observation gathered so far — partial data
//! beats none for a periodic job whose consumers tolerate missing fields.

use serde::Deserialize;
use std::time::Duration;
use wagemap_common::models::observation::{parse_value, ParsedValue};
use wagemap_common::models::SeriesObservation;
use wagemap_common::{Error, Result};

/// Provider per-call series limit
pub const SERIES_PER_BATCH: usize = 50;

/// Retry, backoff, and cooldown policy for one fetch run
#[derive(Debug, Clone)]
pub struct BatchPolicy {
    /// Max series ids per request
    pub batch_size: usize,
    /// Cooldown between consecutive batch requests
    pub inter_batch_delay: Duration,
    /// Attempts per batch (first try included)
    pub max_attempts: u32,
    /// Backoff before retry N is `backoff_base * N`
    pub backoff_base: Duration,
    /// Consecutive failed batches before the run aborts early
    pub max_consecutive_failures: u32,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            batch_size: SERIES_PER_BATCH,
            inter_batch_delay: Duration::from_millis(500),
            max_attempts: 3,
            backoff_base: Duration::from_secs(2),
            max_consecutive_failures: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Provider response envelope
// ---------------------------------------------------------------------------

/// Top-level response envelope from the time-series API
#[derive(Debug, Clone, Deserialize)]
pub struct TimeseriesResponse {
    /// `"REQUEST_SUCCEEDED"` or a failure code
    pub status: String,
    /// Human-readable messages; carries the quota text on throttling
    #[serde(default)]
    pub message: Vec<String>,
    #[serde(rename = "Results", default)]
    pub results: Option<ResultsBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultsBlock {
    #[serde(default)]
    pub series: Vec<SeriesBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesBlock {
    #[serde(rename = "seriesID")]
    pub series_id: String,
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

/// One raw data point; everything arrives as strings
#[derive(Debug, Clone, Deserialize)]
pub struct DataPoint {
    pub year: String,
    pub period: String,
    pub value: String,
}

const STATUS_SUCCEEDED: &str = "REQUEST_SUCCEEDED";

impl TimeseriesResponse {
    pub fn succeeded(&self) -> bool {
        self.status == STATUS_SUCCEEDED
    }

    /// Quota message, if the provider signaled throttling in the body.
    ///
    /// The provider reports quota exhaustion as a non-success status whose
    /// message mentions the request threshold, usually with HTTP 200, so
    /// status-code checks alone miss it.
    pub fn rate_limit_message(&self) -> Option<String> {
        if self.succeeded() {
            return None;
        }
        self.message
            .iter()
            .find(|m| {
                let lower = m.to_lowercase();
                lower.contains("threshold") || lower.contains("quota") || lower.contains("daily limit")
            })
            .cloned()
    }

    /// Flatten the envelope into observations, one per (series, year, period).
    ///
    /// Unparseable years are skipped per-record; a single malformed data
    /// point never discards its batch.
    fn into_observations(self) -> Vec<SeriesObservation> {
        let mut observations = Vec::new();
        let Some(results) = self.results else {
            return observations;
        };
        for series in results.series {
            for point in series.data {
                let Ok(year) = point.year.parse::<i32>() else {
                    tracing::warn!(
                        series_id = %series.series_id,
                        year = %point.year,
                        "Skipping data point with unparseable year"
                    );
                    continue;
                };
                let parsed = parse_value(&point.value);
                observations.push(SeriesObservation {
                    series_id: series.series_id.clone(),
                    year,
                    period: point.period,
                    value: parsed.as_f64(),
                    sentinel: matches!(parsed, ParsedValue::Missing),
                });
            }
        }
        observations
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// One POST of a batch of series ids to the provider.
///
/// Split out so tests can substitute a scripted transport for live HTTP.
pub trait SeriesTransport {
    fn post_batch(
        &self,
        ids: &[String],
        start_year: i32,
        end_year: i32,
    ) -> impl std::future::Future<Output = Result<TimeseriesResponse>> + Send;
}

const TIMESERIES_BASE_URL: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";
const USER_AGENT: &str = "wagemap/0.1.0 (https://github.com/wagemap/wagemap)";

/// Live HTTP transport
pub struct HttpTransport {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HttpTransport {
    pub fn new(api_key: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: TIMESERIES_BASE_URL.to_string(),
        })
    }
}

impl SeriesTransport for HttpTransport {
    async fn post_batch(
        &self,
        ids: &[String],
        start_year: i32,
        end_year: i32,
    ) -> Result<TimeseriesResponse> {
        let body = serde_json::json!({
            "seriesid": ids,
            "startyear": start_year.to_string(),
            "endyear": end_year.to_string(),
            "annualaverage": true,
            "registrationkey": self.api_key,
        });

        tracing::debug!(batch_size = ids.len(), start_year, end_year, "Posting series batch");

        let response = self
            .http_client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();

        if status.as_u16() == 429 {
            return Err(Error::RateLimited("HTTP 429 Too Many Requests".to_string()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Http(format!("{}: {}", status, error_text)));
        }

        response
            .json::<TimeseriesResponse>()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Batch client
// ---------------------------------------------------------------------------

/// Why a fetch run stopped before exhausting its id list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// Provider signaled its quota threshold; retrying cannot succeed
    RateLimited(String),
    /// Too many consecutive batch failures
    TooManyFailures,
}

/// Result of one fetch run: everything gathered, plus why it stopped early
/// (if it did)
#[derive(Debug)]
pub struct FetchOutcome {
    pub observations: Vec<SeriesObservation>,
    pub aborted: Option<AbortReason>,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }
}

/// Per-batch state machine states
enum BatchState {
    Idle,
    Attempting(u32),
    RetryWait(u32),
    Success(Vec<SeriesObservation>),
    Aborted(Error),
}

/// Outcome of one batch after the state machine settles
enum BatchOutcome {
    Success(Vec<SeriesObservation>),
    RateLimited(String),
    Failed(Error),
}

/// Batched, retrying client over a [`SeriesTransport`]
pub struct TimeseriesClient<T: SeriesTransport> {
    transport: T,
    policy: BatchPolicy,
}

impl<T: SeriesTransport> TimeseriesClient<T> {
    pub fn new(transport: T, policy: BatchPolicy) -> Self {
        Self { transport, policy }
    }

    /// Fetch observations for every id, batching and retrying per policy.
    ///
    /// Never returns `Err`: an aborted run still carries the observations
    /// gathered before the abort, with the reason in `aborted`.
    pub async fn fetch_series(&self, ids: &[String], year_range: (i32, i32)) -> FetchOutcome {
        let (start_year, end_year) = year_range;
        let mut observations = Vec::new();
        let mut consecutive_failures: u32 = 0;

        let batches: Vec<&[String]> = ids.chunks(self.policy.batch_size.max(1)).collect();
        let total = batches.len();

        for (index, batch) in batches.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.policy.inter_batch_delay).await;
            }

            match self.run_batch(batch, start_year, end_year).await {
                BatchOutcome::Success(mut batch_observations) => {
                    consecutive_failures = 0;
                    observations.append(&mut batch_observations);
                    tracing::debug!(batch = index + 1, total, gathered = observations.len(), "Batch complete");
                }
                BatchOutcome::RateLimited(message) => {
                    tracing::warn!(
                        batch = index + 1,
                        total,
                        gathered = observations.len(),
                        %message,
                        "Provider rate limit signaled; aborting stage with partial data"
                    );
                    return FetchOutcome {
                        observations,
                        aborted: Some(AbortReason::RateLimited(message)),
                    };
                }
                BatchOutcome::Failed(error) => {
                    consecutive_failures += 1;
                    tracing::warn!(
                        batch = index + 1,
                        total,
                        consecutive_failures,
                        %error,
                        "Batch failed after retries"
                    );
                    if consecutive_failures >= self.policy.max_consecutive_failures {
                        tracing::warn!(
                            gathered = observations.len(),
                            "Too many consecutive batch failures; aborting stage early"
                        );
                        return FetchOutcome {
                            observations,
                            aborted: Some(AbortReason::TooManyFailures),
                        };
                    }
                }
            }
        }

        FetchOutcome {
            observations,
            aborted: None,
        }
    }

    /// Drive one batch through the retry state machine until it settles
    async fn run_batch(&self, ids: &[String], start_year: i32, end_year: i32) -> BatchOutcome {
        let mut state = BatchState::Idle;

        loop {
            state = match state {
                BatchState::Idle => BatchState::Attempting(1),

                BatchState::Attempting(attempt) => {
                    match self.transport.post_batch(ids, start_year, end_year).await {
                        Ok(response) => {
                            if let Some(message) = response.rate_limit_message() {
                                // Quota exhaustion embedded in the body; a
                                // retry before the window resets cannot succeed
                                BatchState::Aborted(Error::RateLimited(message))
                            } else if response.succeeded() {
                                BatchState::Success(response.into_observations())
                            } else {
                                let error = Error::Http(format!(
                                    "provider status {}: {}",
                                    response.status,
                                    response.message.join("; ")
                                ));
                                if attempt < self.policy.max_attempts {
                                    BatchState::RetryWait(attempt)
                                } else {
                                    BatchState::Aborted(error)
                                }
                            }
                        }
                        Err(Error::RateLimited(message)) => {
                            BatchState::Aborted(Error::RateLimited(message))
                        }
                        Err(error) if error.is_retriable() && attempt < self.policy.max_attempts => {
                            tracing::debug!(attempt, %error, "Transient batch failure; will retry");
                            BatchState::RetryWait(attempt)
                        }
                        Err(error) => BatchState::Aborted(error),
                    }
                }

                BatchState::RetryWait(attempt) => {
                    // Backoff proportional to the attempt number
                    tokio::time::sleep(self.policy.backoff_base * attempt).await;
                    BatchState::Attempting(attempt + 1)
                }

                BatchState::Success(observations) => return BatchOutcome::Success(observations),

                BatchState::Aborted(Error::RateLimited(message)) => {
                    return BatchOutcome::RateLimited(message)
                }

                BatchState::Aborted(error) => return BatchOutcome::Failed(error),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_json(json: serde_json::Value) -> TimeseriesResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn envelope_parses_success_response() {
        let response = response_json(serde_json::json!({
            "status": "REQUEST_SUCCEEDED",
            "responseTime": 120,
            "message": [],
            "Results": {
                "series": [{
                    "seriesID": "LASST060000000000003",
                    "data": [
                        {"year": "2024", "period": "M13", "periodName": "Annual", "value": "5.3"},
                        {"year": "2024", "period": "M12", "periodName": "December", "value": "5.4"}
                    ]
                }]
            }
        }));

        assert!(response.succeeded());
        let observations = response.into_observations();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].period, "M13");
        assert_eq!(observations[0].value, Some(5.3));
        assert!(!observations[0].sentinel);
    }

    #[test]
    fn envelope_sentinel_value_becomes_none() {
        let response = response_json(serde_json::json!({
            "status": "REQUEST_SUCCEEDED",
            "message": [],
            "Results": {
                "series": [{
                    "seriesID": "LAUCN090010000000003",
                    "data": [{"year": "2024", "period": "M13", "value": "-"}]
                }]
            }
        }));

        let observations = response.into_observations();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].value, None);
        assert!(observations[0].sentinel);
    }

    #[test]
    fn rate_limit_detected_from_body_not_status_code() {
        let response = response_json(serde_json::json!({
            "status": "REQUEST_NOT_PROCESSED",
            "message": ["Request could not be serviced, as the daily threshold for total number of requests allocated to the user has been reached."],
            "Results": null
        }));

        assert!(response.rate_limit_message().is_some());
    }

    #[test]
    fn plain_failure_is_not_rate_limit() {
        let response = response_json(serde_json::json!({
            "status": "REQUEST_NOT_PROCESSED",
            "message": ["Series does not exist for series id: XXX"],
        }));

        assert!(response.rate_limit_message().is_none());
    }

    #[test]
    fn missing_results_block_yields_no_observations() {
        let response = response_json(serde_json::json!({
            "status": "REQUEST_SUCCEEDED",
            "message": []
        }));
        assert!(response.into_observations().is_empty());
    }
}
