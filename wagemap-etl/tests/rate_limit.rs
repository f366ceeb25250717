//! Batch client behavior against a scripted transport: quota fail-fast,
//! transient retry, and partial-result preservation.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use wagemap_common::Error;
use wagemap_etl::clients::timeseries::{
    AbortReason, BatchPolicy, DataPoint, ResultsBlock, SeriesBlock, SeriesTransport,
    TimeseriesClient, TimeseriesResponse,
};

/// What the scripted transport should do for one call
enum Step {
    Ok(TimeseriesResponse),
    Err(Error),
}

struct ScriptedTransport {
    steps: Mutex<Vec<Step>>,
    calls: Arc<Mutex<u32>>,
}

impl ScriptedTransport {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Shared call counter, usable after the transport moves into a client
    fn call_counter(&self) -> Arc<Mutex<u32>> {
        Arc::clone(&self.calls)
    }
}

impl SeriesTransport for ScriptedTransport {
    async fn post_batch(
        &self,
        _ids: &[String],
        _start_year: i32,
        _end_year: i32,
    ) -> wagemap_common::Result<TimeseriesResponse> {
        *self.calls.lock().unwrap() += 1;
        let mut steps = self.steps.lock().unwrap();
        assert!(!steps.is_empty(), "transport called more times than scripted");
        match steps.remove(0) {
            Step::Ok(response) => Ok(response),
            Step::Err(e) => Err(e),
        }
    }
}

fn success_response(series_id: &str, value: &str) -> TimeseriesResponse {
    TimeseriesResponse {
        status: "REQUEST_SUCCEEDED".to_string(),
        message: vec![],
        results: Some(ResultsBlock {
            series: vec![SeriesBlock {
                series_id: series_id.to_string(),
                data: vec![DataPoint {
                    year: "2024".to_string(),
                    period: "M13".to_string(),
                    value: value.to_string(),
                }],
            }],
        }),
    }
}

fn quota_response() -> TimeseriesResponse {
    TimeseriesResponse {
        status: "REQUEST_NOT_PROCESSED".to_string(),
        message: vec![
            "daily threshold of 500 requests has been reached for this registration key"
                .to_string(),
        ],
        results: None,
    }
}

fn fast_policy() -> BatchPolicy {
    BatchPolicy {
        batch_size: 2,
        inter_batch_delay: Duration::ZERO,
        max_attempts: 3,
        backoff_base: Duration::ZERO,
        max_consecutive_failures: 3,
    }
}

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("SERIES{i:04}")).collect()
}

#[tokio::test]
async fn body_signaled_quota_aborts_without_any_retry() {
    // First batch succeeds, second hits the quota. The quota arrives with a
    // success-shaped HTTP response, so only the body check can catch it.
    let transport = ScriptedTransport::new(vec![
        Step::Ok(success_response("SERIES0000", "3.8")),
        Step::Ok(quota_response()),
    ]);
    let client = TimeseriesClient::new(transport, fast_policy());

    let outcome = client.fetch_series(&ids(4), (2024, 2024)).await;

    assert!(matches!(outcome.aborted, Some(AbortReason::RateLimited(_))));
    // Partial results from before the abort are preserved
    assert_eq!(outcome.observations.len(), 1);
    assert_eq!(outcome.observations[0].series_id, "SERIES0000");
}

#[tokio::test]
async fn quota_batch_is_never_retried() {
    let transport = ScriptedTransport::new(vec![Step::Ok(quota_response())]);
    let calls = transport.call_counter();
    let client = TimeseriesClient::new(transport, fast_policy());

    let outcome = client.fetch_series(&ids(2), (2024, 2024)).await;

    assert!(matches!(outcome.aborted, Some(AbortReason::RateLimited(_))));
    assert!(outcome.observations.is_empty());
    assert_eq!(*calls.lock().unwrap(), 1, "a quota response gets zero retries");
}

#[tokio::test]
async fn transport_level_rate_limit_also_fails_fast() {
    // HTTP 429 surfaces as Error::RateLimited from the transport itself
    let transport = ScriptedTransport::new(vec![Step::Err(Error::RateLimited(
        "HTTP 429 Too Many Requests".to_string(),
    ))]);
    let client = TimeseriesClient::new(transport, fast_policy());

    let outcome = client.fetch_series(&ids(2), (2024, 2024)).await;
    assert!(matches!(outcome.aborted, Some(AbortReason::RateLimited(_))));
}

#[tokio::test]
async fn transient_failure_is_retried_then_succeeds() {
    let transport = ScriptedTransport::new(vec![
        Step::Err(Error::Http("connection reset".to_string())),
        Step::Ok(success_response("SERIES0000", "3.8")),
    ]);
    let client = TimeseriesClient::new(transport, fast_policy());

    let outcome = client.fetch_series(&ids(2), (2024, 2024)).await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.observations.len(), 1);
}

#[tokio::test]
async fn consecutive_batch_failures_abort_with_partial_results() {
    // Batch 1 succeeds; batches 2-4 each exhaust three attempts. After the
    // third failed batch the run aborts instead of grinding on.
    let mut steps = vec![Step::Ok(success_response("SERIES0000", "3.8"))];
    for _ in 0..9 {
        steps.push(Step::Err(Error::Http("connection reset".to_string())));
    }
    let transport = ScriptedTransport::new(steps);
    let calls = transport.call_counter();
    let client = TimeseriesClient::new(transport, fast_policy());

    let outcome = client.fetch_series(&ids(10), (2024, 2024)).await;

    assert!(matches!(outcome.aborted, Some(AbortReason::TooManyFailures)));
    assert_eq!(outcome.observations.len(), 1);
    assert_eq!(*calls.lock().unwrap(), 10);
}
