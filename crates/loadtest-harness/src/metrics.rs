//! Request samples and in-process statistics collection.
//!
//! Every outbound request reports one or more `RequestSample`s to a
//! `MetricsSink`. The `StatsCollector` sink aggregates them per
//! `(request_type, name)` pair and produces a serializable `StatsReport`.

use chrono::{DateTime, Utc};
use hdrhistogram::{CreationError, Histogram};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Name of the synthetic row that sums all request kinds.
pub const AGGREGATED_NAME: &str = "Aggregated";

/// One timed request outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSample {
    /// Request kind label (e.g. "Send data")
    pub request_type: String,
    /// Target label (e.g. "Kinesis")
    pub name: String,
    /// Wall-clock time the request started
    pub start_time: DateTime<Utc>,
    /// Elapsed time in milliseconds
    pub response_time_ms: f64,
    /// Response size in bytes
    pub response_length: u64,
    /// Error message if the request failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RequestSample {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Destination for request samples.
///
/// This is the seam between request code and whatever aggregates the
/// results, so adapters can be tested with an in-memory recorder.
pub trait MetricsSink: Send + Sync {
    fn record(&self, sample: RequestSample);
}

impl<T: MetricsSink + ?Sized> MetricsSink for Arc<T> {
    fn record(&self, sample: RequestSample) {
        (**self).record(sample)
    }
}

/// Sink that keeps every sample in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    samples: Mutex<Vec<RequestSample>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of every sample recorded so far.
    pub fn samples(&self) -> Vec<RequestSample> {
        self.samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl MetricsSink for RecordingSink {
    fn record(&self, sample: RequestSample) {
        self.samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(sample);
    }
}

/// Latency histogram range in microseconds: 1µs to one hour.
const LATENCY_HIGHEST_US: u64 = 3_600_000_000;
const LATENCY_SIGFIGS: u8 = 3;

/// Running statistics for one request kind.
///
/// Latencies go into a fixed-size histogram, so memory stays constant no
/// matter how long the run is.
#[derive(Debug, Clone)]
struct EndpointStats {
    num_requests: u64,
    num_failures: u64,
    total_response_time_ms: f64,
    min_response_time_ms: Option<f64>,
    max_response_time_ms: f64,
    total_content_length: u64,
    latencies: Histogram<u64>,
}

impl EndpointStats {
    fn new() -> Result<Self, CreationError> {
        Ok(Self {
            num_requests: 0,
            num_failures: 0,
            total_response_time_ms: 0.0,
            min_response_time_ms: None,
            max_response_time_ms: 0.0,
            total_content_length: 0,
            latencies: Histogram::new_with_bounds(1, LATENCY_HIGHEST_US, LATENCY_SIGFIGS)?,
        })
    }

    fn add(&mut self, sample: &RequestSample) {
        self.num_requests += 1;
        if sample.is_failure() {
            self.num_failures += 1;
        }
        self.total_response_time_ms += sample.response_time_ms;
        self.min_response_time_ms = Some(match self.min_response_time_ms {
            Some(min) => min.min(sample.response_time_ms),
            None => sample.response_time_ms,
        });
        self.max_response_time_ms = self.max_response_time_ms.max(sample.response_time_ms);
        self.total_content_length += sample.response_length;
        // Out-of-range latencies are clamped to the histogram bounds
        self.latencies
            .saturating_record((sample.response_time_ms * 1000.0).round() as u64);
    }

    fn merge(&mut self, other: &EndpointStats) {
        self.num_requests += other.num_requests;
        self.num_failures += other.num_failures;
        self.total_response_time_ms += other.total_response_time_ms;
        self.min_response_time_ms = match (self.min_response_time_ms, other.min_response_time_ms) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_response_time_ms = self.max_response_time_ms.max(other.max_response_time_ms);
        self.total_content_length += other.total_content_length;
        if let Err(e) = self.latencies.add(&other.latencies) {
            warn!("Failed to merge latency histograms: {:?}", e);
        }
    }

    /// Latency at `quantile` in milliseconds, never above the exact maximum.
    fn quantile_ms(&self, quantile: f64) -> f64 {
        if self.latencies.len() == 0 {
            return 0.0;
        }
        let micros = self.latencies.value_at_quantile(quantile);
        (micros as f64 / 1000.0).min(self.max_response_time_ms)
    }

    fn report(&self, request_type: &str, name: &str, duration_secs: f64) -> EndpointReport {
        let (avg_response_time_ms, avg_content_length) = if self.num_requests > 0 {
            (
                self.total_response_time_ms / self.num_requests as f64,
                self.total_content_length as f64 / self.num_requests as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let per_second = |count: u64| {
            if duration_secs > 0.0 {
                count as f64 / duration_secs
            } else {
                0.0
            }
        };

        EndpointReport {
            request_type: request_type.to_string(),
            name: name.to_string(),
            num_requests: self.num_requests,
            num_failures: self.num_failures,
            avg_response_time_ms,
            min_response_time_ms: self.min_response_time_ms.unwrap_or(0.0),
            max_response_time_ms: self.max_response_time_ms,
            p50_response_time_ms: self.quantile_ms(0.50),
            p95_response_time_ms: self.quantile_ms(0.95),
            p99_response_time_ms: self.quantile_ms(0.99),
            avg_content_length,
            total_content_length: self.total_content_length,
            requests_per_second: per_second(self.num_requests),
            failures_per_second: per_second(self.num_failures),
        }
    }
}

/// Aggregated statistics for one request kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointReport {
    pub request_type: String,
    pub name: String,
    pub num_requests: u64,
    pub num_failures: u64,
    pub avg_response_time_ms: f64,
    pub min_response_time_ms: f64,
    pub max_response_time_ms: f64,
    pub p50_response_time_ms: f64,
    pub p95_response_time_ms: f64,
    pub p99_response_time_ms: f64,
    pub avg_content_length: f64,
    pub total_content_length: u64,
    pub requests_per_second: f64,
    pub failures_per_second: f64,
}

impl EndpointReport {
    fn empty(request_type: &str, name: &str) -> Self {
        Self {
            request_type: request_type.to_string(),
            name: name.to_string(),
            num_requests: 0,
            num_failures: 0,
            avg_response_time_ms: 0.0,
            min_response_time_ms: 0.0,
            max_response_time_ms: 0.0,
            p50_response_time_ms: 0.0,
            p95_response_time_ms: 0.0,
            p99_response_time_ms: 0.0,
            avg_content_length: 0.0,
            total_content_length: 0,
            requests_per_second: 0.0,
            failures_per_second: 0.0,
        }
    }

    /// Fraction of requests that failed (0.0 when nothing was sent).
    pub fn failure_ratio(&self) -> f64 {
        if self.num_requests > 0 {
            self.num_failures as f64 / self.num_requests as f64
        } else {
            0.0
        }
    }
}

/// Distinct error message and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub request_type: String,
    pub name: String,
    pub error: String,
    pub occurrences: u64,
}

/// Point-in-time statistics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    /// Collection start time
    pub started_at: DateTime<Utc>,
    /// Snapshot time
    pub generated_at: DateTime<Utc>,
    /// Per request kind, sorted by (request_type, name)
    pub entries: Vec<EndpointReport>,
    /// Sum over all entries
    pub total: EndpointReport,
    /// Distinct errors, most frequent first
    #[serde(default)]
    pub errors: Vec<ErrorReport>,
}

impl StatsReport {
    /// Get duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.generated_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

#[derive(Debug, Default)]
struct StatsState {
    entries: BTreeMap<(String, String), EndpointStats>,
    errors: BTreeMap<(String, String, String), u64>,
}

/// Thread-safe sink that aggregates samples into per-request statistics.
#[derive(Debug)]
pub struct StatsCollector {
    started_at: DateTime<Utc>,
    state: Mutex<StatsState>,
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            state: Mutex::new(StatsState::default()),
        }
    }

    /// Total number of samples recorded.
    pub fn total_requests(&self) -> u64 {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.entries.values().map(|e| e.num_requests).sum()
    }

    /// Build a report of everything recorded so far.
    pub fn snapshot(&self) -> StatsReport {
        self.snapshot_at(Utc::now())
    }

    fn snapshot_at(&self, generated_at: DateTime<Utc>) -> StatsReport {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let duration_secs = (generated_at - self.started_at).num_milliseconds() as f64 / 1000.0;

        let mut total: Option<EndpointStats> = None;
        let entries = state
            .entries
            .iter()
            .map(|((request_type, name), stats)| {
                if let Some(total) = total.as_mut() {
                    total.merge(stats);
                } else {
                    total = Some(stats.clone());
                }
                stats.report(request_type, name, duration_secs)
            })
            .collect();

        let mut errors: Vec<ErrorReport> = state
            .errors
            .iter()
            .map(|((request_type, name, error), occurrences)| ErrorReport {
                request_type: request_type.clone(),
                name: name.clone(),
                error: error.clone(),
                occurrences: *occurrences,
            })
            .collect();
        errors.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));

        StatsReport {
            started_at: self.started_at,
            generated_at,
            entries,
            total: match total {
                Some(total) => total.report("", AGGREGATED_NAME, duration_secs),
                None => EndpointReport::empty("", AGGREGATED_NAME),
            },
            errors,
        }
    }
}

impl MetricsSink for StatsCollector {
    fn record(&self, sample: RequestSample) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let key = (sample.request_type.clone(), sample.name.clone());
        let stats = match state.entries.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => match EndpointStats::new() {
                Ok(stats) => entry.insert(stats),
                Err(e) => {
                    warn!("Failed to create latency histogram: {:?}", e);
                    return;
                }
            },
        };
        stats.add(&sample);

        if let Some(error) = sample.error {
            *state
                .errors
                .entry((sample.request_type, sample.name, error))
                .or_insert(0) += 1;
        }
    }
}
