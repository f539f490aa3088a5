//! Kinesis client adapter.
//!
//! Wraps one batch put per call with timing, audit logging, and sample
//! reporting. Failures never reach the caller: they are attached to the
//! reported samples and otherwise dropped. There is no retry.

use crate::audit::AuditLog;
use crate::batch::BatchEntry;
use crate::config::ClientConfig;
use crate::error::IngestError;
use crate::sink::{KinesisSink, RecordSink};
use chrono::{Local, Utc};
use loadtest_harness::{MetricsSink, RequestSample};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Request type label on reported samples.
pub const REQUEST_TYPE: &str = "Send data";

/// Target label on reported samples.
pub const REQUEST_NAME: &str = "Kinesis";

/// Sends batches to one stream and reports their latency.
///
/// # Example
///
/// ```ignore
/// let config = ClientConfig::from_args(&args)?;
/// let stats = Arc::new(StatsCollector::new());
/// let client = KinesisClient::connect(&config, stats.clone()).await;
///
/// let (envelope, key) = Synthesizer::from_entropy().synthesize_transaction();
/// client.send(&[BatchEntry::from_envelope(&envelope, key)?]).await;
/// ```
pub struct KinesisClient {
    sink: Arc<dyn RecordSink>,
    metrics: Arc<dyn MetricsSink>,
    stream_name: String,
    batch_size: usize,
    audit_log: Option<AuditLog>,
}

impl KinesisClient {
    /// Create a client over an arbitrary record sink.
    pub fn new(
        config: &ClientConfig,
        sink: Arc<dyn RecordSink>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            sink,
            metrics,
            stream_name: config.stream_name.clone(),
            batch_size: config.batch_size,
            audit_log: config.audit_log.clone().map(AuditLog::new),
        }
    }

    /// Create a client backed by the AWS Kinesis API.
    pub async fn connect(config: &ClientConfig, metrics: Arc<dyn MetricsSink>) -> Self {
        let sink = KinesisSink::new(&config.region).await;
        info!(
            "Created Kinesis client in '{}' for Kinesis stream '{}'",
            config.region, config.stream_name
        );
        Self::new(config, Arc::new(sink), metrics)
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Submit `batch` in one call and report `batch_size` samples.
    pub async fn send(&self, batch: &[BatchEntry]) {
        let start_time = Utc::now();
        let local_start = Local::now();
        let timer = Instant::now();

        let result = match batch.first() {
            Some(_) => self.sink.put_records(&self.stream_name, batch).await,
            None => Err(IngestError::EmptyBatch),
        };

        let error = match result {
            Ok(()) => {
                if let (Some(log), Some(first)) = (&self.audit_log, batch.first()) {
                    // Separate failure boundary: the put already succeeded
                    if let Err(e) = log.append(&first.partition_key, &local_start) {
                        warn!(
                            "Failed to append to audit log {:?}: {}",
                            log.path(),
                            e
                        );
                    }
                }
                None
            }
            Err(e) => {
                debug!("Send to '{}' failed: {}", self.stream_name, e);
                Some(e.to_string())
            }
        };

        let response_time_ms = timer.elapsed().as_secs_f64() * 1000.0;

        let sample = RequestSample {
            request_type: REQUEST_TYPE.to_string(),
            name: REQUEST_NAME.to_string(),
            start_time,
            response_time_ms,
            response_length: 0,
            error,
        };

        for _ in 0..self.batch_size {
            self.metrics.record(sample.clone());
        }
    }
}
