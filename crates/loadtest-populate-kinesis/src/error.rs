//! Error types for the Kinesis adapter.

use thiserror::Error;

/// Fatal configuration errors, raised before any user starts.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Kinesis stream name is not set (use --stream-name, KINESIS_DEFAULT_STREAM_NAME or --host)")]
    MissingStreamName,

    #[error("Invalid AWS region: '{0}'")]
    InvalidRegion(String),

    #[error("Batch size must be at least 1, got {0}")]
    InvalidBatchSize(usize),
}

/// Errors from a single batch put. Recorded on the request sample, never
/// propagated to the caller of `send`.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("PutRecords failed: {0}")]
    Sdk(String),

    #[error("Invalid record entry: {0}")]
    InvalidEntry(String),

    #[error("Batch contains no records")]
    EmptyBatch,
}
