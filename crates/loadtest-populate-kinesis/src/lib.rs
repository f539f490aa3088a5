//! Kinesis ingestion adapter for the kinesis-loadtest load generator.
//!
//! This crate provides the `KinesisClient` which submits batches of
//! synthesized records to a Kinesis data stream with `PutRecords`, measures
//! each call, and reports the outcome to a `MetricsSink`. Successful calls
//! are also appended to a local audit log.
//!
//! # Architecture
//!
//! ```text
//!   Vec<BatchEntry>  (JSON envelope bytes + partition key)
//!          │
//!          ▼
//! ┌─────────────────┐      ┌─────────────────┐
//! │  KinesisClient  │─────►│   RecordSink    │──► Kinesis PutRecords
//! │                 │      │  (KinesisSink)  │
//! │ - times call    │      └─────────────────┘
//! │ - audit log     │
//! │ - N samples     │──► MetricsSink
//! └─────────────────┘
//! ```
//!
//! Per-call failures are attached to the reported samples; only
//! configuration errors are fatal.

pub mod args;
pub mod audit;
pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod sink;

// Re-exports for convenience
pub use args::{KinesisArgs, DEFAULT_AUDIT_LOG, DEFAULT_REGION};
pub use audit::AuditLog;
pub use batch::BatchEntry;
pub use client::{KinesisClient, REQUEST_NAME, REQUEST_TYPE};
pub use config::ClientConfig;
pub use error::{ConfigError, IngestError};
pub use sink::{KinesisSink, RecordSink};
