//! CLI argument definitions for the Kinesis adapter.

use clap::Args;
use std::path::PathBuf;

/// Region used when `--region` / `REGION` is not set.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default path of the audit log.
pub const DEFAULT_AUDIT_LOG: &str = "kinesis.csv";

/// Kinesis-specific arguments.
#[derive(Args, Clone, Debug)]
pub struct KinesisArgs {
    /// AWS region of the stream
    #[arg(long, env = "REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Kinesis stream to write to
    #[arg(long, env = "KINESIS_DEFAULT_STREAM_NAME")]
    pub stream_name: Option<String>,

    /// Load test target; used as the stream name when --stream-name is not set
    #[arg(long, env = "LOADTEST_HOST")]
    pub host: Option<String>,

    /// Number of request samples reported per PutRecords call
    #[arg(long, env = "LOCUST_BATCH_SIZE", default_value = "1")]
    pub batch_size: usize,

    /// File receiving one "partition_key,timestamp" line per successful call
    #[arg(long, env = "KINESIS_AUDIT_LOG", default_value = DEFAULT_AUDIT_LOG)]
    pub audit_log: PathBuf,

    /// Disable the audit log
    #[arg(long)]
    pub no_audit_log: bool,
}

impl Default for KinesisArgs {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            stream_name: None,
            host: None,
            batch_size: 1,
            audit_log: PathBuf::from(DEFAULT_AUDIT_LOG),
            no_audit_log: false,
        }
    }
}
