//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use loadtest_harness::{parse_duration, WaitTime};
use loadtest_populate_kinesis::KinesisArgs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "kinesis-loadtest")]
#[command(about = "Stream synthetic transactions to an Amazon Kinesis data stream")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run virtual users that send transactions to Kinesis
    Run(RunArgs),

    /// Print synthesized records as JSON lines (no network)
    Sample {
        /// Kind of record to synthesize
        #[arg(long, value_enum, default_value = "transaction")]
        kind: RecordKind,

        /// Number of records to print
        #[arg(long, default_value = "1")]
        count: u64,

        /// Random seed for deterministic output
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Arguments for the run command.
#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub kinesis: KinesisArgs,

    /// Number of concurrent virtual users
    #[arg(long, short = 'u', env = "LOADTEST_USERS", default_value = "1")]
    pub users: usize,

    /// Users started per second (0 = all at once)
    #[arg(long, short = 'r', env = "LOADTEST_SPAWN_RATE", default_value = "1")]
    pub spawn_rate: f64,

    /// Stop after this long, e.g. "30s", "5m", "1h" (default: until Ctrl-C)
    #[arg(long, short = 't', env = "LOADTEST_RUN_TIME", value_parser = parse_duration)]
    pub run_time: Option<Duration>,

    /// Wait between two tasks of the same user, e.g. "1s" or "1s..3s" (random)
    #[arg(long, default_value = "1s")]
    pub wait: WaitTime,

    /// Base random seed; user N is seeded with seed + N
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format for the final report
    #[arg(long, short = 'f', default_value = "table")]
    pub output_format: OutputFormat,

    /// Also write the final report as JSON to this file
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Validate configuration and print one sample record without sending
    #[arg(long)]
    pub dry_run: bool,
}

/// Output format for the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Markdown,
}

/// Record kind for the sample command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    Transaction,
    Block,
}
