//! Command-line interface for kinesis-loadtest
//!
//! # Usage Examples
//!
//! ## Load Test
//! ```bash
//! # 20 users, one transaction per user per second, for 5 minutes
//! kinesis-loadtest run \
//!   --stream-name transactions \
//!   --region us-east-1 \
//!   --users 20 --spawn-rate 5 \
//!   --run-time 5m
//!
//! # Validate configuration without sending anything
//! kinesis-loadtest run --stream-name transactions --dry-run
//! ```
//!
//! ## Record Inspection
//! ```bash
//! kinesis-loadtest sample --kind transaction --count 5 --seed 42
//! ```
//!
//! Settings are also read from the environment (`REGION`,
//! `KINESIS_DEFAULT_STREAM_NAME`, `LOCUST_BATCH_SIZE`, ...) and from a `.env`
//! file in the working directory.

use anyhow::Context;
use clap::Parser;
use kinesis_loadtest::cli::{Cli, Commands, OutputFormat, RecordKind, RunArgs};
use kinesis_loadtest::{synthesizer_for_user, TransactionUser};
use loadtest_harness::{
    format_markdown, format_table, Runner, RunnerConfig, StatsCollector, StatsReport,
};
use loadtest_populate_kinesis::{ClientConfig, KinesisClient};
use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {:?}", path);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_loadtest(args).await,
        Commands::Sample { kind, count, seed } => print_samples(kind, count, seed),
    }
}

async fn run_loadtest(args: RunArgs) -> anyhow::Result<()> {
    let config =
        ClientConfig::from_args(&args.kinesis).context("Invalid Kinesis configuration")?;

    info!(
        "Target stream '{}' in {} (batch size: {}, audit log: {:?})",
        config.stream_name, config.region, config.batch_size, config.audit_log
    );

    if args.dry_run {
        let (envelope, partition_key) =
            synthesizer_for_user(args.seed, 0).synthesize_transaction();
        info!("Dry run: sample record with partition key {}", partition_key);
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        info!("Dry run complete: configuration is valid, nothing was sent");
        return Ok(());
    }

    let stats = Arc::new(StatsCollector::new());
    let client = Arc::new(KinesisClient::connect(&config, stats.clone()).await);

    let runner = Runner::new(RunnerConfig {
        users: args.users,
        spawn_rate: args.spawn_rate,
        run_time: args.run_time,
        wait_time: args.wait,
    });

    let shutdown = runner.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, stopping users after their current task");
            shutdown.cancel();
        }
    });

    let seed = args.seed;
    let summary = runner
        .run(|user_index| {
            TransactionUser::new(client.clone(), synthesizer_for_user(seed, user_index))
        })
        .await;

    let report = stats.snapshot();
    output_report(&report, args.output_format)?;

    if let Some(path) = &args.report_json {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {path:?}"))?;
        info!("Report written to {:?}", path);
    }

    if summary.users_failed > 0 {
        warn!(
            "{} of {} users failed to start",
            summary.users_failed, summary.users_requested
        );
    }
    if summary.users_started == 0 && summary.users_requested > 0 {
        anyhow::bail!("No virtual user started");
    }

    Ok(())
}

fn output_report(report: &StatsReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => println!("{}", format_table(report)),
        OutputFormat::Markdown => println!("{}", format_markdown(report)),
    }
    Ok(())
}

fn print_samples(kind: RecordKind, count: u64, seed: Option<u64>) -> anyhow::Result<()> {
    let mut synthesizer = synthesizer_for_user(seed, 0);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for _ in 0..count {
        let (envelope, _) = match kind {
            RecordKind::Transaction => synthesizer.synthesize_transaction(),
            RecordKind::Block => synthesizer.synthesize_block(),
        };
        serde_json::to_writer(&mut out, &envelope)?;
        writeln!(out)?;
    }

    Ok(())
}
