//! kinesis-loadtest library
//!
//! A load generator that fabricates synthetic transactions and streams them
//! to an Amazon Kinesis data stream, recording latency and failures per call.
//!
//! # Crates
//!
//! - `loadtest_records` - transaction/block synthesis and the JSON envelope
//! - `loadtest_populate_kinesis` - the Kinesis client adapter and audit log
//! - `loadtest_harness` - virtual users, runner and statistics
//!
//! This crate ties them together with the per-user driver and the CLI.
//!
//! # CLI Usage
//!
//! ```bash
//! # 50 users, 5 new users per second, for 10 minutes
//! kinesis-loadtest run --stream-name transactions --users 50 --spawn-rate 5 --run-time 10m
//!
//! # Report 3 samples per call and skip the audit log
//! LOCUST_BATCH_SIZE=3 kinesis-loadtest run --host transactions --no-audit-log
//!
//! # Inspect generated records
//! kinesis-loadtest sample --kind block --count 2 --seed 42
//! ```

pub mod cli;
pub mod user;

pub use user::{synthesizer_for_user, TransactionUser, RECORDS_PER_REQUEST};
