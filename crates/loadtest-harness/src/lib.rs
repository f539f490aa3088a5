//! Load-test driver capability for kinesis-loadtest.
//!
//! This crate is the boundary between request code and the machinery that
//! schedules virtual users and aggregates their results:
//!
//! - **`MetricsSink`**: where adapters report `RequestSample`s
//! - **`VirtualUser`**: the per-user `on_start` / `task` / `on_stop` contract
//! - **`Runner`**: spawns users at a fixed rate and stops them between tasks
//! - **`StatsCollector`**: aggregates samples into a `StatsReport`
//!
//! ## Architecture
//!
//! ```text
//!   Runner ── spawns ──► VirtualUser (x N, one tokio task each)
//!                              │
//!                              │ task()
//!                              ▼
//!                       request adapter
//!                              │ RequestSample
//!                              ▼
//!                  MetricsSink (StatsCollector)
//!                              │
//!                              ▼
//!              StatsReport ─► table / markdown / JSON
//! ```

pub mod duration;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod user;

pub use duration::{parse_duration, DurationParseError};
pub use metrics::{
    EndpointReport, ErrorReport, MetricsSink, RecordingSink, RequestSample, StatsCollector,
    StatsReport, AGGREGATED_NAME,
};
pub use report::{format_markdown, format_table};
pub use runner::{RunSummary, Runner, RunnerConfig};
pub use user::{UserError, VirtualUser, WaitTime};
