//! Kinesis load testing integration test.

use async_trait::async_trait;
use kinesis_loadtest::{synthesizer_for_user, TransactionUser, RECORDS_PER_REQUEST};
use loadtest_harness::{
    RecordingSink, Runner, RunnerConfig, StatsCollector, VirtualUser, WaitTime,
};
use loadtest_populate_kinesis::{
    BatchEntry, ClientConfig, IngestError, KinesisClient, RecordSink, REQUEST_NAME, REQUEST_TYPE,
};
use loadtest_records::{Envelope, TransactionStatus};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const STREAM: &str = "loadtest-transactions";
const SEED: u64 = 42;

/// In-memory stand-in for a Kinesis stream.
#[derive(Default)]
struct MemoryStream {
    puts: Mutex<Vec<Vec<BatchEntry>>>,
}

impl MemoryStream {
    fn puts(&self) -> Vec<Vec<BatchEntry>> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for MemoryStream {
    async fn put_records(
        &self,
        stream_name: &str,
        entries: &[BatchEntry],
    ) -> Result<(), IngestError> {
        assert_eq!(stream_name, STREAM);
        self.puts.lock().unwrap().push(entries.to_vec());
        Ok(())
    }
}

/// Stream that rejects every call, as when the stream does not exist.
struct MissingStream;

#[async_trait]
impl RecordSink for MissingStream {
    async fn put_records(
        &self,
        stream_name: &str,
        _entries: &[BatchEntry],
    ) -> Result<(), IngestError> {
        Err(IngestError::Sdk(format!(
            "ResourceNotFoundException: Stream {stream_name} not found"
        )))
    }
}

fn config(batch_size: usize, audit_log: Option<std::path::PathBuf>) -> ClientConfig {
    ClientConfig {
        region: "us-east-1".to_string(),
        stream_name: STREAM.to_string(),
        batch_size,
        audit_log,
    }
}

#[tokio::test]
async fn test_task_sends_one_transaction() {
    let stream = Arc::new(MemoryStream::default());
    let metrics = Arc::new(RecordingSink::new());
    let client = Arc::new(KinesisClient::new(&config(1, None), stream.clone(), metrics.clone()));

    let mut user = TransactionUser::new(client, synthesizer_for_user(Some(SEED), 0));
    user.on_start().await.unwrap();
    assert!(user.user_id().is_some());

    user.task().await;

    let puts = stream.puts();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].len(), RECORDS_PER_REQUEST);

    let entry = &puts[0][0];
    match Envelope::from_json_slice(&entry.data).unwrap() {
        Envelope::Transaction(txn) => {
            assert_eq!(entry.partition_key, txn.hash);
            assert_eq!(txn.status, TransactionStatus::Pending);
        }
        other => panic!("Expected a transaction, got {other:?}"),
    }

    let samples = metrics.samples();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].request_type, REQUEST_TYPE);
    assert_eq!(samples[0].name, REQUEST_NAME);
    assert!(samples[0].error.is_none());
}

#[tokio::test]
async fn test_seeded_user_is_deterministic() {
    let stream_a = Arc::new(MemoryStream::default());
    let stream_b = Arc::new(MemoryStream::default());
    let metrics = Arc::new(RecordingSink::new());

    for stream in [&stream_a, &stream_b] {
        let client = Arc::new(KinesisClient::new(
            &config(1, None),
            stream.clone(),
            metrics.clone(),
        ));
        let mut user = TransactionUser::new(client, synthesizer_for_user(Some(SEED), 5));
        user.task().await;
        user.task().await;
    }

    assert_eq!(stream_a.puts(), stream_b.puts());
}

#[tokio::test]
async fn test_failed_sends_are_reported() {
    let metrics = Arc::new(RecordingSink::new());
    let client = Arc::new(KinesisClient::new(
        &config(2, None),
        Arc::new(MissingStream),
        metrics.clone(),
    ));

    let mut user = TransactionUser::new(client, synthesizer_for_user(Some(SEED), 0));
    user.task().await;

    let samples = metrics.samples();
    assert_eq!(samples.len(), 2);
    for sample in samples {
        assert!(sample
            .error
            .as_deref()
            .unwrap()
            .contains("ResourceNotFoundException"));
    }
}

#[tokio::test]
async fn test_runner_drives_users_end_to_end() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter("kinesis_loadtest=info,loadtest_harness=info")
        .try_init()
        .ok();

    let dir = tempfile::tempdir().unwrap();
    let audit_log = dir.path().join("kinesis.csv");

    let stream = Arc::new(MemoryStream::default());
    let stats = Arc::new(StatsCollector::new());
    let client = Arc::new(KinesisClient::new(
        &config(3, Some(audit_log.clone())),
        stream.clone(),
        stats.clone(),
    ));

    let runner = Runner::new(RunnerConfig {
        users: 2,
        spawn_rate: 0.0,
        run_time: Some(Duration::from_millis(300)),
        wait_time: WaitTime::Constant(Duration::from_millis(20)),
    });

    let summary = runner
        .run(|user_index| {
            TransactionUser::new(client.clone(), synthesizer_for_user(Some(SEED), user_index))
        })
        .await;

    assert_eq!(summary.users_started, 2);
    assert_eq!(summary.users_failed, 0);

    let puts = stream.puts();
    assert_eq!(puts.len() as u64, summary.tasks_completed);

    // batch size 3: three samples per put
    let report = stats.snapshot();
    assert_eq!(report.total.num_requests, 3 * summary.tasks_completed);
    assert_eq!(report.total.num_failures, 0);

    // One audit line per successful put, keyed by the first entry
    let content = std::fs::read_to_string(&audit_log).unwrap();
    let keys: Vec<&str> = content
        .lines()
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(keys.len(), puts.len());
    for put in &puts {
        assert!(keys.contains(&put[0].partition_key.as_str()));
    }
}
