//! Record sinks: the network boundary of the adapter.

use crate::batch::BatchEntry;
use crate::error::IngestError;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_kinesis::config::Region;
use aws_sdk_kinesis::error::DisplayErrorContext;
use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::types::PutRecordsRequestEntry;
use tracing::debug;

/// Destination of batch puts.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Submit `entries` to `stream_name` in one call.
    ///
    /// Partial failures reported by the service are not inspected.
    async fn put_records(&self, stream_name: &str, entries: &[BatchEntry])
        -> Result<(), IngestError>;
}

/// Sink backed by the AWS Kinesis `PutRecords` API.
///
/// Creating an SDK client loads credentials and builds a connection pool,
/// so one sink is shared by all virtual users.
pub struct KinesisSink {
    client: aws_sdk_kinesis::Client,
}

impl KinesisSink {
    /// Create a sink for `region` using the default AWS credential chain.
    pub async fn new(region: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self::from_client(aws_sdk_kinesis::Client::new(&sdk_config))
    }

    pub fn from_client(client: aws_sdk_kinesis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordSink for KinesisSink {
    async fn put_records(
        &self,
        stream_name: &str,
        entries: &[BatchEntry],
    ) -> Result<(), IngestError> {
        let records = entries
            .iter()
            .map(|entry| {
                PutRecordsRequestEntry::builder()
                    .data(Blob::new(entry.data.clone()))
                    .partition_key(entry.partition_key.clone())
                    .build()
                    .map_err(|e| IngestError::InvalidEntry(e.to_string()))
            })
            .collect::<Result<Vec<_>, IngestError>>()?;

        self.client
            .put_records()
            .stream_name(stream_name)
            .set_records(Some(records))
            .send()
            .await
            .map_err(|e| IngestError::Sdk(DisplayErrorContext(&e).to_string()))?;

        debug!(
            "Put {} records to Kinesis stream '{}'",
            entries.len(),
            stream_name
        );

        Ok(())
    }
}
