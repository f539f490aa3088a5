//! Batch entries submitted to the stream.

use loadtest_records::Envelope;

/// One record of a batch put: opaque payload bytes plus partition key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub data: Vec<u8>,
    pub partition_key: String,
}

impl BatchEntry {
    pub fn new(data: impl Into<Vec<u8>>, partition_key: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            partition_key: partition_key.into(),
        }
    }

    /// Serialize an envelope as the JSON payload of an entry.
    pub fn from_envelope(
        envelope: &Envelope,
        partition_key: impl Into<String>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(envelope.to_json_bytes()?, partition_key))
    }
}
