//! Per-virtual-user driver.

use async_trait::async_trait;
use loadtest_harness::{UserError, VirtualUser};
use loadtest_populate_kinesis::{BatchEntry, KinesisClient};
use loadtest_records::Synthesizer;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Records synthesized per task, i.e. per PutRecords call.
pub const RECORDS_PER_REQUEST: usize = 1;

/// Build the synthesizer for user `user_index`.
///
/// With a base seed, user N gets `seed + N` so runs are reproducible.
pub fn synthesizer_for_user(seed: Option<u64>, user_index: usize) -> Synthesizer<StdRng> {
    match seed {
        Some(seed) => Synthesizer::seeded(seed.wrapping_add(user_index as u64)),
        None => Synthesizer::from_entropy(),
    }
}

/// Virtual user that sends one synthesized transaction per task.
///
/// Block synthesis is not used here; only transactions are sent.
pub struct TransactionUser {
    client: Arc<KinesisClient>,
    synthesizer: Synthesizer<StdRng>,
    user_id: Option<Uuid>,
}

impl TransactionUser {
    pub fn new(client: Arc<KinesisClient>, synthesizer: Synthesizer<StdRng>) -> Self {
        Self {
            client,
            synthesizer,
            user_id: None,
        }
    }

    /// Identifier assigned in `on_start`.
    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    /// Synthesize the entries for one request.
    pub fn build_batch(&mut self) -> Vec<BatchEntry> {
        let mut batch = Vec::with_capacity(RECORDS_PER_REQUEST);
        for _ in 0..RECORDS_PER_REQUEST {
            let (envelope, partition_key) = self.synthesizer.synthesize_transaction();
            match BatchEntry::from_envelope(&envelope, partition_key) {
                Ok(entry) => batch.push(entry),
                Err(e) => {
                    warn!("Skipping record that failed to encode: {}", e);
                }
            }
        }
        batch
    }
}

#[async_trait]
impl VirtualUser for TransactionUser {
    async fn on_start(&mut self) -> Result<(), UserError> {
        let user_id = Uuid::new_v4();
        debug!("Starting user {}", user_id);
        self.user_id = Some(user_id);
        Ok(())
    }

    async fn task(&mut self) {
        let batch = self.build_batch();
        debug!(
            "Generated events for Kinesis: {:?}",
            batch.iter().map(|e| &e.partition_key).collect::<Vec<_>>()
        );
        self.client.send(&batch).await;
    }
}
