//! Randomized transaction and block synthesis.

use crate::hex::{random_hex, ADDRESS_HEX_LEN, HASH_HEX_LEN};
use crate::record::{Block, Envelope, OffChainData, Transaction, TransactionStatus};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

const TX_AMOUNT: RangeInclusive<u32> = 1..=99;
const TX_TYPES: [u8; 3] = [1, 2, 3];
const NONCE: RangeInclusive<u32> = 0..=999_999;
const TX_FEE: RangeInclusive<u32> = 1..=9;

const BLOCK_HEIGHT: RangeInclusive<u32> = 1..=100;
const BLOCK_DIFFICULTY: RangeInclusive<u32> = 1..=100;
const BLOCK_TIMESTAMP: RangeInclusive<i64> = 1_000_000_000..=2_000_000_000;
const BLOCK_TRANSACTIONS: RangeInclusive<usize> = 0..=200;
const SIDECAR_ENTRIES: RangeInclusive<usize> = 0..=3;
const OFF_CHAIN_DATA_SIZE: RangeInclusive<u32> = 1024..=2048;
const OFF_CHAIN_DATA_SIZE_SAMPLES: usize = 2;

/// Record synthesizer over an explicit random source.
///
/// The values are plausible in shape but not semantically valid: block
/// hashes are not chained and amounts do not balance.
pub struct Synthesizer<R = StdRng> {
    rng: R,
}

impl Synthesizer<StdRng> {
    /// Create a synthesizer with a deterministic seeded RNG.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Create a synthesizer seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Synthesizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a pending transaction.
    pub fn random_transaction(&mut self) -> Transaction {
        let rng = &mut self.rng;

        let hash = random_hex(rng, HASH_HEX_LEN);
        let amount = rng.gen_range(TX_AMOUNT);
        let tx_type = TX_TYPES[rng.gen_range(0..TX_TYPES.len())];
        let nonce = rng.gen_range(NONCE);
        let fee = rng.gen_range(TX_FEE);
        let sender = vec![(random_hex(rng, ADDRESS_HEX_LEN), amount)];
        let receiver = vec![(random_hex(rng, ADDRESS_HEX_LEN), amount)];

        Transaction {
            hash,
            status: TransactionStatus::Pending,
            amount,
            tx_type,
            nonce,
            fee,
            sender,
            receiver,
        }
    }

    /// Generate a block with approved transactions and sidecar metadata.
    pub fn random_block(&mut self) -> Block {
        let hash = random_hex(&mut self.rng, HASH_HEX_LEN);
        let previous_block_hash = random_hex(&mut self.rng, HASH_HEX_LEN);
        let height = self.rng.gen_range(BLOCK_HEIGHT);
        let nonce = self.rng.gen_range(NONCE);
        let difficulty = self.rng.gen_range(BLOCK_DIFFICULTY);
        let miner = random_hex(&mut self.rng, HASH_HEX_LEN);
        let timestamp = self.rng.gen_range(BLOCK_TIMESTAMP);

        let tx_count = self.rng.gen_range(BLOCK_TRANSACTIONS);
        let transactions: Vec<Transaction> = (0..tx_count)
            .map(|_| {
                let mut txn = self.random_transaction();
                txn.status = TransactionStatus::Approved;
                txn
            })
            .collect();

        let mut sidecar = Vec::new();
        if !transactions.is_empty() {
            let entries = self.rng.gen_range(SIDECAR_ENTRIES);
            for _ in 0..entries {
                let id = random_hex(&mut self.rng, HASH_HEX_LEN);
                let size = self.rng.gen_range(OFF_CHAIN_DATA_SIZE);
                let transaction_id = transactions
                    .choose(&mut self.rng)
                    .map(|txn| txn.hash.clone())
                    .unwrap_or_default();
                sidecar.push(OffChainData {
                    id,
                    size,
                    transaction_id,
                });
            }
        }

        let off_chain_data_sizes = (0..OFF_CHAIN_DATA_SIZE_SAMPLES)
            .map(|_| self.rng.gen_range(OFF_CHAIN_DATA_SIZE))
            .collect();

        Block {
            hash,
            previous_block_hash,
            height,
            nonce,
            difficulty,
            miner,
            timestamp,
            transactions,
            uncles: Vec::new(),
            sidecar,
            off_chain_data_sizes,
        }
    }

    /// Generate a transaction envelope and its partition key.
    pub fn synthesize_transaction(&mut self) -> (Envelope, String) {
        let txn = self.random_transaction();
        let partition_key = txn.hash.clone();
        (Envelope::Transaction(txn), partition_key)
    }

    /// Generate a block envelope and its partition key.
    pub fn synthesize_block(&mut self) -> (Envelope, String) {
        let block = self.random_block();
        let partition_key = block.hash.clone();
        (Envelope::Block(block), partition_key)
    }
}
