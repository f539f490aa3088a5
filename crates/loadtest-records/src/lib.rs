//! Synthetic record generation for the Kinesis load test.
//!
//! This crate provides the `Synthesizer` which fabricates randomized
//! transaction and block records, wrapped in the `{type, data}` envelope that
//! is published to the stream. The synthesizer takes its random source as a
//! parameter, so a seeded `StdRng` gives reproducible output.
//!
//! # Architecture
//!
//! ```text
//!   RNG (StdRng / any Rng)
//!          │
//!          ▼
//! ┌──────────────────┐
//! │   Synthesizer    │
//! │                  │
//! │ - transactions   │
//! │ - blocks         │
//! └────────┬─────────┘
//!          │
//!          ▼
//!   (Envelope, partition_key)
//!          │
//!          ▼
//!   JSON bytes on the wire
//! ```
//!
//! # Example
//!
//! ```rust
//! use loadtest_records::{Envelope, Synthesizer};
//!
//! let mut synthesizer = Synthesizer::seeded(42);
//! let (envelope, partition_key) = synthesizer.synthesize_transaction();
//!
//! let bytes = envelope.to_json_bytes().unwrap();
//! let decoded = Envelope::from_json_slice(&bytes).unwrap();
//! assert_eq!(decoded, envelope);
//! assert_eq!(decoded.partition_key(), partition_key);
//! ```

pub mod hex;
pub mod record;
pub mod synthesizer;

// Re-exports for convenience
pub use hex::{random_hex, ADDRESS_HEX_LEN, HASH_HEX_LEN};
pub use record::{Block, Envelope, OffChainData, Transaction, TransactionStatus};
pub use synthesizer::Synthesizer;
