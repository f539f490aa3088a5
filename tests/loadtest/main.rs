//! Load testing integration tests.
//!
//! These tests drive the full synthesize -> send -> record workflow with an
//! in-memory record sink standing in for Kinesis. Each test:
//! 1. Builds a `KinesisClient` over the in-memory sink
//! 2. Runs `TransactionUser`s directly or through the `Runner`
//! 3. Decodes what reached the sink and checks the recorded samples

mod kinesis_loadtest;
