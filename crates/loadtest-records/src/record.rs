//! Record types published to the stream.
//!
//! Field names on the wire are PascalCase (`Hash`, `PreviousBlockHash`, ...)
//! because downstream consumers of the stream read them that way.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Approved,
}

/// A synthetic transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    pub hash: String,
    pub status: TransactionStatus,
    pub amount: u32,
    #[serde(rename = "Type")]
    pub tx_type: u8,
    pub nonce: u32,
    pub fee: u32,
    /// `(address, amount)` pairs, serialized as two-element arrays.
    pub sender: Vec<(String, u32)>,
    pub receiver: Vec<(String, u32)>,
}

/// Off-chain data descriptor carried in a block's sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffChainData {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Size")]
    pub size: u32,
    /// Hash of one of the enclosing block's transactions.
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,
}

/// A synthetic block.
///
/// `previous_block_hash` is random and does not reference a real block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    pub hash: String,
    pub previous_block_hash: String,
    pub height: u32,
    pub nonce: u32,
    pub difficulty: u32,
    pub miner: String,
    /// Unix seconds.
    pub timestamp: i64,
    pub transactions: Vec<Transaction>,
    pub uncles: Vec<String>,
    pub sidecar: Vec<OffChainData>,
    pub off_chain_data_sizes: Vec<u32>,
}

/// The `{type, data}` wrapper that is serialized and sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Envelope {
    #[serde(rename = "TRANSACTION")]
    Transaction(Transaction),
    #[serde(rename = "BLOCK")]
    Block(Block),
}

impl Envelope {
    /// The type tag used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Transaction(_) => "TRANSACTION",
            Envelope::Block(_) => "BLOCK",
        }
    }

    /// Partition key for this envelope: the inner record's hash.
    pub fn partition_key(&self) -> &str {
        match self {
            Envelope::Transaction(txn) => &txn.hash,
            Envelope::Block(block) => &block.hash,
        }
    }

    /// Encode to the JSON wire representation.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode from the JSON wire representation.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_transaction() -> Transaction {
        Transaction {
            hash: "0x0123456789abcdef0123456789abcdef".to_string(),
            status: TransactionStatus::Pending,
            amount: 42,
            tx_type: 2,
            nonce: 1234,
            fee: 3,
            sender: vec![("0x0123456789abcdef".to_string(), 42)],
            receiver: vec![("0xfedcba9876543210".to_string(), 42)],
        }
    }

    #[test]
    fn test_transaction_wire_format() {
        let envelope = Envelope::Transaction(sample_transaction());
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "TRANSACTION",
                "data": {
                    "Hash": "0x0123456789abcdef0123456789abcdef",
                    "Status": "PENDING",
                    "Amount": 42,
                    "Type": 2,
                    "Nonce": 1234,
                    "Fee": 3,
                    "Sender": [["0x0123456789abcdef", 42]],
                    "Receiver": [["0xfedcba9876543210", 42]]
                }
            })
        );
    }

    #[test]
    fn test_block_wire_format() {
        let mut txn = sample_transaction();
        txn.status = TransactionStatus::Approved;
        let block = Block {
            hash: "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
            previous_block_hash: "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".to_string(),
            height: 7,
            nonce: 99,
            difficulty: 12,
            miner: "0xcccccccccccccccccccccccccccccccc".to_string(),
            timestamp: 1_500_000_000,
            sidecar: vec![OffChainData {
                id: "0xdddddddddddddddddddddddddddddddd".to_string(),
                size: 1500,
                transaction_id: txn.hash.clone(),
            }],
            transactions: vec![txn],
            uncles: vec![],
            off_chain_data_sizes: vec![1024, 2048],
        };

        let value = serde_json::to_value(Envelope::Block(block)).unwrap();
        assert_eq!(value["type"], "BLOCK");

        let data = &value["data"];
        assert_eq!(data["PreviousBlockHash"], "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
        assert_eq!(data["Transactions"][0]["Status"], "APPROVED");
        assert_eq!(data["Uncles"], json!([]));
        assert_eq!(data["Sidecar"][0]["ID"], "0xdddddddddddddddddddddddddddddddd");
        assert_eq!(data["Sidecar"][0]["Size"], 1500);
        assert_eq!(
            data["Sidecar"][0]["TransactionID"],
            "0x0123456789abcdef0123456789abcdef"
        );
        assert_eq!(data["OffChainDataSizes"], json!([1024, 2048]));
    }

    #[test]
    fn test_decode_external_payload() {
        let payload = br#"{"type":"TRANSACTION","data":{"Hash":"0x1","Status":"APPROVED","Amount":5,"Type":1,"Nonce":0,"Fee":1,"Sender":[["0x2",5]],"Receiver":[["0x3",5]]}}"#;

        let envelope = Envelope::from_json_slice(payload).unwrap();
        assert_eq!(envelope.kind(), "TRANSACTION");
        assert_eq!(envelope.partition_key(), "0x1");
        match envelope {
            Envelope::Transaction(txn) => {
                assert_eq!(txn.status, TransactionStatus::Approved);
                assert_eq!(txn.sender, vec![("0x2".to_string(), 5)]);
            }
            other => panic!("Expected transaction, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_tag_rejected() {
        let payload = br#"{"type":"RECEIPT","data":{}}"#;
        assert!(Envelope::from_json_slice(payload).is_err());
    }
}
