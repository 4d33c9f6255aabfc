// crates/neurochain-core/src/block.rs

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// `previous_hash` carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Seed proof of the genesis block; the first mined block solves against it.
pub const GENESIS_PROOF: u64 = 100;

/// One model attestation: who registered which model, and its fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Author (person or organisation) registering the model.
    pub author: String,
    /// Human-readable model name (e.g., "resnet50").
    pub model_name: String,
    /// SHA-256 hex digest of the model file contents.
    pub model_hash: String,
    /// Unix seconds at submission time.
    pub timestamp: f64,
}

/// A sealed batch of transactions linked to its predecessor by hash.
///
/// The serialized shape is `{index, timestamp, transactions, nonce, previous_hash}`;
/// block hashes are computed over that shape, so field names are part of the format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    /// 1-based position in the chain.
    pub index: u64,
    /// Unix seconds at seal time.
    pub timestamp: f64,
    /// Transactions in submission order.
    pub transactions: Vec<Transaction>,
    /// Proof-of-work solution relative to the previous block's proof.
    #[serde(rename = "nonce")]
    pub proof: u64,
    /// Hash of the previous block, or "0" for genesis.
    pub previous_hash: String,
}

impl Block {
    /// Build the genesis block stamped with the current time.
    pub fn genesis() -> Self {
        Block {
            index: 1,
            timestamp: unix_now(),
            transactions: Vec::new(),
            proof: GENESIS_PROOF,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
        }
    }

    /// Whether this block has the fixed genesis shape (timestamp ignored).
    pub fn is_genesis(&self) -> bool {
        self.index == 1
            && self.previous_hash == GENESIS_PREVIOUS_HASH
            && self.proof == GENESIS_PROOF
            && self.transactions.is_empty()
    }
}

/// A chain together with its reported length, as served to peers by `chain/get`.
///
/// The conflict resolver trusts `length` the way a peer reports it; the chain
/// itself is what gets validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl ChainSnapshot {
    pub fn new(chain: Vec<Block>) -> Self {
        let length = chain.len();
        Self { chain, length }
    }

    /// Whether the reported length matches the blocks actually carried.
    pub fn is_consistent(&self) -> bool {
        self.length == self.chain.len()
    }

    /// Whether the chain is rooted at a genesis block.
    pub fn starts_at_genesis(&self) -> bool {
        self.chain.first().map_or(false, Block::is_genesis)
    }
}

/// Current wall-clock time as Unix seconds with microsecond resolution.
pub fn unix_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
