// crates/neurochain-core/src/error.rs

use thiserror::Error;

/// Ledger-wide error types for NeuroChain.
#[derive(Debug, Error)]
pub enum NeuroError {
    /// Malformed or missing transaction fields.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The chain has no blocks. Unreachable for a ledger seeded with genesis.
    #[error("Chain is empty")]
    EmptyChain,

    /// Lookup miss (e.g., no transaction carries the requested model hash).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A chain failed linkage or proof-of-work checks and was rejected.
    #[error("Unverifiable chain: {0}")]
    Unverifiable(String),

    /// A proof-of-work search was abandoned through its cancel token.
    #[error("Proof-of-work search cancelled")]
    Cancelled,

    /// The chain tip moved while a proof was being searched for.
    #[error("Stale tip: {0}")]
    StaleTip(String),

    /// Persistence layer error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Peer transport error.
    #[error("Network error: {0}")]
    Network(String),
}

impl From<serde_json::Error> for NeuroError {
    fn from(e: serde_json::Error) -> Self {
        NeuroError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for NeuroError {
    fn from(e: std::io::Error) -> Self {
        NeuroError::Storage(e.to_string())
    }
}
