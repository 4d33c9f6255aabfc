// crates/neurochain-cli/src/output.rs
//
// Output formatting utilities for the NeuroChain CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use tabled::{Table, Tabled};

use neurochain_core::block::{Block, Transaction};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

/// One row per block in `neurochain chain show`.
#[derive(Debug, Tabled)]
pub struct BlockRow {
    #[tabled(rename = "Index")]
    pub index: u64,
    #[tabled(rename = "Timestamp (UTC)")]
    pub timestamp: String,
    #[tabled(rename = "Txs")]
    pub transactions: usize,
    #[tabled(rename = "Proof")]
    pub proof: u64,
    #[tabled(rename = "Previous Hash")]
    pub previous_hash: String,
}

impl From<&Block> for BlockRow {
    fn from(block: &Block) -> Self {
        Self {
            index: block.index,
            timestamp: format_timestamp(block.timestamp),
            transactions: block.transactions.len(),
            proof: block.proof,
            previous_hash: short_hash(&block.previous_hash),
        }
    }
}

/// One row per attestation.
#[derive(Debug, Tabled)]
pub struct TransactionRow {
    #[tabled(rename = "Author")]
    pub author: String,
    #[tabled(rename = "Model")]
    pub model_name: String,
    #[tabled(rename = "Model Hash")]
    pub model_hash: String,
    #[tabled(rename = "Timestamp (UTC)")]
    pub timestamp: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            author: tx.author.clone(),
            model_name: tx.model_name.clone(),
            model_hash: short_hash(&tx.model_hash),
            timestamp: format_timestamp(tx.timestamp),
        }
    }
}

/// Render fractional Unix seconds as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(secs: f64) -> String {
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    chrono::DateTime::from_timestamp(whole as i64, nanos)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| format!("{}", secs))
}

/// First 16 hex characters of a digest, for narrow tables.
pub fn short_hash(hash: &str) -> String {
    if hash.len() > 16 {
        format!("{}...", &hash[..16])
    } else {
        hash.to_string()
    }
}
