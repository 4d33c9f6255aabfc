// crates/neurochain-core/src/validator.rs
//
// Whole-chain integrity check: hash linkage and proof-of-work between every
// consecutive pair of blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::crypto::hash_block;
use crate::pow::valid_proof;

/// Which check a block failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultKind {
    /// `previous_hash` does not match the hash of the preceding block.
    BrokenLink,
    /// The proof does not solve the puzzle posed by the preceding proof.
    InvalidProof,
}

/// The first failing block found by [`find_fault`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainFault {
    /// Position of the failing block in the chain slice (0-based).
    pub position: usize,
    /// The failing block's own `index` field.
    pub block_index: u64,
    pub kind: FaultKind,
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FaultKind::BrokenLink => write!(
                f,
                "block {} previous_hash does not match block {}",
                self.block_index,
                self.block_index.saturating_sub(1)
            ),
            FaultKind::InvalidProof => {
                write!(f, "block {} carries an invalid proof-of-work", self.block_index)
            }
        }
    }
}

/// Locate the first block breaking linkage or proof-of-work, if any.
///
/// For each consecutive pair the link is checked before the proof.
pub fn find_fault(chain: &[Block]) -> Option<ChainFault> {
    chain.windows(2).enumerate().find_map(|(i, pair)| {
        let (previous, current) = (&pair[0], &pair[1]);
        let kind = if current.previous_hash != hash_block(previous) {
            FaultKind::BrokenLink
        } else if !valid_proof(previous.proof, current.proof) {
            FaultKind::InvalidProof
        } else {
            return None;
        };
        Some(ChainFault {
            position: i + 1,
            block_index: current.index,
            kind,
        })
    })
}

/// Returns `true` when every block links to and solves against its predecessor.
///
/// Chains of zero or one block are trivially valid.
pub fn is_valid(chain: &[Block]) -> bool {
    find_fault(chain).is_none()
}
