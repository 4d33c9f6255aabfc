// crates/neurochain-core/src/resolver.rs
//
// Longest-valid-chain rule.
//
// Candidates come from peers as already-deserialized snapshots; fetching
// them is the transport's job. A candidate displaces the running best only
// with a strictly greater reported length and a chain that passes full
// validation, so equal-length forks never cause churn.

use crate::block::{Block, ChainSnapshot};
use crate::validator::find_fault;

/// Outcome of a resolution round.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Whether a peer chain won over the local one.
    pub adopted: bool,
    /// The winning chain: the adopted peer chain, or the local chain unchanged.
    pub chain: Vec<Block>,
    /// Longer candidates discarded because they failed validation.
    pub rejected: usize,
}

/// Pick the longest valid chain among `local` and `candidates`.
pub fn resolve(local: &[Block], candidates: &[ChainSnapshot]) -> Resolution {
    let mut max_length = local.len();
    let mut winner: Option<&ChainSnapshot> = None;
    let mut rejected = 0;

    for candidate in candidates {
        if candidate.length <= max_length {
            continue;
        }
        match find_fault(&candidate.chain) {
            None => {
                max_length = candidate.length;
                winner = Some(candidate);
            }
            Some(fault) => {
                // Unverifiable peer chain: discard and keep going.
                tracing::warn!(
                    reported_length = candidate.length,
                    "Discarding unverifiable peer chain: {}",
                    fault
                );
                rejected += 1;
            }
        }
    }

    match winner {
        Some(snapshot) => {
            tracing::info!(
                local_length = local.len(),
                adopted_length = snapshot.length,
                "Longer valid chain found"
            );
            Resolution {
                adopted: true,
                chain: snapshot.chain.clone(),
                rejected,
            }
        }
        None => Resolution {
            adopted: false,
            chain: local.to_vec(),
            rejected,
        },
    }
}
