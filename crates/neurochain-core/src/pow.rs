// crates/neurochain-core/src/pow.rs
//
// Proof-of-work puzzle.
//
// A proof `p` is valid against the previous proof `q` when
// SHA-256(decimal(q) ++ decimal(p)) starts with four hex zeros, i.e. roughly
// one success per 65536 attempts. The search always walks upward from 0, so
// every implementation finds the same (smallest) solution.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::crypto::digest;
use crate::error::NeuroError;

/// Required hex prefix of a winning digest.
pub const DIFFICULTY_PREFIX: &str = "0000";

/// Number of attempts between two cancel-token polls.
pub const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Cooperative cancellation flag shared between a miner and whoever may abort it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone of this token observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Check whether `proof` solves the puzzle posed by `previous_proof`.
pub fn valid_proof(previous_proof: u64, proof: u64) -> bool {
    let guess = format!("{}{}", previous_proof, proof);
    digest(guess.as_bytes()).starts_with(DIFFICULTY_PREFIX)
}

/// Find the smallest proof solving the puzzle for `previous_proof`.
///
/// Blocks the calling thread until a solution is found. Prefer
/// [`solve_cancellable`] anywhere the search may need to be abandoned.
pub fn solve(previous_proof: u64) -> u64 {
    match solve_cancellable(previous_proof, &CancelToken::new()) {
        Ok(proof) => proof,
        // A fresh token never trips, so only exhaustion of the u64 space lands here.
        Err(_) => u64::MAX,
    }
}

/// Ascending search from 0, polling `cancel` every [`CANCEL_CHECK_INTERVAL`] attempts.
///
/// Returns `NeuroError::Cancelled` once the token trips; a token cancelled
/// before the call returns immediately.
pub fn solve_cancellable(previous_proof: u64, cancel: &CancelToken) -> Result<u64, NeuroError> {
    let mut proof = 0u64;
    loop {
        if proof % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            tracing::debug!(previous_proof, attempts = proof, "proof-of-work search cancelled");
            return Err(NeuroError::Cancelled);
        }
        if valid_proof(previous_proof, proof) {
            return Ok(proof);
        }
        proof = proof
            .checked_add(1)
            .ok_or_else(|| NeuroError::InvalidInput("proof search space exhausted".to_string()))?;
    }
}
