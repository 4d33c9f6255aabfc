// crates/neurochain-core/src/lib.rs
//
// neurochain-core: Ledger engine for NeuroChain, an append-only registry of
// AI-model provenance attestations.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines blocks and transactions, canonical hashing, the proof-of-work
// puzzle, whole-chain validation, the longest-valid-chain resolver, and the
// trait seams for persistence and peer transport.

pub mod block;
pub mod crypto;
pub mod error;
pub mod ledger;
pub mod pow;
pub mod resolver;
pub mod traits;
pub mod validator;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use neurochain_core::Ledger;`

pub use block::{Block, ChainSnapshot, Transaction, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
pub use crypto::{digest, hash_block, is_digest};
pub use error::NeuroError;
pub use ledger::Ledger;
pub use pow::{solve, solve_cancellable, valid_proof, CancelToken};
pub use resolver::{resolve, Resolution};
pub use traits::{ChainStore, PeerChainSource};
pub use validator::{find_fault, is_valid, ChainFault, FaultKind};
