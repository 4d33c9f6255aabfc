// crates/neurochain-core/src/traits.rs

use async_trait::async_trait;

use crate::block::{Block, ChainSnapshot};
use crate::error::NeuroError;

/// Trait for persistent chain storage.
///
/// Implemented by neurochain-store (JSON file backend).
#[async_trait]
pub trait ChainStore: Send + Sync {
    /// Persist the full chain, replacing whatever was stored before.
    async fn save_chain(&self, chain: &[Block]) -> Result<(), NeuroError>;

    /// Load the stored chain. Returns `None` if nothing has been saved yet.
    async fn load_chain(&self) -> Result<Option<Vec<Block>>, NeuroError>;

    /// Move the stored chain out of the way so the next save cannot
    /// overwrite it. A store with nothing saved does nothing.
    async fn set_aside(&self) -> Result<(), NeuroError>;
}

/// Trait for fetching chain snapshots from peer replicas.
///
/// Implemented by the daemon's peer registry (HTTP/JSON-RPC).
#[async_trait]
pub trait PeerChainSource: Send + Sync {
    /// Fetch one snapshot per reachable peer. Unreachable peers are skipped.
    async fn fetch_peer_chains(&self) -> Vec<ChainSnapshot>;

    /// Number of configured peers.
    fn peer_count(&self) -> usize;
}
