// crates/neurochain-store/src/memory.rs

use async_trait::async_trait;
use tokio::sync::RwLock;

use neurochain_core::block::Block;
use neurochain_core::error::NeuroError;
use neurochain_core::traits::ChainStore;

/// In-memory `ChainStore`. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    chain: RwLock<Option<Vec<Block>>>,
    rejected: RwLock<Option<Vec<Block>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks currently stored (0 if nothing was saved).
    pub async fn stored_len(&self) -> usize {
        self.chain.read().await.as_ref().map_or(0, |c| c.len())
    }

    /// Number of blocks in the chain last moved aside (0 if none).
    pub async fn rejected_len(&self) -> usize {
        self.rejected.read().await.as_ref().map_or(0, |c| c.len())
    }
}

#[async_trait]
impl ChainStore for MemoryStore {
    async fn save_chain(&self, chain: &[Block]) -> Result<(), NeuroError> {
        *self.chain.write().await = Some(chain.to_vec());
        Ok(())
    }

    async fn load_chain(&self) -> Result<Option<Vec<Block>>, NeuroError> {
        Ok(self.chain.read().await.clone())
    }

    async fn set_aside(&self) -> Result<(), NeuroError> {
        if let Some(chain) = self.chain.write().await.take() {
            *self.rejected.write().await = Some(chain);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurochain_core::Ledger;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.load_chain().await.unwrap().is_none());
        assert_eq!(store.stored_len().await, 0);

        let ledger = Ledger::genesis();
        store.save_chain(ledger.chain()).await.unwrap();
        assert_eq!(store.stored_len().await, 1);
        assert_eq!(store.load_chain().await.unwrap().unwrap(), ledger.chain());

        store.set_aside().await.unwrap();
        assert_eq!(store.stored_len().await, 0);
        assert_eq!(store.rejected_len().await, 1);
    }
}
