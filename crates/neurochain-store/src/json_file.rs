// crates/neurochain-store/src/json_file.rs
//
// File-backed chain persistence.
//
// Layout: a single JSON array of blocks, each in the wire shape
// `{index, timestamp, transactions, nonce, previous_hash}`. Writes go to a
// sibling `.tmp` file first and are renamed into place, so a crash mid-write
// leaves the previous chain intact. A chain the node refuses to load is
// renamed to `{file}.rejected` rather than overwritten.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use neurochain_core::block::Block;
use neurochain_core::error::NeuroError;
use neurochain_core::traits::ChainStore;

/// `ChainStore` writing the chain to one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store persisting to `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at `{data_dir}/blockchain_data.json`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join("blockchain_data.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a rejected chain file is moved by [`ChainStore::set_aside`].
    pub fn rejected_path(&self) -> PathBuf {
        self.sibling(".rejected")
    }

    fn tmp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(suffix);
        PathBuf::from(path)
    }
}

#[async_trait]
impl ChainStore for JsonFileStore {
    async fn save_chain(&self, chain: &[Block]) -> Result<(), NeuroError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    NeuroError::Storage(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let json = serde_json::to_vec_pretty(chain)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &json).await.map_err(|e| {
            NeuroError::Storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            NeuroError::Storage(format!(
                "Failed to move {} into place: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(
            "Saved chain of {} block(s) to {}",
            chain.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn load_chain(&self) -> Result<Option<Vec<Block>>, NeuroError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(NeuroError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        let chain: Vec<Block> = serde_json::from_slice(&bytes)?;
        Ok(Some(chain))
    }

    async fn set_aside(&self) -> Result<(), NeuroError> {
        let rejected = self.rejected_path();
        match tokio::fs::rename(&self.path, &rejected).await {
            Ok(()) => {
                tracing::warn!(
                    "Moved rejected chain file {} to {}",
                    self.path.display(),
                    rejected.display()
                );
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(NeuroError::Storage(format!(
                "Failed to move {} aside: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurochain_core::{digest, hash_block, is_valid, solve, Ledger};

    /// Create a temporary file path using UUID to avoid conflicts.
    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("neurochain_test_{}_{}", label, uuid::Uuid::now_v7()))
            .join("blockchain_data.json")
    }

    fn mined_ledger() -> Ledger {
        let mut ledger = Ledger::genesis();
        ledger
            .submit("alice", "resnet50", &digest(b"weights"))
            .unwrap();
        let last = ledger.last_block().unwrap().clone();
        ledger.seal(solve(last.proof), hash_block(&last));
        ledger
    }

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let store = JsonFileStore::new(temp_path("missing"));
        assert!(store.load_chain().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_load_roundtrip_preserves_hashes() {
        let path = temp_path("roundtrip");
        let store = JsonFileStore::new(&path);
        let ledger = mined_ledger();

        store.save_chain(ledger.chain()).await.unwrap();
        assert!(path.exists());
        assert!(!store.tmp_path().exists());

        let loaded = store.load_chain().await.unwrap().unwrap();
        assert_eq!(loaded.len(), ledger.len());
        for (a, b) in ledger.chain().iter().zip(&loaded) {
            assert_eq!(hash_block(a), hash_block(b));
        }
        assert!(is_valid(&loaded));
        assert!(Ledger::from_chain(loaded).is_ok());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_file_uses_wire_shape() {
        let path = temp_path("shape");
        let store = JsonFileStore::new(&path);
        store.save_chain(Ledger::genesis().chain()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let genesis = &raw.as_array().unwrap()[0];
        assert_eq!(genesis["index"], 1);
        assert_eq!(genesis["nonce"], 100);
        assert_eq!(genesis["previous_hash"], "0");
        assert!(genesis["transactions"].as_array().unwrap().is_empty());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_chain() {
        let path = temp_path("overwrite");
        let store = JsonFileStore::new(&path);
        store.save_chain(Ledger::genesis().chain()).await.unwrap();
        let ledger = mined_ledger();
        store.save_chain(ledger.chain()).await.unwrap();

        let loaded = store.load_chain().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 2);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{not json").unwrap();

        let store = JsonFileStore::new(&path);
        let result = store.load_chain().await;
        assert!(matches!(result, Err(NeuroError::Serialization(_))));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_set_aside_keeps_file_contents() {
        let path = temp_path("aside");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{not json").unwrap();

        let store = JsonFileStore::new(&path);
        store.set_aside().await.unwrap();
        assert!(!path.exists());
        assert_eq!(std::fs::read(store.rejected_path()).unwrap(), b"{not json");
        assert!(store.load_chain().await.unwrap().is_none());

        // Nothing left to move.
        store.set_aside().await.unwrap();

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_in_dir_file_name() {
        let store = JsonFileStore::in_dir("/var/lib/neurochain");
        assert!(store.path().ends_with("blockchain_data.json"));
        assert!(store.rejected_path().ends_with("blockchain_data.json.rejected"));
    }
}
