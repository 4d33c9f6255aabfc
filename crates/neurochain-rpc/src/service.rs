// crates/neurochain-rpc/src/service.rs
//
// LedgerService: the single owner of a node's ledger.
//
// Constructed once in the daemon's main.rs and shared by Arc with the RPC
// server and the background resolve loop. All access to the chain and the
// pending buffer goes through the RwLock held here:
//
//   - submits, seals and chain swaps take the write lock;
//   - proof-of-work runs on a blocking thread with no lock held, and the seal
//     only happens if the tip it solved against is still the tip;
//   - resolution compares against a snapshot and swaps only if the local
//     chain has not moved in the meantime, then cancels in-flight mining.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use neurochain_core::block::{Block, ChainSnapshot, Transaction};
use neurochain_core::crypto::{digest, hash_block};
use neurochain_core::error::NeuroError;
use neurochain_core::ledger::Ledger;
use neurochain_core::pow::{solve_cancellable, CancelToken};
use neurochain_core::resolver::resolve;
use neurochain_core::traits::{ChainStore, PeerChainSource};
use neurochain_core::validator::{find_fault, ChainFault};

/// Result of accepting a model attestation into the pending buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// Block the transaction is expected to land in (best-effort hint).
    pub index: u64,
    /// SHA-256 fingerprint of the submitted model bytes.
    pub model_hash: String,
}

/// Result of a whole-chain integrity check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub length: usize,
    pub fault: Option<ChainFault>,
}

/// Result of one conflict-resolution round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveOutcome {
    /// Whether the local chain was replaced by a peer chain.
    pub replaced: bool,
    /// Local chain length after the round.
    pub length: usize,
    /// Peer snapshots considered.
    pub candidates: usize,
    /// Longer peer chains discarded as unverifiable.
    pub rejected: usize,
}

/// Shared handle to a node's ledger, persistence and peer transport.
#[derive(Clone)]
pub struct LedgerService {
    ledger: Arc<RwLock<Ledger>>,
    store: Option<Arc<dyn ChainStore>>,
    peers: Option<Arc<dyn PeerChainSource>>,
    /// Token cloned by every mining job; swapped for a fresh one after adoption.
    mining_cancel: Arc<Mutex<CancelToken>>,
    started_at: DateTime<Utc>,
}

impl std::fmt::Debug for LedgerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerService")
            .field("store_enabled", &self.store.is_some())
            .field("peers_enabled", &self.peers.is_some())
            .field("started_at", &self.started_at)
            .finish()
    }
}

impl LedgerService {
    /// Wrap an existing ledger.
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            store: None,
            peers: None,
            mining_cancel: Arc::new(Mutex::new(CancelToken::new())),
            started_at: Utc::now(),
        }
    }

    /// Persist the chain through `store` after every seal and adoption.
    pub fn with_store(mut self, store: Arc<dyn ChainStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Fetch competing chains from `peers` in [`LedgerService::resolve_with_peers`].
    pub fn with_peers(mut self, peers: Arc<dyn PeerChainSource>) -> Self {
        self.peers = Some(peers);
        self
    }

    /// Load the persisted chain, falling back to a fresh genesis ledger when
    /// nothing is stored or the stored chain does not load or verify.
    ///
    /// A rejected chain is moved aside through [`ChainStore::set_aside`]
    /// before the fallback, so the next seal never overwrites it. Fails only
    /// if that move fails.
    pub async fn restore_ledger(store: &dyn ChainStore) -> Result<Ledger, NeuroError> {
        let rejection = match store.load_chain().await {
            Ok(Some(chain)) => {
                let len = chain.len();
                match Ledger::from_chain(chain) {
                    Ok(ledger) => {
                        tracing::info!("Loaded {} block(s) from storage", len);
                        return Ok(ledger);
                    }
                    Err(e) => e,
                }
            }
            Ok(None) => {
                tracing::info!("No stored chain found; starting from genesis");
                return Ok(Ledger::genesis());
            }
            Err(e) => e,
        };

        tracing::warn!("Stored chain rejected: {}. Starting from genesis.", rejection);
        store.set_aside().await?;
        Ok(Ledger::genesis())
    }

    /// Fingerprint `file_data` and record it as a pending attestation.
    pub async fn submit_model(
        &self,
        author: &str,
        model_name: &str,
        file_data: &[u8],
    ) -> Result<SubmitReceipt, NeuroError> {
        let model_hash = digest(file_data);
        let index = self.submit_hash(author, model_name, &model_hash).await?;
        Ok(SubmitReceipt { index, model_hash })
    }

    /// Record an attestation for an already-computed model hash.
    pub async fn submit_hash(
        &self,
        author: &str,
        model_name: &str,
        model_hash: &str,
    ) -> Result<u64, NeuroError> {
        self.ledger.write().await.submit(author, model_name, model_hash)
    }

    /// Solve the puzzle for the current tip and seal the pending buffer.
    ///
    /// Fails with `Cancelled` if a peer chain was adopted mid-search and with
    /// `StaleTip` if the tip otherwise moved before the seal.
    pub async fn mine(&self) -> Result<Block, NeuroError> {
        let job = self.begin_mining().await?;
        tracing::info!(
            tip = job.tip_index,
            last_proof = job.last_proof,
            "Mining on top of block {}",
            job.tip_index
        );

        let last_proof = job.last_proof;
        let cancel = job.cancel.clone();
        let proof = tokio::task::spawn_blocking(move || solve_cancellable(last_proof, &cancel))
            .await
            .map_err(|e| {
                tracing::error!("Mining task failed: {}", e);
                NeuroError::Cancelled
            })??;

        self.seal_mined(&job, proof).await
    }

    /// Capture the tip a proof will be searched against.
    async fn begin_mining(&self) -> Result<MiningJob, NeuroError> {
        let (tip_index, last_proof, previous_hash) = {
            let ledger = self.ledger.read().await;
            let last = ledger.last_block()?;
            (last.index, last.proof, hash_block(last))
        };
        let cancel = self.mining_cancel.lock().await.clone();
        Ok(MiningJob {
            tip_index,
            last_proof,
            previous_hash,
            cancel,
        })
    }

    /// Seal the pending buffer with `proof` if `job`'s tip is still the tip.
    async fn seal_mined(&self, job: &MiningJob, proof: u64) -> Result<Block, NeuroError> {
        let mut ledger = self.ledger.write().await;
        let tip = ledger.last_block()?;
        if tip.index != job.tip_index || hash_block(tip) != job.previous_hash {
            return Err(NeuroError::StaleTip(format!(
                "tip moved from block {} to block {} while mining",
                job.tip_index, tip.index
            )));
        }
        let block = ledger.seal(proof, job.previous_hash.clone());
        self.persist(ledger.chain()).await;
        Ok(block)
    }

    /// Copy of the chain with its length, as served to clients and peers.
    pub async fn chain_snapshot(&self) -> ChainSnapshot {
        self.ledger.read().await.snapshot()
    }

    /// Transactions waiting for the next seal.
    pub async fn pending(&self) -> Vec<Transaction> {
        self.ledger.read().await.pending().to_vec()
    }

    pub async fn chain_len(&self) -> usize {
        self.ledger.read().await.len()
    }

    /// Look up the sealed attestation for `file_data`'s fingerprint.
    pub async fn verify_model(&self, file_data: &[u8]) -> Result<Transaction, NeuroError> {
        self.verify_model_hash(&digest(file_data)).await
    }

    /// Look up the first sealed attestation carrying `model_hash`.
    pub async fn verify_model_hash(&self, model_hash: &str) -> Result<Transaction, NeuroError> {
        self.ledger
            .read()
            .await
            .find_by_model_hash(model_hash)
            .cloned()
            .ok_or_else(|| NeuroError::NotFound(format!("model hash {}", model_hash)))
    }

    /// Check linkage and proof-of-work across the whole local chain.
    pub async fn validate(&self) -> ValidationReport {
        let ledger = self.ledger.read().await;
        let fault = find_fault(ledger.chain());
        ValidationReport {
            valid: fault.is_none(),
            length: ledger.len(),
            fault,
        }
    }

    /// Fetch peer chains and run a resolution round against them.
    ///
    /// Without a configured peer source this is a no-op round.
    pub async fn resolve_with_peers(&self) -> ResolveOutcome {
        let candidates = match &self.peers {
            Some(peers) => peers.fetch_peer_chains().await,
            None => Vec::new(),
        };
        self.resolve_candidates(candidates).await
    }

    /// Run the longest-valid-chain rule against already-fetched snapshots.
    ///
    /// Snapshots whose reported length disagrees with the blocks they carry,
    /// or whose chain is not rooted at genesis, are counted as rejected and
    /// never reach the resolver.
    pub async fn resolve_candidates(&self, candidates: Vec<ChainSnapshot>) -> ResolveOutcome {
        let considered = candidates.len();
        let (candidates, screened_out) = screen_candidates(candidates);

        let snapshot = self.ledger.read().await.chain().to_vec();
        let resolution = resolve(&snapshot, &candidates);

        let mut outcome = ResolveOutcome {
            replaced: false,
            length: snapshot.len(),
            candidates: considered,
            rejected: screened_out + resolution.rejected,
        };
        if !resolution.adopted {
            return outcome;
        }

        let mut ledger = self.ledger.write().await;
        if ledger.len() != snapshot.len() || ledger.chain().last() != snapshot.last() {
            tracing::warn!(
                "Local chain moved during resolution ({} -> {} blocks); keeping it",
                snapshot.len(),
                ledger.len()
            );
            outcome.length = ledger.len();
            return outcome;
        }
        if let Err(e) = ledger.adopt_chain(resolution.chain) {
            tracing::warn!("Winning peer chain could not be adopted: {}", e);
            return outcome;
        }
        self.persist(ledger.chain()).await;
        outcome.replaced = true;
        outcome.length = ledger.len();
        drop(ledger);

        self.cancel_mining().await;
        tracing::info!("Our chain was replaced; now {} blocks", outcome.length);
        outcome
    }

    /// Number of configured peers (0 when peer networking is disabled).
    pub fn peer_count(&self) -> usize {
        self.peers.as_ref().map_or(0, |p| p.peer_count())
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Overwrite the author of the first transaction in block 2, the legacy
    /// tamper demonstration. Returns `false` if no such transaction exists.
    #[cfg(feature = "debug-tamper")]
    pub async fn corrupt_first_mined_block(&self) -> bool {
        let mut ledger = self.ledger.write().await;
        let has_transaction = ledger
            .chain()
            .get(1)
            .map_or(false, |block| !block.transactions.is_empty());
        if !has_transaction {
            return false;
        }
        ledger.tamper_with(1, |block| {
            block.transactions[0].author = "MALICIOUS_HACKER".to_string();
        })
    }

    /// Abort every in-flight mining job and arm a fresh token for new ones.
    async fn cancel_mining(&self) {
        let mut current = self.mining_cancel.lock().await;
        current.cancel();
        *current = CancelToken::new();
    }

    /// Write the chain to the configured store. Failures are logged, not fatal:
    /// the in-memory chain stays authoritative.
    async fn persist(&self, chain: &[Block]) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save_chain(chain).await {
                tracing::error!("Failed to persist chain: {}", e);
            }
        }
    }
}

/// Tip a mining job solves against, plus the token that aborts it.
struct MiningJob {
    tip_index: u64,
    last_proof: u64,
    previous_hash: String,
    cancel: CancelToken,
}

/// Split off snapshots the ledger could never adopt. Returns the rest and
/// the number dropped.
fn screen_candidates(candidates: Vec<ChainSnapshot>) -> (Vec<ChainSnapshot>, usize) {
    let total = candidates.len();
    let kept: Vec<ChainSnapshot> = candidates
        .into_iter()
        .filter(|candidate| {
            if !candidate.is_consistent() {
                tracing::warn!(
                    reported_length = candidate.length,
                    actual_length = candidate.chain.len(),
                    "Discarding peer chain with mismatched length"
                );
                return false;
            }
            if !candidate.starts_at_genesis() {
                tracing::warn!(
                    reported_length = candidate.length,
                    "Discarding peer chain not rooted at genesis"
                );
                return false;
            }
            true
        })
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}
