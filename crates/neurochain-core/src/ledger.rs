// crates/neurochain-core/src/ledger.rs
//
// The append-only chain plus the buffer of transactions waiting for the next
// seal. The ledger is plain data: callers that share it across tasks wrap it
// in a lock (see `LedgerService` in neurochain-rpc).

use crate::block::{unix_now, Block, ChainSnapshot, Transaction};
use crate::crypto::is_digest;
use crate::error::NeuroError;
use crate::validator::find_fault;

/// Chain of sealed blocks and the pending-transaction buffer.
///
/// Sealed blocks are only ever handed out by shared reference or by clone.
#[derive(Debug, Clone)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    /// Latest timestamp handed to a transaction; keeps submissions non-decreasing.
    last_timestamp: f64,
}

impl Ledger {
    /// Create a ledger holding only the genesis block.
    pub fn genesis() -> Self {
        let genesis = Block::genesis();
        let last_timestamp = genesis.timestamp;
        Self {
            chain: vec![genesis],
            pending: Vec::new(),
            last_timestamp,
        }
    }

    /// Rebuild a ledger from previously persisted blocks.
    ///
    /// The chain must be non-empty, start with a genesis block and pass full
    /// validation. The pending buffer starts empty.
    pub fn from_chain(chain: Vec<Block>) -> Result<Self, NeuroError> {
        check_adoptable(&chain)?;
        let last_timestamp = latest_timestamp(&chain);
        Ok(Self {
            chain,
            pending: Vec::new(),
            last_timestamp,
        })
    }

    /// Record a model attestation in the pending buffer.
    ///
    /// Returns the index of the block the transaction is expected to land in.
    /// This is a hint only: whichever seal happens next takes the whole buffer,
    /// and a chain adopted from a peer in the meantime shifts the numbering.
    pub fn submit(
        &mut self,
        author: &str,
        model_name: &str,
        model_hash: &str,
    ) -> Result<u64, NeuroError> {
        if author.trim().is_empty() {
            return Err(NeuroError::InvalidInput("author must not be empty".to_string()));
        }
        if model_name.trim().is_empty() {
            return Err(NeuroError::InvalidInput("model_name must not be empty".to_string()));
        }
        if !is_digest(model_hash) {
            return Err(NeuroError::InvalidInput(format!(
                "model_hash must be a 64-character lowercase hex digest, got {:?}",
                model_hash
            )));
        }

        let timestamp = self.next_timestamp();
        self.pending.push(Transaction {
            author: author.to_string(),
            model_name: model_name.to_string(),
            model_hash: model_hash.to_string(),
            timestamp,
        });

        let predicted = self.next_index();
        tracing::debug!(
            author,
            model_name,
            model_hash,
            predicted_block = predicted,
            "Transaction added to pending buffer"
        );
        Ok(predicted)
    }

    /// Seal the whole pending buffer into a new block and append it.
    ///
    /// The proof is not re-verified here; callers obtain it from the
    /// proof-of-work engine and `previous_hash` from `hash_block(last_block)`.
    pub fn seal(&mut self, proof: u64, previous_hash: String) -> Block {
        let block = Block {
            index: self.next_index(),
            timestamp: unix_now(),
            transactions: std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        };
        tracing::info!(
            index = block.index,
            transactions = block.transactions.len(),
            proof,
            "New block forged"
        );
        self.chain.push(block.clone());
        block
    }

    /// The tip of the chain.
    pub fn last_block(&self) -> Result<&Block, NeuroError> {
        self.chain.last().ok_or(NeuroError::EmptyChain)
    }

    /// First transaction carrying `model_hash`, scanning oldest block first.
    pub fn find_by_model_hash(&self, model_hash: &str) -> Option<&Transaction> {
        self.chain
            .iter()
            .flat_map(|block| block.transactions.iter())
            .find(|tx| tx.model_hash == model_hash)
    }

    /// Replace the chain with one obtained from conflict resolution.
    ///
    /// Applies the same checks as [`Ledger::from_chain`] and refuses any chain
    /// that is not strictly longer than the current one. Pending transactions
    /// are kept and will be sealed on top of the adopted chain.
    pub fn adopt_chain(&mut self, chain: Vec<Block>) -> Result<(), NeuroError> {
        if chain.len() <= self.chain.len() {
            return Err(NeuroError::Unverifiable(format!(
                "chain of {} block(s) is not longer than the local {}",
                chain.len(),
                self.chain.len()
            )));
        }
        check_adoptable(&chain)?;
        self.last_timestamp = self.last_timestamp.max(latest_timestamp(&chain));
        self.chain = chain;
        Ok(())
    }

    /// All sealed blocks, genesis first.
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Transactions submitted since the last seal.
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Owned copy of the chain in the shape served to peers.
    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot::new(self.chain.clone())
    }

    /// Mutate a sealed block in place. Demonstration of tamper detection only.
    ///
    /// Returns `false` if no block sits at `position`.
    #[cfg(feature = "debug-tamper")]
    pub fn tamper_with(&mut self, position: usize, mutate: impl FnOnce(&mut Block)) -> bool {
        match self.chain.get_mut(position) {
            Some(block) => {
                tracing::warn!(position, "DEBUG: tampering with a sealed block");
                mutate(block);
                true
            }
            None => false,
        }
    }

    fn next_index(&self) -> u64 {
        self.chain.len() as u64 + 1
    }

    fn next_timestamp(&mut self) -> f64 {
        let now = unix_now().max(self.last_timestamp);
        self.last_timestamp = now;
        now
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::genesis()
    }
}

fn check_adoptable(chain: &[Block]) -> Result<(), NeuroError> {
    let first = chain.first().ok_or(NeuroError::EmptyChain)?;
    if !first.is_genesis() {
        return Err(NeuroError::Unverifiable(
            "chain does not start with a genesis block".to_string(),
        ));
    }
    if let Some(fault) = find_fault(chain) {
        return Err(NeuroError::Unverifiable(fault.to_string()));
    }
    Ok(())
}

fn latest_timestamp(chain: &[Block]) -> f64 {
    chain
        .iter()
        .flat_map(|b| std::iter::once(b.timestamp).chain(b.transactions.iter().map(|t| t.timestamp)))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::GENESIS_PROOF;
    use crate::crypto::{digest, hash_block};
    use crate::pow::{solve, valid_proof};
    use crate::validator::is_valid;

    fn mine(ledger: &mut Ledger) -> Block {
        let last = ledger.last_block().unwrap().clone();
        let proof = solve(last.proof);
        ledger.seal(proof, hash_block(&last))
    }

    #[test]
    fn test_genesis_ledger() {
        let ledger = Ledger::genesis();
        assert_eq!(ledger.len(), 1);
        assert!(ledger.pending().is_empty());
        let genesis = ledger.last_block().unwrap();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.previous_hash, "0");
        assert_eq!(genesis.proof, GENESIS_PROOF);
        assert!(genesis.transactions.is_empty());
    }

    #[test]
    fn test_submit_predicts_next_index() {
        let mut ledger = Ledger::genesis();
        let index = ledger.submit("alice", "resnet50", &digest(b"weights")).unwrap();
        assert_eq!(index, 2);
        let index = ledger.submit("bob", "bert", &digest(b"bert weights")).unwrap();
        assert_eq!(index, 2);
        assert_eq!(ledger.pending().len(), 2);
    }

    #[test]
    fn test_submit_rejects_invalid_input() {
        let mut ledger = Ledger::genesis();
        let hash = digest(b"weights");
        assert!(matches!(
            ledger.submit("", "resnet50", &hash),
            Err(NeuroError::InvalidInput(_))
        ));
        assert!(matches!(
            ledger.submit("alice", "   ", &hash),
            Err(NeuroError::InvalidInput(_))
        ));
        assert!(matches!(
            ledger.submit("alice", "resnet50", "not-a-digest"),
            Err(NeuroError::InvalidInput(_))
        ));
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn test_submission_timestamps_non_decreasing() {
        let mut ledger = Ledger::genesis();
        for i in 0..50 {
            ledger
                .submit("alice", "m", &digest(format!("{}", i).as_bytes()))
                .unwrap();
        }
        let stamps: Vec<f64> = ledger.pending().iter().map(|t| t.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_seal_scenario() {
        let mut ledger = Ledger::genesis();
        let genesis = ledger.last_block().unwrap().clone();
        ledger.submit("alice", "resnet50", &digest(b"weights")).unwrap();

        let proof = solve(GENESIS_PROOF);
        let block = ledger.seal(proof, hash_block(&genesis));

        assert_eq!(block.index, 2);
        assert_eq!(block.transactions.len(), 1);
        assert_eq!(block.transactions[0].model_hash, digest(b"weights"));
        assert_eq!(block.previous_hash, hash_block(&genesis));
        assert!(valid_proof(GENESIS_PROOF, block.proof));
        assert!(ledger.pending().is_empty());
        assert_eq!(ledger.last_block().unwrap(), &block);
        assert!(is_valid(ledger.chain()));
    }

    #[test]
    fn test_seal_with_empty_buffer() {
        let mut ledger = Ledger::genesis();
        let block = mine(&mut ledger);
        assert_eq!(block.index, 2);
        assert!(block.transactions.is_empty());
    }

    #[test]
    fn test_find_by_model_hash() {
        let mut ledger = Ledger::genesis();
        ledger.submit("alice", "resnet50", &digest(b"weights")).unwrap();
        ledger.submit("carol", "resnet50-copy", &digest(b"weights")).unwrap();
        mine(&mut ledger);

        let found = ledger.find_by_model_hash(&digest(b"weights")).unwrap();
        assert_eq!(found.author, "alice");
        assert!(ledger.find_by_model_hash(&digest(b"missing")).is_none());
        // Pending transactions are not yet part of the record.
        ledger.submit("dave", "gpt", &digest(b"pending")).unwrap();
        assert!(ledger.find_by_model_hash(&digest(b"pending")).is_none());
    }

    #[test]
    fn test_from_chain_roundtrip() {
        let mut ledger = Ledger::genesis();
        ledger.submit("alice", "resnet50", &digest(b"weights")).unwrap();
        mine(&mut ledger);

        let json = serde_json::to_string(ledger.chain()).unwrap();
        let blocks: Vec<Block> = serde_json::from_str(&json).unwrap();
        for (a, b) in ledger.chain().iter().zip(&blocks) {
            assert_eq!(hash_block(a), hash_block(b));
        }
        let restored = Ledger::from_chain(blocks).unwrap();
        assert_eq!(restored.len(), 2);
        assert!(is_valid(restored.chain()));
    }

    #[test]
    fn test_from_chain_rejects_bad_chains() {
        assert!(matches!(Ledger::from_chain(vec![]), Err(NeuroError::EmptyChain)));

        let mut not_genesis = Block::genesis();
        not_genesis.previous_hash = digest(b"x");
        assert!(matches!(
            Ledger::from_chain(vec![not_genesis]),
            Err(NeuroError::Unverifiable(_))
        ));

        let mut ledger = Ledger::genesis();
        ledger.submit("alice", "resnet50", &digest(b"weights")).unwrap();
        mine(&mut ledger);
        let mut blocks = ledger.chain().to_vec();
        blocks[0].timestamp += 1.0;
        assert!(matches!(
            Ledger::from_chain(blocks),
            Err(NeuroError::Unverifiable(_))
        ));
    }

    #[test]
    fn test_adopt_chain_keeps_pending() {
        let mut local = Ledger::genesis();
        local.submit("alice", "resnet50", &digest(b"weights")).unwrap();

        let mut remote = Ledger::genesis();
        mine(&mut remote);
        mine(&mut remote);

        local.adopt_chain(remote.chain().to_vec()).unwrap();
        assert_eq!(local.len(), 3);
        assert_eq!(local.pending().len(), 1);

        let block = mine(&mut local);
        assert_eq!(block.index, 4);
        assert_eq!(block.transactions.len(), 1);
        assert!(is_valid(local.chain()));
    }

    #[test]
    fn test_adopt_chain_rejects_invalid() {
        let mut local = Ledger::genesis();
        let mut remote = Ledger::genesis();
        mine(&mut remote);
        let mut blocks = remote.chain().to_vec();
        blocks[1].proof += 1;
        blocks.push(blocks[1].clone());
        assert!(local.adopt_chain(blocks).is_err());
        assert_eq!(local.len(), 1);
    }

    #[test]
    fn test_adopt_chain_never_shortens() {
        let mut local = Ledger::genesis();
        mine(&mut local);
        mine(&mut local);
        let before = local.chain().to_vec();

        let mut equal = Ledger::genesis();
        mine(&mut equal);
        mine(&mut equal);

        for candidate in [vec![Block::genesis()], equal.chain().to_vec()] {
            assert!(matches!(
                local.adopt_chain(candidate),
                Err(NeuroError::Unverifiable(_))
            ));
            assert_eq!(local.chain(), before.as_slice());
        }
    }
}
