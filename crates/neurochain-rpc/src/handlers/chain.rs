// crates/neurochain-rpc/src/handlers/chain.rs
//
// Chain handlers: Mine, GetChain, Validate, Resolve.

use serde::{Deserialize, Serialize};

use neurochain_core::block::{Block, Transaction};
use neurochain_core::validator::ChainFault;

use crate::service::LedgerService;

// ---------------------------------------------------------------------------
// chain/mine
// ---------------------------------------------------------------------------

/// Request to mine the next block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineRequest {}

/// Response describing the newly forged block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

/// Handle a chain/mine request.
///
/// Blocks the request until the proof-of-work search finishes or is
/// abandoned because a longer peer chain was adopted.
pub async fn handle_mine(
    service: &LedgerService,
    _request: MineRequest,
) -> Result<MineResponse, String> {
    let block = service.mine().await.map_err(|e| e.to_string())?;
    Ok(MineResponse {
        message: "New Block Forged".to_string(),
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    })
}

// ---------------------------------------------------------------------------
// chain/get
// ---------------------------------------------------------------------------

/// Request for the full chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetChainRequest {}

/// The full chain and its length. Peers deserialize this straight into a
/// `ChainSnapshot` resolution candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Handle a chain/get request.
pub async fn handle_get_chain(
    service: &LedgerService,
    _request: GetChainRequest,
) -> Result<GetChainResponse, String> {
    let snapshot = service.chain_snapshot().await;
    Ok(GetChainResponse {
        chain: snapshot.chain,
        length: snapshot.length,
    })
}

// ---------------------------------------------------------------------------
// chain/validate
// ---------------------------------------------------------------------------

/// Request for a whole-chain integrity check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {}

/// Integrity check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    /// First failing block, if any.
    pub fault: Option<ChainFault>,
    /// Human-readable description of the fault.
    pub message: String,
}

/// Handle a chain/validate request.
pub async fn handle_validate(
    service: &LedgerService,
    _request: ValidateRequest,
) -> Result<ValidateResponse, String> {
    let report = service.validate().await;
    let message = match &report.fault {
        None => format!("Chain of {} block(s) is valid", report.length),
        Some(fault) => format!("Chain is invalid: {}", fault),
    };
    Ok(ValidateResponse {
        valid: report.valid,
        length: report.length,
        fault: report.fault,
        message,
    })
}

// ---------------------------------------------------------------------------
// chain/resolve
// ---------------------------------------------------------------------------

/// Request to run conflict resolution against the configured peers now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {}

/// Resolution result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub replaced: bool,
    pub length: usize,
    pub candidates: usize,
    pub rejected: usize,
    pub message: String,
}

/// Handle a chain/resolve request.
pub async fn handle_resolve(
    service: &LedgerService,
    _request: ResolveRequest,
) -> Result<ResolveResponse, String> {
    let outcome = service.resolve_with_peers().await;
    let message = if outcome.replaced {
        "Our chain was replaced".to_string()
    } else if service.peer_count() == 0 {
        "No peers configured; our chain is authoritative".to_string()
    } else {
        "Our chain is authoritative".to_string()
    };
    Ok(ResolveResponse {
        replaced: outcome.replaced,
        length: outcome.length,
        candidates: outcome.candidates,
        rejected: outcome.rejected,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurochain_core::{hash_block, is_valid, Ledger};

    #[tokio::test]
    async fn test_mine_then_get_chain() {
        let service = LedgerService::new(Ledger::genesis());
        service
            .submit_model("alice", "resnet50", b"weights")
            .await
            .unwrap();

        let mined = handle_mine(&service, MineRequest {}).await.unwrap();
        assert_eq!(mined.message, "New Block Forged");
        assert_eq!(mined.index, 2);
        assert_eq!(mined.transactions.len(), 1);

        let chain = handle_get_chain(&service, GetChainRequest {}).await.unwrap();
        assert_eq!(chain.length, 2);
        assert_eq!(chain.chain[1].previous_hash, hash_block(&chain.chain[0]));
        assert!(is_valid(&chain.chain));
    }

    #[tokio::test]
    async fn test_validate_reports_valid_chain() {
        let service = LedgerService::new(Ledger::genesis());
        let resp = handle_validate(&service, ValidateRequest {}).await.unwrap();
        assert!(resp.valid);
        assert!(resp.fault.is_none());
        assert_eq!(resp.length, 1);
    }

    #[tokio::test]
    async fn test_resolve_without_peers() {
        let service = LedgerService::new(Ledger::genesis());
        let resp = handle_resolve(&service, ResolveRequest {}).await.unwrap();
        assert!(!resp.replaced);
        assert_eq!(resp.length, 1);
        assert!(resp.message.contains("No peers"));
    }

    #[test]
    fn test_get_chain_response_is_a_snapshot() {
        let ledger = Ledger::genesis();
        let resp = GetChainResponse {
            chain: ledger.chain().to_vec(),
            length: ledger.len(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        let snapshot: neurochain_core::ChainSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(snapshot.length, 1);
        assert_eq!(snapshot.chain, ledger.chain());
    }
}
