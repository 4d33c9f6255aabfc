// crates/neurochain-rpc/src/handlers/debug.rs
//
// Tamper demonstration: Corrupt. Only compiled with the `debug-tamper` feature.

use serde::{Deserialize, Serialize};

use crate::service::LedgerService;

/// Request to corrupt the first mined block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorruptRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorruptResponse {
    pub message: String,
}

/// Handle a debug/corrupt request.
///
/// Rewrites the author of the first transaction in block 2 so that
/// `chain/validate` reports the broken link afterwards.
pub async fn handle_corrupt(
    service: &LedgerService,
    _request: CorruptRequest,
) -> Result<CorruptResponse, String> {
    if !service.corrupt_first_mined_block().await {
        return Err("Not enough blocks to corrupt. Mine a block with a transaction first.".to_string());
    }
    tracing::warn!("Block 2 was tampered with via debug/corrupt");
    Ok(CorruptResponse {
        message: "Block 2 has been tampered with! Run chain/validate to detect it.".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurochain_core::Ledger;

    #[tokio::test]
    async fn test_corrupt_breaks_validation() {
        let service = LedgerService::new(Ledger::genesis());
        assert!(handle_corrupt(&service, CorruptRequest {}).await.is_err());

        service
            .submit_model("alice", "resnet50", b"weights")
            .await
            .unwrap();
        service.mine().await.unwrap();
        service.mine().await.unwrap();
        assert!(service.validate().await.valid);

        handle_corrupt(&service, CorruptRequest {}).await.unwrap();
        let report = service.validate().await;
        assert!(!report.valid);
        assert_eq!(report.fault.unwrap().block_index, 3);
    }
}
