// crates/neurochain-rpc/src/handlers/model.rs
//
// Provenance lookup: VerifyModel.

use serde::{Deserialize, Serialize};

use neurochain_core::block::Transaction;
use neurochain_core::error::NeuroError;

use crate::service::LedgerService;

/// Request to check whether a model is registered.
///
/// Either the raw file contents or a precomputed hash may be supplied;
/// `file_data` wins when both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyModelRequest {
    #[serde(default)]
    pub file_data: Option<String>,
    #[serde(default)]
    pub model_hash: Option<String>,
}

/// Lookup result. A miss is a normal answer, not an RPC error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyModelResponse {
    /// "Verified" or "Not Found".
    pub status: String,
    pub message: String,
    /// The registering transaction when found.
    pub details: Option<Transaction>,
}

/// Handle a model/verify request.
pub async fn handle_verify_model(
    service: &LedgerService,
    request: VerifyModelRequest,
) -> Result<VerifyModelResponse, String> {
    let lookup = match (request.file_data, request.model_hash) {
        (Some(data), _) => service.verify_model(data.as_bytes()).await,
        (None, Some(hash)) => service.verify_model_hash(&hash).await,
        (None, None) => return Err("must provide file_data or model_hash".to_string()),
    };

    match lookup {
        Ok(tx) => Ok(VerifyModelResponse {
            status: "Verified".to_string(),
            message: "This model is authentic and registered.".to_string(),
            details: Some(tx),
        }),
        Err(NeuroError::NotFound(_)) => Ok(VerifyModelResponse {
            status: "Not Found".to_string(),
            message: "This model hash does not exist in the registry.".to_string(),
            details: None,
        }),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurochain_core::{digest, Ledger};

    #[tokio::test]
    async fn test_verify_found_and_missing() {
        let service = LedgerService::new(Ledger::genesis());
        service
            .submit_model("alice", "resnet50", b"weights")
            .await
            .unwrap();
        service.mine().await.unwrap();

        let hit = handle_verify_model(
            &service,
            VerifyModelRequest {
                file_data: Some("weights".to_string()),
                model_hash: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(hit.status, "Verified");
        assert_eq!(hit.details.unwrap().author, "alice");

        let by_hash = handle_verify_model(
            &service,
            VerifyModelRequest {
                file_data: None,
                model_hash: Some(digest(b"weights")),
            },
        )
        .await
        .unwrap();
        assert_eq!(by_hash.status, "Verified");

        let miss = handle_verify_model(
            &service,
            VerifyModelRequest {
                file_data: Some("unknown".to_string()),
                model_hash: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(miss.status, "Not Found");
        assert!(miss.details.is_none());
    }

    #[tokio::test]
    async fn test_verify_requires_input() {
        let service = LedgerService::new(Ledger::genesis());
        let err = handle_verify_model(
            &service,
            VerifyModelRequest {
                file_data: None,
                model_hash: None,
            },
        )
        .await
        .unwrap_err();
        assert!(err.contains("file_data"));
    }
}
