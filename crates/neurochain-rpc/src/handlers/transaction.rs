// crates/neurochain-rpc/src/handlers/transaction.rs
//
// Transaction handlers: NewTransaction, ListPending.

use serde::{Deserialize, Serialize};

use neurochain_core::block::Transaction;

use crate::service::{LedgerService, SubmitReceipt};

// ---------------------------------------------------------------------------
// transactions/new
// ---------------------------------------------------------------------------

/// Request to register a model.
///
/// The node fingerprints `file_data` itself. Clients holding binary weights
/// send the precomputed `model_hash` instead; `file_data` wins when both are
/// present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransactionRequest {
    /// Author registering the model.
    pub author: String,
    /// Human-readable model name.
    pub model_name: String,
    /// Model file contents (or a stand-in string for simulations).
    #[serde(default)]
    pub file_data: Option<String>,
    /// Lowercase hex SHA-256 of the model file.
    #[serde(default)]
    pub model_hash: Option<String>,
}

/// Response after the attestation is queued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransactionResponse {
    /// Block the attestation is expected to land in. A hint, not a guarantee:
    /// concurrent submissions share the next block and a chain adopted from a
    /// peer shifts the numbering.
    pub index: u64,
    /// SHA-256 fingerprint recorded for the model.
    pub model_hash: String,
    pub message: String,
}

/// Handle a transactions/new request.
pub async fn handle_new_transaction(
    service: &LedgerService,
    request: NewTransactionRequest,
) -> Result<NewTransactionResponse, String> {
    let receipt = match (&request.file_data, &request.model_hash) {
        (Some(data), _) => {
            service
                .submit_model(&request.author, &request.model_name, data.as_bytes())
                .await
        }
        (None, Some(hash)) => service
            .submit_hash(&request.author, &request.model_name, hash)
            .await
            .map(|index| SubmitReceipt {
                index,
                model_hash: hash.clone(),
            }),
        (None, None) => return Err("must provide file_data or model_hash".to_string()),
    }
    .map_err(|e| e.to_string())?;

    tracing::info!(
        "Queued model '{}' by {} (hash={})",
        request.model_name,
        request.author,
        receipt.model_hash
    );

    Ok(NewTransactionResponse {
        index: receipt.index,
        message: format!(
            "Model added to pending block. Expected to be finalized in Block {}",
            receipt.index
        ),
        model_hash: receipt.model_hash,
    })
}

// ---------------------------------------------------------------------------
// chain/pending
// ---------------------------------------------------------------------------

/// Request for the pending-transaction buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPendingRequest {}

/// Response containing the transactions waiting for the next seal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPendingResponse {
    pub transactions: Vec<Transaction>,
    pub count: usize,
}

/// Handle a chain/pending request.
pub async fn handle_list_pending(
    service: &LedgerService,
    _request: ListPendingRequest,
) -> Result<ListPendingResponse, String> {
    let transactions = service.pending().await;
    let count = transactions.len();
    Ok(ListPendingResponse {
        transactions,
        count,
    })
}
