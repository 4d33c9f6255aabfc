// crates/neurochain-rpc/src/handlers/node.rs
//
// Node health and peer handlers: GetHealth, GetPeers.

use serde::{Deserialize, Serialize};

use crate::service::LedgerService;

// ---------------------------------------------------------------------------
// GetHealth
// ---------------------------------------------------------------------------

/// Request for node health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetHealthRequest {}

/// Response containing node health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetHealthResponse {
    /// "healthy" when the local chain validates, "degraded" otherwise.
    pub status: String,
    pub chain_length: usize,
    /// Transactions waiting for the next seal.
    pub pending: usize,
    /// Number of configured peers (0 if peer networking is disabled).
    pub peer_count: usize,
    /// Seconds since the service was started.
    pub uptime_seconds: u64,
    pub details: Option<String>,
}

/// Handle a GetHealth request.
pub async fn handle_get_health(
    service: &LedgerService,
    _request: GetHealthRequest,
) -> Result<GetHealthResponse, String> {
    let report = service.validate().await;
    let pending = service.pending().await.len();
    let peer_count = service.peer_count();
    let uptime_seconds = (chrono::Utc::now() - service.started_at())
        .num_seconds()
        .max(0) as u64;

    let details = match (&report.fault, peer_count) {
        (Some(fault), _) => format!("Local chain failed validation: {}", fault),
        (None, 0) => "Local-only mode (no peers configured)".to_string(),
        (None, n) => format!("Peer resolution enabled: {} peers configured", n),
    };

    Ok(GetHealthResponse {
        status: if report.valid { "healthy" } else { "degraded" }.to_string(),
        chain_length: report.length,
        pending,
        peer_count,
        uptime_seconds,
        details: Some(details),
    })
}

// ---------------------------------------------------------------------------
// GetPeers
// ---------------------------------------------------------------------------

/// Request for the configured peers list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPeersRequest {}

/// A configured peer replica.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerInfo {
    /// Base URL of the peer's RPC endpoint.
    pub url: String,
}

/// Response containing the list of configured peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPeersResponse {
    pub peers: Vec<PeerInfo>,
    pub count: u32,
}

/// Handle a GetPeers request.
pub async fn handle_get_peers(
    _request: GetPeersRequest,
    peer_urls: &[String],
) -> Result<GetPeersResponse, String> {
    let peers: Vec<PeerInfo> = peer_urls
        .iter()
        .map(|url| PeerInfo { url: url.clone() })
        .collect();
    let count = peers.len() as u32;
    Ok(GetPeersResponse { peers, count })
}
