// crates/neurochain-daemon/src/peers.rs
//
// PeerRegistry: configured peer URLs plus a shared HTTP client used to pull
// chain snapshots for conflict resolution.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use neurochain_core::block::ChainSnapshot;
use neurochain_core::error::NeuroError;
use neurochain_core::traits::PeerChainSource;
use neurochain_rpc::{JsonRpcResponse, RPC_PATH};

/// Reachability of a peer node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerState {
    /// The peer's base URL.
    pub url: String,
    /// Whether the last communication attempt succeeded.
    pub alive: bool,
    /// Chain length the peer reported on its last successful fetch.
    pub last_length: Option<usize>,
}

/// Manages the set of known peers and a shared HTTP client.
#[derive(Debug, Clone)]
pub struct PeerRegistry {
    /// Configured peer URLs (from config).
    configured_peers: Vec<String>,
    /// Live peer state, updated on successful/failed communication.
    peer_state: Arc<RwLock<HashMap<String, PeerState>>>,
    /// Shared reqwest client for all outbound HTTP calls.
    client: reqwest::Client,
}

impl PeerRegistry {
    /// Create a new PeerRegistry from config values.
    pub fn new(configured_peers: Vec<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let state_map = configured_peers
            .iter()
            .map(|url| {
                (
                    url.clone(),
                    PeerState {
                        url: url.clone(),
                        alive: false,
                        last_length: None,
                    },
                )
            })
            .collect();

        Self {
            configured_peers,
            peer_state: Arc::new(RwLock::new(state_map)),
            client,
        }
    }

    /// Return the list of configured peer URLs.
    pub fn configured_peer_urls(&self) -> &[String] {
        &self.configured_peers
    }

    /// Return all peer states, ordered by URL.
    pub async fn all_peer_states(&self) -> Vec<PeerState> {
        let state = self.peer_state.read().await;
        let mut peers: Vec<PeerState> = state.values().cloned().collect();
        peers.sort_by(|a, b| a.url.cmp(&b.url));
        peers
    }

    /// Record the outcome of a communication attempt.
    pub async fn mark_peer(&self, url: &str, alive: bool, last_length: Option<usize>) {
        let mut state = self.peer_state.write().await;
        if let Some(peer) = state.get_mut(url) {
            peer.alive = alive;
            if last_length.is_some() {
                peer.last_length = last_length;
            }
        }
    }

    /// Fetch one peer's chain via `chain/get`.
    pub async fn fetch_chain(&self, peer_url: &str) -> Result<ChainSnapshot, NeuroError> {
        let request_body = serde_json::json!({
            "method": "chain/get",
            "params": {}
        });

        let resp = self
            .client
            .post(rpc_endpoint(peer_url))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| NeuroError::Network(format!("HTTP error: {}", e)))?;

        if !resp.status().is_success() {
            return Err(NeuroError::Network(format!(
                "peer returned status {}",
                resp.status()
            )));
        }

        let rpc_resp: JsonRpcResponse = resp
            .json()
            .await
            .map_err(|e| NeuroError::Network(format!("Failed to parse response: {}", e)))?;

        if !rpc_resp.success {
            return Err(NeuroError::Network(
                rpc_resp.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        let result = rpc_resp
            .result
            .ok_or_else(|| NeuroError::Network("No result in response".to_string()))?;
        let snapshot: ChainSnapshot = serde_json::from_value(result)?;
        if !snapshot.is_consistent() {
            return Err(NeuroError::Unverifiable(format!(
                "peer reported length {} for {} block(s)",
                snapshot.length,
                snapshot.chain.len()
            )));
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl PeerChainSource for PeerRegistry {
    async fn fetch_peer_chains(&self) -> Vec<ChainSnapshot> {
        let mut snapshots = Vec::with_capacity(self.configured_peers.len());
        for peer_url in &self.configured_peers {
            match self.fetch_chain(peer_url).await {
                Ok(snapshot) => {
                    tracing::debug!(
                        "Fetched {} block(s) from peer {}",
                        snapshot.length,
                        peer_url
                    );
                    self.mark_peer(peer_url, true, Some(snapshot.length)).await;
                    snapshots.push(snapshot);
                }
                Err(e) => {
                    tracing::debug!("Could not fetch chain from peer {}: {}", peer_url, e);
                    self.mark_peer(peer_url, false, None).await;
                }
            }
        }
        snapshots
    }

    fn peer_count(&self) -> usize {
        self.configured_peers.len()
    }
}

/// Full JSON-RPC URL for a peer base URL.
fn rpc_endpoint(peer_url: &str) -> String {
    format!("{}{}", peer_url.trim_end_matches('/'), RPC_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurochain_core::Ledger;
    use neurochain_rpc::{LedgerService, NeuroRpcServer, RpcConfig};

    fn free_port() -> u16 {
        std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    #[test]
    fn test_rpc_endpoint() {
        assert_eq!(
            rpc_endpoint("http://127.0.0.1:5000/"),
            "http://127.0.0.1:5000/neurochain.rpc.LedgerService/Call"
        );
        assert_eq!(
            rpc_endpoint("http://10.0.0.2:5000"),
            "http://10.0.0.2:5000/neurochain.rpc.LedgerService/Call"
        );
    }

    #[tokio::test]
    async fn test_unreachable_peer_is_skipped_and_marked_dead() {
        let url = format!("http://127.0.0.1:{}", free_port());
        let registry = PeerRegistry::new(vec![url.clone()]);
        assert_eq!(registry.peer_count(), 1);

        let snapshots = registry.fetch_peer_chains().await;
        assert!(snapshots.is_empty());

        let states = registry.all_peer_states().await;
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].url, url);
        assert!(!states[0].alive);
    }

    #[tokio::test]
    async fn test_fetch_chain_from_running_node() {
        let port = free_port();
        let mut ledger = Ledger::genesis();
        ledger
            .submit("bob", "bert", &neurochain_core::digest(b"bert"))
            .unwrap();
        let last = ledger.last_block().unwrap().clone();
        ledger.seal(
            neurochain_core::solve(last.proof),
            neurochain_core::hash_block(&last),
        );
        let expected = ledger.chain().to_vec();

        let server = NeuroRpcServer::new(
            RpcConfig {
                host: "127.0.0.1".to_string(),
                port,
            },
            LedgerService::new(ledger),
        );
        tokio::spawn(async move {
            let _ = server.start().await;
        });

        let url = format!("http://127.0.0.1:{}", port);
        let registry = PeerRegistry::new(vec![url]);

        let mut snapshots = Vec::new();
        for _ in 0..50 {
            snapshots = registry.fetch_peer_chains().await;
            if !snapshots.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].length, 2);
        assert_eq!(snapshots[0].chain, expected);
        let states = registry.all_peer_states().await;
        assert!(states[0].alive);
        assert_eq!(states[0].last_length, Some(2));
    }
}
