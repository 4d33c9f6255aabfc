// crates/neurochain-cli/src/commands/status.rs
//
// `neurochain status`: display node health and configured peers.

use serde::Serialize;
use serde_json::json;

use neurochain_rpc::handlers::node::{GetHealthResponse, GetPeersResponse};

use crate::output::{format_json, OutputFormat};
use crate::rpc_client;

#[derive(Debug, Serialize)]
struct StatusReport {
    endpoint: String,
    health: GetHealthResponse,
    peers: GetPeersResponse,
}

/// Run the status command.
pub async fn run(rpc: &str, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let health: GetHealthResponse = rpc_client::call(rpc, "node/health", json!({})).await?;
    let peers: GetPeersResponse = rpc_client::call(rpc, "node/peers", json!({})).await?;

    let report = StatusReport {
        endpoint: rpc_client::endpoint_url(rpc),
        health,
        peers,
    };

    match format {
        OutputFormat::Json => println!("{}", format_json(&report)),
        OutputFormat::Table => {
            println!("NeuroChain v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Node Status");
            println!("-----------");
            println!("  RPC endpoint: {}", report.endpoint);
            println!("  Status:       {}", report.health.status);
            println!("  Chain length: {}", report.health.chain_length);
            println!("  Pending:      {}", report.health.pending);
            println!("  Uptime:       {}s", report.health.uptime_seconds);
            println!("  Peers:        {}", report.peers.count);
            for peer in &report.peers.peers {
                println!("    - {}", peer.url);
            }
            if let Some(details) = &report.health.details {
                println!();
                println!("{}", details);
            }
        }
    }

    Ok(())
}
