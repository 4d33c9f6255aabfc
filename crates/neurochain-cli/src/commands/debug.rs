// crates/neurochain-cli/src/commands/debug.rs
//
// `neurochain corrupt`: tamper demonstration. Only works against a daemon
// built with the `debug-tamper` feature.

use serde_json::json;

use crate::rpc_client::{self, RpcError};

#[derive(serde::Deserialize)]
struct CorruptResponse {
    message: String,
}

/// Run the corrupt command.
pub async fn run_corrupt(rpc: &str) -> Result<(), Box<dyn std::error::Error>> {
    match rpc_client::call::<CorruptResponse>(rpc, "debug/corrupt", json!({})).await {
        Ok(resp) => {
            println!("{}", resp.message);
            Ok(())
        }
        Err(RpcError::Remote(msg)) if msg.starts_with("Unknown method") => {
            Err("the daemon was built without the debug-tamper feature".into())
        }
        Err(e) => Err(e.into()),
    }
}
