// crates/neurochain-cli/src/rpc_client.rs
//
// Lightweight JSON-RPC client that POSTs to the neurochain-daemon HTTP endpoint.

use serde::de::DeserializeOwned;
use thiserror::Error;

use neurochain_rpc::{JsonRpcRequest, JsonRpcResponse, RPC_PATH};

/// Errors surfaced by a CLI RPC call.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("could not reach daemon at {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("daemon returned an error: {0}")]
    Remote(String),

    #[error("unexpected response from daemon: {0}")]
    Decode(String),
}

/// Full JSON-RPC URL for a daemon base URL.
pub fn endpoint_url(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with(RPC_PATH) {
        base.to_string()
    } else {
        format!("{}{}", base, RPC_PATH)
    }
}

/// Send a JSON-RPC call to the daemon and return the parsed response.
pub async fn rpc_call(
    base: &str,
    method: &str,
    params: serde_json::Value,
) -> Result<JsonRpcResponse, RpcError> {
    let endpoint = endpoint_url(base);
    let request = JsonRpcRequest {
        method: method.to_string(),
        params,
    };

    let client = reqwest::Client::new();
    let resp = client
        .post(&endpoint)
        .json(&request)
        .send()
        .await
        .map_err(|source| RpcError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;

    resp.json::<JsonRpcResponse>()
        .await
        .map_err(|e| RpcError::Decode(e.to_string()))
}

/// Call `method` and decode a successful result into `T`.
pub async fn call<T: DeserializeOwned>(
    base: &str,
    method: &str,
    params: serde_json::Value,
) -> Result<T, RpcError> {
    unwrap_result(rpc_call(base, method, params).await?)
}

/// Turn a response envelope into the typed result or a `Remote` error.
pub fn unwrap_result<T: DeserializeOwned>(resp: JsonRpcResponse) -> Result<T, RpcError> {
    if !resp.success {
        return Err(RpcError::Remote(
            resp.error.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    let result = resp
        .result
        .ok_or_else(|| RpcError::Decode("missing result".to_string()))?;
    serde_json::from_value(result).map_err(|e| RpcError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://127.0.0.1:5000"),
            "http://127.0.0.1:5000/neurochain.rpc.LedgerService/Call"
        );
        assert_eq!(
            endpoint_url("http://127.0.0.1:5000/"),
            "http://127.0.0.1:5000/neurochain.rpc.LedgerService/Call"
        );
        assert_eq!(
            endpoint_url("http://127.0.0.1:5000/neurochain.rpc.LedgerService/Call"),
            "http://127.0.0.1:5000/neurochain.rpc.LedgerService/Call"
        );
    }

    #[test]
    fn test_unwrap_result_success() {
        #[derive(serde::Deserialize)]
        struct Count {
            count: usize,
        }
        let resp = JsonRpcResponse {
            success: true,
            result: Some(json!({"count": 3})),
            error: None,
        };
        let count: Count = unwrap_result(resp).unwrap();
        assert_eq!(count.count, 3);
    }

    #[test]
    fn test_unwrap_result_remote_error() {
        let resp = JsonRpcResponse {
            success: false,
            result: None,
            error: Some("Unknown method: x".to_string()),
        };
        let err = unwrap_result::<serde_json::Value>(resp).unwrap_err();
        assert!(matches!(err, RpcError::Remote(ref m) if m.contains("Unknown method")));
    }

    #[test]
    fn test_unwrap_result_missing_result() {
        let resp = JsonRpcResponse {
            success: true,
            result: None,
            error: None,
        };
        assert!(matches!(
            unwrap_result::<serde_json::Value>(resp),
            Err(RpcError::Decode(_))
        ));
    }
}
