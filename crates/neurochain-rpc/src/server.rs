// crates/neurochain-rpc/src/server.rs
//
// RPC server setup: NeuroRpcServer and RpcConfig.
//
// JSON-RPC over tonic: a single unary service accepts JSON-encoded requests
// with a method field, dispatches to the matching handler, and returns
// JSON-encoded responses. HTTP/1 is accepted so plain `curl`/reqwest clients
// can POST to `RPC_PATH`.

use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tonic::transport::Server;
use tonic::Status;

use crate::handlers;
use crate::middleware;
use crate::service::LedgerService;

/// Route served by the JSON-RPC service. tonic routes by
/// `/{NamedService::NAME}/{method}`.
pub const RPC_PATH: &str = "/neurochain.rpc.LedgerService/Call";

// ---------------------------------------------------------------------------
// RpcConfig
// ---------------------------------------------------------------------------

/// Configuration for the RPC server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Host to bind to (e.g., "127.0.0.1" or "0.0.0.0").
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON-RPC Envelope
// ---------------------------------------------------------------------------

/// A JSON-RPC-style request envelope.
/// The client sends a method name and a JSON params payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// The RPC method to invoke (e.g., "transactions/new", "chain/mine").
    pub method: String,
    /// JSON-encoded parameters for the method.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// A JSON-RPC-style response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// The result data (if success).
    pub result: Option<serde_json::Value>,
    /// Error message (if not success).
    pub error: Option<String>,
}

impl JsonRpcResponse {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error),
        }
    }
}

// ---------------------------------------------------------------------------
// NeuroRpcServer
// ---------------------------------------------------------------------------

/// The RPC server for a NeuroChain node.
///
/// Wraps the shared `LedgerService` and exposes it through a tonic-based
/// server with JSON-RPC dispatching.
#[derive(Debug, Clone)]
pub struct NeuroRpcServer {
    config: RpcConfig,
    service: LedgerService,
    /// Configured peer URLs (for the peers endpoint).
    peer_urls: Vec<String>,
}

impl NeuroRpcServer {
    pub fn new(config: RpcConfig, service: LedgerService) -> Self {
        Self {
            config,
            service,
            peer_urls: Vec::new(),
        }
    }

    /// Set peer information for the peers endpoint.
    pub fn with_peer_info(mut self, peer_urls: Vec<String>) -> Self {
        self.peer_urls = peer_urls;
        self
    }

    /// Start the RPC server and listen for requests.
    ///
    /// This binds to the configured address and serves requests until
    /// the process is terminated.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("{}:{}", self.config.host, self.config.port).parse()?;

        tracing::info!("NeuroChain RPC server starting on {}", addr);

        let dispatcher = Dispatcher {
            service: self.service.clone(),
            peer_urls: self.peer_urls.clone(),
        };

        Server::builder()
            .accept_http1(true)
            .add_service(tonic::service::interceptor::InterceptedService::new(
                NeuroJsonRpcServer::new(dispatcher),
                middleware::logging_interceptor,
            ))
            .serve(addr)
            .await?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Holds the shared service and routes JSON-RPC calls to handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    service: LedgerService,
    peer_urls: Vec<String>,
}

impl Dispatcher {
    pub fn new(service: LedgerService, peer_urls: Vec<String>) -> Self {
        Self { service, peer_urls }
    }

    /// Dispatch a JSON-RPC request to the appropriate handler based on the method name.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let service = &self.service;
        let params = request.params;

        let result = match request.method.as_str() {
            // Transactions
            "transactions/new" => {
                dispatch_handler(params, |r| {
                    handlers::transaction::handle_new_transaction(service, r)
                })
                .await
            }
            "chain/pending" => {
                dispatch_handler(params, |r| {
                    handlers::transaction::handle_list_pending(service, r)
                })
                .await
            }

            // Chain
            "chain/mine" => {
                dispatch_handler(params, |r| handlers::chain::handle_mine(service, r)).await
            }
            "chain/get" => {
                dispatch_handler(params, |r| handlers::chain::handle_get_chain(service, r)).await
            }
            "chain/validate" => {
                dispatch_handler(params, |r| handlers::chain::handle_validate(service, r)).await
            }
            "chain/resolve" => {
                dispatch_handler(params, |r| handlers::chain::handle_resolve(service, r)).await
            }

            // Provenance
            "model/verify" => {
                dispatch_handler(params, |r| handlers::model::handle_verify_model(service, r))
                    .await
            }

            // Node
            "node/health" => {
                dispatch_handler(params, |r| handlers::node::handle_get_health(service, r)).await
            }
            "node/peers" => {
                let peer_urls = &self.peer_urls;
                dispatch_handler(params, |r| handlers::node::handle_get_peers(r, peer_urls))
                    .await
            }

            #[cfg(feature = "debug-tamper")]
            "debug/corrupt" => {
                dispatch_handler(params, |r| handlers::debug::handle_corrupt(service, r)).await
            }

            _ => Err(format!("Unknown method: {}", request.method)),
        };

        match result {
            Ok(value) => JsonRpcResponse {
                success: true,
                result: Some(value),
                error: None,
            },
            Err(err) => {
                tracing::debug!("RPC {} failed: {}", request.method, err);
                JsonRpcResponse::failure(err)
            }
        }
    }
}

/// Generic dispatch helper: deserialize params into a request type,
/// call the handler, and serialize the result to JSON.
///
/// A missing or `null` params value is treated as `{}`.
async fn dispatch_handler<Req, Resp, F, Fut>(
    params: serde_json::Value,
    handler: F,
) -> Result<serde_json::Value, String>
where
    Req: serde::de::DeserializeOwned,
    Resp: serde::Serialize,
    F: FnOnce(Req) -> Fut,
    Fut: std::future::Future<Output = Result<Resp, String>>,
{
    let params = if params.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        params
    };
    let request: Req = serde_json::from_value(params)
        .map_err(|e| format!("Failed to deserialize request: {}", e))?;
    let response = handler(request).await?;
    serde_json::to_value(response).map_err(|e| format!("Failed to serialize response: {}", e))
}

// ---------------------------------------------------------------------------
// Tonic Service Wiring
// ---------------------------------------------------------------------------
// One service with one method, `Call`. Request and response bodies are raw
// JSON bytes (JsonRpcRequest/JsonRpcResponse); no proto codegen.

/// The tonic service wrapper. Accepts bytes, deserializes them as JSON-RPC,
/// and dispatches.
#[derive(Debug, Clone)]
pub struct NeuroJsonRpcServer {
    inner: Dispatcher,
}

impl NeuroJsonRpcServer {
    fn new(inner: Dispatcher) -> Self {
        Self { inner }
    }
}

impl tonic::server::NamedService for NeuroJsonRpcServer {
    const NAME: &'static str = "neurochain.rpc.LedgerService";
}

impl<B> tower_service::Service<http::Request<B>> for NeuroJsonRpcServer
where
    B: HttpBody + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
    B::Data: Send,
{
    type Response = http::Response<tonic::body::BoxBody>;
    type Error = std::convert::Infallible;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let inner = self.inner.clone();

        Box::pin(async move {
            let body_bytes = match collect_body(req.into_body()).await {
                Ok(b) => b,
                Err(e) => {
                    tracing::error!("Failed to read request body: {}", e);
                    let resp =
                        JsonRpcResponse::failure(format!("Failed to read request body: {}", e));
                    return Ok(build_response(serde_json::to_vec(&resp).unwrap_or_default()));
                }
            };

            let rpc_request: JsonRpcRequest = match serde_json::from_slice(&body_bytes) {
                Ok(r) => r,
                Err(e) => {
                    let resp = JsonRpcResponse::failure(format!("Invalid JSON-RPC request: {}", e));
                    return Ok(build_response(serde_json::to_vec(&resp).unwrap_or_default()));
                }
            };

            let rpc_response = inner.dispatch(rpc_request).await;
            let json = serde_json::to_vec(&rpc_response).unwrap_or_default();
            Ok(build_response(json))
        })
    }
}

/// Collect the body of an HTTP request into bytes.
async fn collect_body<B>(body: B) -> Result<Vec<u8>, String>
where
    B: HttpBody + Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    B::Data: Send,
{
    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    loop {
        match std::future::poll_fn(|cx| HttpBody::poll_frame(body.as_mut(), cx)).await {
            Some(Ok(frame)) => {
                if let Ok(data) = frame.into_data() {
                    use bytes::Buf;
                    collected.extend_from_slice(data.chunk());
                }
            }
            Some(Err(e)) => return Err(e.into().to_string()),
            None => break,
        }
    }

    Ok(collected)
}

fn boxed_body(json: Vec<u8>) -> tonic::body::BoxBody {
    tonic::body::BoxBody::new(
        http_body_util::Full::new(bytes::Bytes::from(json))
            .map_err(|e| Status::internal(format!("body error: {}", e))),
    )
}

/// Build an HTTP response with the given JSON body.
fn build_response(json: Vec<u8>) -> http::Response<tonic::body::BoxBody> {
    let mut response = http::Response::new(boxed_body(json));
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}
