// crates/neurochain-rpc/src/middleware.rs
//
// Middleware for the RPC server: request logging interceptor.

use tonic::{Request, Status};

/// Logging interceptor for incoming RPC requests.
///
/// Logs the request metadata at debug level; every request passes through.
pub fn logging_interceptor(req: Request<()>) -> Result<Request<()>, Status> {
    let user_agent = req
        .metadata()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    tracing::debug!("Incoming RPC request (user-agent={})", user_agent);
    Ok(req)
}
