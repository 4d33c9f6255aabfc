// crates/neurochain-rpc/src/lib.rs
//
// neurochain-rpc: the shared ledger service plus the JSON-RPC server and
// handlers that expose it over HTTP.

pub mod handlers;
pub mod middleware;
pub mod server;
pub mod service;

pub use server::{
    Dispatcher, JsonRpcRequest, JsonRpcResponse, NeuroRpcServer, RpcConfig, RPC_PATH,
};
pub use service::{LedgerService, ResolveOutcome, SubmitReceipt, ValidationReport};
