// crates/neurochain-rpc/src/handlers/mod.rs
//
// Handler modules for all RPC endpoints.
// Each module defines request/response types and handler functions
// for a specific API group.

pub mod chain;
#[cfg(feature = "debug-tamper")]
pub mod debug;
pub mod model;
pub mod node;
pub mod transaction;
