// crates/neurochain-cli/src/commands/mod.rs
//
// Command module declarations for the NeuroChain CLI.

pub mod chain;
pub mod debug;
pub mod model;
pub mod status;
