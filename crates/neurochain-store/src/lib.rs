// crates/neurochain-store/src/lib.rs
//
// neurochain-store: Persistence for NeuroChain.
//
// Provides a JSON-file-backed `ChainStore` that keeps the whole chain in one
// document (the same block shape served to peers), and an in-memory store
// for tests and ephemeral nodes.

pub mod json_file;
pub mod memory;

// Re-export key types for ergonomic access from downstream crates.
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
