/// Solana RPC Mock Server Library
///
/// This crate provides both a standalone binary and library components for
/// mocking the backends the wallet client consumes: a Solana JSON-RPC node
/// over an in-memory ledger, and a PostgREST-style wallet row store.
pub mod handlers;
pub mod ledger;
pub mod server;
pub mod types;
pub mod wire;

// Re-export commonly used types
pub use ledger::Ledger;
pub use server::{create_router, run_server, spawn_server};
