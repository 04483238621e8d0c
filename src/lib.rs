/// Solana Wallet Client Core
///
/// This crate provides the non-UI core of a mobile Solana wallet:
/// - Wallet loading from a hosted row store
/// - Balance polling against a Solana JSON-RPC endpoint
/// - Native SOL transfer construction, signing, broadcast and confirmation
pub mod config;
pub mod error;
pub mod manager;
pub mod solana;
pub mod store;
pub mod wallet;

// Re-export commonly used types
pub use config::WalletConfig;
pub use error::{StoreError, WalletError};
pub use manager::WalletManager;
pub use store::WalletRecord;
