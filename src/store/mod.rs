//! Hosted wallet store access
//!
//! - REST client
//! - Row models and secret key normalization

mod client;
mod models;

pub use client::WalletStore;
pub use models::WalletRecord;
