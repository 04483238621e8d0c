//! Wallet-facing state
//!
//! - Fail-soft wallet loading
//! - Balance polling
//! - Price polling

mod loader;
mod poller;
mod price;

pub use loader::WalletLoader;
pub use poller::BalancePoller;
pub use price::PricePoller;
