use std::sync::Arc;

use crate::config::WalletConfig;
use crate::error::WalletError;
/// Wallet Manager - Orchestration Layer
///
/// Owns the configuration and remote clients and wires the loader, pollers
/// and transfer submission together for the caller.
use crate::solana::rpc::RpcClient;
use crate::solana::transfer;
use crate::store::{WalletRecord, WalletStore};
use crate::wallet::{BalancePoller, PricePoller, WalletLoader};

pub struct WalletManager {
    pub config: WalletConfig,
    rpc: Arc<RpcClient>,
    loader: WalletLoader,
    http: reqwest::Client,
}

impl WalletManager {
    pub fn new() -> Self {
        Self::with_config(WalletConfig::from_env())
    }

    /// Build a manager from an explicit configuration (tests point this at
    /// a mock backend).
    pub fn with_config(config: WalletConfig) -> Self {
        let rpc = Arc::new(RpcClient::new(config.rpc_url.clone(), config.commitment));
        let store = WalletStore::new(config.store_url.clone(), config.store_key.clone());

        Self {
            rpc,
            loader: WalletLoader::new(store),
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn rpc(&self) -> Arc<RpcClient> {
        self.rpc.clone()
    }

    pub fn loader(&self) -> &WalletLoader {
        &self.loader
    }

    /// Fetch the wallet for a user; `None` for no user, no row, or a store
    /// failure (fail-soft, see `WalletLoader`).
    pub async fn load_wallet(&self, user_id: Option<&str>) -> Option<WalletRecord> {
        self.loader.load(user_id).await
    }

    /// Start polling the balance of `address` at the configured interval.
    pub fn watch_balance(&self, address: &str) -> BalancePoller {
        BalancePoller::spawn(
            self.rpc.clone(),
            address.to_string(),
            self.config.balance_poll_interval,
        )
    }

    /// Start polling the SOL/USD price at the configured interval.
    pub fn watch_price(&self) -> PricePoller {
        PricePoller::spawn(
            self.http.clone(),
            self.config.price_api_url.clone(),
            self.config.price_poll_interval,
        )
    }

    /// Submit a SOL transfer from the loaded wallet.
    pub async fn send_sol(
        &self,
        wallet: &WalletRecord,
        recipient: &str,
        amount_sol: f64,
    ) -> Result<String, WalletError> {
        transfer::send_sol(&self.rpc, wallet, recipient, amount_sol).await
    }
}

impl Default for WalletManager {
    fn default() -> Self {
        Self::new()
    }
}
