/// Wallet configuration from environment variables
///
/// Controls the Solana cluster, RPC endpoint and wallet store credentials.
/// Defaults to Devnet, matching the mobile client.
use std::env;
use std::time::Duration;

use crate::solana::rpc::Commitment;

/// Default SOL/USD spot price endpoint (CoinGecko simple price API).
pub const DEFAULT_PRICE_API_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=solana&vs_currencies=usd";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cluster {
    Devnet,
    Testnet,
    MainnetBeta,
    /// RPC URL supplied explicitly (local validator or mock).
    Custom,
}

impl Cluster {
    /// Public RPC endpoint for this cluster
    pub fn api_url(&self) -> &'static str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Custom => "http://localhost:8899",
        }
    }
}

#[derive(Clone, Debug)]
pub struct WalletConfig {
    /// Target Solana cluster
    pub cluster: Cluster,
    /// JSON-RPC endpoint URL
    pub rpc_url: String,
    /// Commitment level for queries and confirmation waits
    pub commitment: Commitment,
    /// Wallet store base URL (PostgREST-style API)
    pub store_url: String,
    /// Wallet store api key
    pub store_key: String,
    /// Balance polling interval
    pub balance_poll_interval: Duration,
    /// Price polling interval
    pub price_poll_interval: Duration,
    /// SOL/USD price endpoint
    pub price_api_url: String,
}

impl WalletConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `SOLANA_CLUSTER`: "devnet" (default), "testnet" or "mainnet-beta"
    /// - `SOLANA_RPC_URL`: RPC endpoint override (switches cluster to Custom)
    /// - `WALLET_STORE_URL`: wallet store base URL
    /// - `WALLET_STORE_KEY`: wallet store api key
    /// - `BALANCE_POLL_SECS`: balance polling interval (default 15)
    /// - `PRICE_POLL_SECS`: price polling interval (default 10)
    /// - `PRICE_API_URL`: SOL/USD price endpoint override
    pub fn from_env() -> Self {
        let cluster_str = env::var("SOLANA_CLUSTER")
            .unwrap_or_else(|_| "devnet".to_string())
            .to_lowercase();

        let cluster = match cluster_str.as_str() {
            "devnet" | "" => {
                log::info!("Using DEVNET cluster");
                Cluster::Devnet
            }
            "testnet" => {
                log::info!("Using TESTNET cluster");
                Cluster::Testnet
            }
            "mainnet-beta" | "mainnet" => {
                log::info!("Using MAINNET-BETA cluster");
                Cluster::MainnetBeta
            }
            other => {
                log::warn!("Unknown cluster '{}', defaulting to Devnet", other);
                Cluster::Devnet
            }
        };

        let (cluster, rpc_url) = match env::var("SOLANA_RPC_URL") {
            Ok(url) if !url.is_empty() => {
                log::info!("RPC URL: {} (explicit override)", url);
                (Cluster::Custom, url)
            }
            _ => {
                let url = cluster.api_url().to_string();
                log::info!("RPC URL: {}", url);
                (cluster, url)
            }
        };

        let store_url =
            env::var("WALLET_STORE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        log::info!("Wallet store URL: {}", store_url);

        let store_key = env::var("WALLET_STORE_KEY").unwrap_or_default();
        if store_key.is_empty() {
            log::warn!("WALLET_STORE_KEY not set; store requests will be unauthenticated");
        }

        let price_api_url =
            env::var("PRICE_API_URL").unwrap_or_else(|_| DEFAULT_PRICE_API_URL.to_string());

        Self {
            cluster,
            rpc_url,
            commitment: Commitment::Confirmed,
            store_url,
            store_key,
            balance_poll_interval: Duration::from_secs(env_secs("BALANCE_POLL_SECS", 15)),
            price_poll_interval: Duration::from_secs(env_secs("PRICE_POLL_SECS", 10)),
            price_api_url,
        }
    }
}

fn env_secs(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for WalletConfig {
    /// Default configuration (Devnet)
    fn default() -> Self {
        Self {
            cluster: Cluster::Devnet,
            rpc_url: Cluster::Devnet.api_url().to_string(),
            commitment: Commitment::Confirmed,
            store_url: "http://localhost:3000".to_string(),
            store_key: String::new(),
            balance_poll_interval: Duration::from_secs(15),
            price_poll_interval: Duration::from_secs(10),
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
        }
    }
}
