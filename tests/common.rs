/// Common test utilities for wallet integration tests
///
/// Spins up the mock backend (Solana JSON-RPC node + wallet row store) on
/// an ephemeral port and builds a WalletConfig pointing at it.
use std::sync::Arc;
use std::time::{Duration, Instant};

use rpc_mock::{spawn_server, Ledger};
use sol_wallet::config::{Cluster, WalletConfig};
use sol_wallet::solana::keys::Keypair;
use sol_wallet::solana::rpc::Commitment;
use sol_wallet::store::WalletRecord;

pub struct TestBackend {
    pub ledger: Arc<Ledger>,
    pub base_url: String,
}

pub async fn spawn_backend() -> anyhow::Result<TestBackend> {
    init_logging();
    let ledger = Arc::new(Ledger::new());
    let addr = spawn_server(ledger.clone()).await?;
    Ok(TestBackend {
        ledger,
        base_url: format!("http://{}", addr),
    })
}

pub fn init_logging() {
    env_logger::builder().is_test(true).try_init().ok();
}

/// Configuration pointing every remote surface at the mock backend, with
/// short polling intervals so tests stay fast.
pub fn test_config(base_url: &str) -> WalletConfig {
    WalletConfig {
        cluster: Cluster::Custom,
        rpc_url: base_url.to_string(),
        commitment: Commitment::Confirmed,
        store_url: base_url.to_string(),
        store_key: "test-key".to_string(),
        balance_poll_interval: Duration::from_millis(100),
        price_poll_interval: Duration::from_millis(100),
        price_api_url: format!("{}/mock/price", base_url),
    }
}

/// A deterministic wallet record with a well-formed 64-byte secret.
pub fn test_wallet(user_id: &str, seed: [u8; 32]) -> (Keypair, WalletRecord) {
    let keypair = Keypair::from_seed(seed);
    let record = WalletRecord {
        user_id: user_id.to_string(),
        email: None,
        public_key: keypair.pubkey().to_base58(),
        secret_key: keypair.to_secret_bytes().to_vec(),
        created_at: None,
    };
    (keypair, record)
}

/// Poll `cond` until it holds or `timeout` elapses.
pub async fn wait_for(cond: impl Fn() -> bool, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
