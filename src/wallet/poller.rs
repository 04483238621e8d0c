//! Balance polling
//!
//! Keeps an eventually-consistent view of an address's lamport balance:
//! one fetch as soon as the address is known, then one per interval. A
//! failed fetch clears the value rather than retaining a possibly-wrong
//! one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::solana::rpc::RpcClient;

pub struct BalancePoller {
    tx: Arc<watch::Sender<Option<u64>>>,
    rx: watch::Receiver<Option<u64>>,
    handle: JoinHandle<()>,
}

impl BalancePoller {
    /// Spawn a polling task for `address`. The first fetch happens
    /// immediately, not after the first interval tick.
    pub fn spawn(rpc: Arc<RpcClient>, address: String, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);
        let task_tx = tx.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match rpc.get_balance(&address).await {
                    Ok(lamports) => {
                        log::debug!("Balance for {}: {} lamports", address, lamports);
                        let _ = task_tx.send(Some(lamports));
                    }
                    Err(e) => {
                        log::warn!("Failed to fetch balance for {}: {}", address, e);
                        let _ = task_tx.send(None);
                    }
                }
            }
        });

        Self { tx, rx, handle }
    }

    /// Latest known balance in lamports, `None` when unknown.
    pub fn balance(&self) -> Option<u64> {
        *self.rx.borrow()
    }

    /// Latest known balance in display units.
    pub fn balance_sol(&self) -> Option<f64> {
        self.balance().map(crate::solana::lamports_to_sol)
    }

    /// Subscribe to balance updates.
    pub fn subscribe(&self) -> watch::Receiver<Option<u64>> {
        self.rx.clone()
    }

    /// Stop polling and clear the published value. No fetch fires after
    /// this returns.
    pub fn stop(&self) {
        self.handle.abort();
        let _ = self.tx.send(None);
    }
}

impl Drop for BalancePoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
