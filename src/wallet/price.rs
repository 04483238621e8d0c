//! SOL price polling
//!
//! Fetches the SOL/USD spot price from a CoinGecko-style endpoint. Unlike
//! the balance poller this retains the last price across failed fetches:
//! the price is advisory display data, not spendable state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct PricePoller {
    tx: Arc<watch::Sender<Option<f64>>>,
    rx: watch::Receiver<Option<f64>>,
    handle: JoinHandle<()>,
}

impl PricePoller {
    pub fn spawn(http: reqwest::Client, api_url: String, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);
        let task_tx = tx.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match fetch_price(&http, &api_url).await {
                    Ok(Some(price)) => {
                        log::debug!("SOL price: {} USD", price);
                        let _ = task_tx.send(Some(price));
                    }
                    Ok(None) => {
                        log::warn!("Price endpoint returned no solana/usd entry");
                    }
                    Err(e) => {
                        log::warn!("Failed to fetch SOL price: {}", e);
                    }
                }
            }
        });

        Self { tx, rx, handle }
    }

    /// Latest known SOL/USD price.
    pub fn price(&self) -> Option<f64> {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<f64>> {
        self.rx.clone()
    }

    pub fn stop(&self) {
        self.handle.abort();
        let _ = self.tx.send(None);
    }
}

impl Drop for PricePoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn fetch_price(
    http: &reqwest::Client,
    api_url: &str,
) -> Result<Option<f64>, reqwest::Error> {
    let value: serde_json::Value = http.get(api_url).send().await?.json().await?;
    Ok(value
        .get("solana")
        .and_then(|v| v.get("usd"))
        .and_then(serde_json::Value::as_f64))
}
