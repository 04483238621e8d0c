//! Wallet store REST client
//!
//! Talks to the hosted row store (PostgREST-style filters, apikey header).
//! The store owns wallet creation; this client only reads.

use crate::error::StoreError;
use crate::store::models::WalletRecord;

const SELECT_COLUMNS: &str = "user_id,email,public_key,private_key,created_at";

pub struct WalletStore {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl WalletStore {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http: reqwest::Client::new(),
        }
    }

    /// Fetch the wallet rows for a user. Zero rows is a normal outcome.
    pub async fn wallets_for_user(&self, user_id: &str) -> Result<Vec<WalletRecord>, StoreError> {
        let url = format!("{}/rest/v1/wallets", self.base_url);
        let filter = format!("eq.{}", user_id);

        let response = self
            .http
            .get(&url)
            .query(&[("user_id", filter.as_str()), ("select", SELECT_COLUMNS)])
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected(format!("{}: {}", status, body)));
        }

        Ok(response.json().await?)
    }
}
