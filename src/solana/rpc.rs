/// Solana JSON-RPC client
///
/// Thin typed wrapper over the handful of RPC methods the wallet consumes:
/// balance queries, blockhash anchoring, transaction broadcast and
/// confirmation lookups.
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::WalletError;

/// Consistency level for queries and confirmation waits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

/// Blockhash anchor for a transaction, with the height past which the
/// network will reject it.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestBlockhash {
    pub blockhash: String,
    #[serde(rename = "lastValidBlockHeight")]
    pub last_valid_block_height: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignatureStatus {
    pub slot: u64,
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(rename = "confirmationStatus")]
    pub confirmation_status: Option<String>,
}

pub struct RpcClient {
    url: String,
    commitment: Commitment,
    http: reqwest::Client,
}

impl RpcClient {
    pub fn new(url: String, commitment: Commitment) -> Self {
        Self {
            url,
            commitment,
            http: reqwest::Client::new(),
        }
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WalletError::Rpc(format!("{} request failed: {}", method, e)))?;

        let value: Value = response
            .json()
            .await
            .map_err(|e| WalletError::Rpc(format!("{}: invalid response: {}", method, e)))?;

        if let Some(err) = value.get("error") {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown RPC error");
            return Err(WalletError::Rpc(message.to_string()));
        }

        value
            .get("result")
            .cloned()
            .ok_or_else(|| WalletError::Rpc(format!("{}: missing result", method)))
    }

    /// getBalance: lamports held by `address` at the configured commitment
    pub async fn get_balance(&self, address: &str) -> Result<u64, WalletError> {
        let result = self
            .call(
                "getBalance",
                json!([address, {"commitment": self.commitment.as_str()}]),
            )
            .await?;
        result
            .get("value")
            .and_then(Value::as_u64)
            .ok_or_else(|| WalletError::Rpc("getBalance: malformed response".to_string()))
    }

    /// getLatestBlockhash: a fresh anchor and its expiry height
    pub async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, WalletError> {
        let result = self
            .call(
                "getLatestBlockhash",
                json!([{"commitment": self.commitment.as_str()}]),
            )
            .await?;
        serde_json::from_value(result.get("value").cloned().unwrap_or(Value::Null))
            .map_err(|e| WalletError::Rpc(format!("getLatestBlockhash: {}", e)))
    }

    /// getBlockHeight at the configured commitment
    pub async fn get_block_height(&self) -> Result<u64, WalletError> {
        let result = self
            .call(
                "getBlockHeight",
                json!([{"commitment": self.commitment.as_str()}]),
            )
            .await?;
        result
            .as_u64()
            .ok_or_else(|| WalletError::Rpc("getBlockHeight: malformed response".to_string()))
    }

    /// sendTransaction: broadcast signed wire bytes, returns the signature
    pub async fn send_transaction(&self, wire_bytes: &[u8]) -> Result<String, WalletError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(wire_bytes);
        let result = self
            .call(
                "sendTransaction",
                json!([encoded, {
                    "encoding": "base64",
                    "preflightCommitment": self.commitment.as_str(),
                }]),
            )
            .await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WalletError::Rpc("sendTransaction: malformed response".to_string()))
    }

    /// getSignatureStatuses for a single signature; `None` when the network
    /// does not know the transaction yet
    pub async fn get_signature_status(
        &self,
        signature: &str,
    ) -> Result<Option<SignatureStatus>, WalletError> {
        let result = self
            .call(
                "getSignatureStatuses",
                json!([[signature], {"searchTransactionHistory": true}]),
            )
            .await?;
        let entry = result
            .get("value")
            .and_then(|v| v.get(0))
            .cloned()
            .unwrap_or(Value::Null);
        if entry.is_null() {
            return Ok(None);
        }
        serde_json::from_value(entry)
            .map(Some)
            .map_err(|e| WalletError::Rpc(format!("getSignatureStatuses: {}", e)))
    }

    /// getTransaction: confirmed transaction details, `None` if unknown
    pub async fn get_transaction(&self, signature: &str) -> Result<Option<Value>, WalletError> {
        let result = self
            .call(
                "getTransaction",
                json!([signature, {"commitment": self.commitment.as_str()}]),
            )
            .await?;
        Ok(if result.is_null() { None } else { Some(result) })
    }
}
