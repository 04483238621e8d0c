use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("No signing key available")]
    NoSigningKey,

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Transaction expired, please try again")]
    BlockhashExpired,

    #[error("Transaction failed: {0}")]
    TransferFailed(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store rejected request: {0}")]
    Rejected(String),
}
