//! SOL transfer submission
//!
//! Builds, signs, broadcasts and confirms a native transfer. Every failure
//! is mapped onto the wallet error taxonomy before it reaches the caller;
//! raw transport errors never escape this module.

use std::time::Duration;

use crate::error::WalletError;
use crate::solana::keys::{Keypair, Pubkey};
use crate::solana::rpc::RpcClient;
use crate::solana::sol_to_lamports;
use crate::solana::transaction::TransferMessage;
use crate::store::WalletRecord;

/// How often the confirmation loop polls signature status.
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(400);

/// Delay before the post-confirmation transaction lookup.
const VERIFY_DELAY: Duration = Duration::from_millis(1200);

/// Send `amount_sol` from the loaded wallet to `recipient`.
///
/// Preconditions (signing key present, recipient parses) are checked before
/// any network call. Submission is not idempotent: two identical calls
/// produce two transfers.
pub async fn send_sol(
    rpc: &RpcClient,
    wallet: &WalletRecord,
    recipient: &str,
    amount_sol: f64,
) -> Result<String, WalletError> {
    let keypair = Keypair::from_secret_bytes(&wallet.secret_key)?;
    if !amount_sol.is_finite() || amount_sol <= 0.0 {
        return Err(WalletError::TransferFailed(format!(
            "invalid amount: {}",
            amount_sol
        )));
    }
    let to = Pubkey::parse(recipient)?;
    let from = keypair.pubkey();

    let anchor = rpc.get_latest_blockhash().await.map_err(classify)?;
    let lamports = sol_to_lamports(amount_sol);
    log::info!("Sending {} lamports from {} to {}", lamports, from, to);

    let message = TransferMessage::native_transfer(from, to, lamports, &anchor.blockhash)?;
    let tx = message.sign(&keypair);

    let signature = rpc.send_transaction(&tx.wire).await.map_err(classify)?;
    log::debug!("Broadcast accepted, signature: {}", signature);

    confirm(rpc, &signature, anchor.last_valid_block_height).await?;

    // Brief delay, then check the transaction is queryable, as the client
    // UI does before reporting success.
    tokio::time::sleep(VERIFY_DELAY).await;
    match rpc.get_transaction(&signature).await.map_err(classify)? {
        Some(_) => {
            log::info!("Transfer confirmed: {}", signature);
            Ok(signature)
        }
        None => Err(WalletError::TransferFailed(
            "transaction not found after confirmation".to_string(),
        )),
    }
}

/// Wait until the signature reaches the client's commitment level, bounded
/// by the blockhash expiry height.
async fn confirm(
    rpc: &RpcClient,
    signature: &str,
    last_valid_block_height: u64,
) -> Result<(), WalletError> {
    loop {
        if let Some(status) = rpc.get_signature_status(signature).await.map_err(classify)? {
            if let Some(err) = &status.err {
                return Err(classify(WalletError::Rpc(err.to_string())));
            }
            if matches!(
                status.confirmation_status.as_deref(),
                Some("confirmed") | Some("finalized")
            ) {
                return Ok(());
            }
        }

        let height = rpc.get_block_height().await.map_err(classify)?;
        if height > last_valid_block_height {
            log::warn!(
                "Blockhash expired at height {} waiting for {}",
                height,
                signature
            );
            return Err(WalletError::BlockhashExpired);
        }

        tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
    }
}

/// Map backend failure text onto the user-facing taxonomy.
fn classify(err: WalletError) -> WalletError {
    let WalletError::Rpc(message) = err else {
        return err;
    };
    let lower = message.to_lowercase();
    if lower.contains("insufficient funds") || lower.contains("insufficient lamports") {
        WalletError::InsufficientFunds(message)
    } else if lower.contains("blockhash not found") {
        WalletError::BlockhashExpired
    } else {
        WalletError::TransferFailed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_insufficient_funds() {
        let err = classify(WalletError::Rpc(
            "Transaction simulation failed: Transfer: insufficient lamports 5, need 100".into(),
        ));
        assert!(matches!(err, WalletError::InsufficientFunds(_)));

        let err = classify(WalletError::Rpc("insufficient funds for fee".into()));
        assert!(matches!(err, WalletError::InsufficientFunds(_)));
    }

    #[test]
    fn test_classify_blockhash_expired() {
        let err = classify(WalletError::Rpc("Blockhash not found".into()));
        assert!(matches!(err, WalletError::BlockhashExpired));
    }

    #[test]
    fn test_classify_other_failures_keep_detail() {
        let err = classify(WalletError::Rpc("node is behind by 42 slots".into()));
        match err {
            WalletError::TransferFailed(detail) => assert!(detail.contains("node is behind")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_classify_passes_through_typed_errors() {
        assert!(matches!(
            classify(WalletError::NoSigningKey),
            WalletError::NoSigningKey
        ));
    }
}
