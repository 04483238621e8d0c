mod common;

use std::time::Duration;

use common::*;
use sol_wallet::solana::lamports_to_sol;
use sol_wallet::{WalletError, WalletManager};

#[tokio::test]
async fn test_send_sol_end_to_end() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));

    let (_sender_keypair, sender) = test_wallet("user-1", [11u8; 32]);
    let (recipient_keypair, _) = test_wallet("user-2", [22u8; 32]);
    backend.ledger.set_balance(&sender.public_key, 2_000_000_000);

    // 2_000_000_000 lamports displays as 2.0 SOL
    assert_eq!(
        lamports_to_sol(backend.ledger.balance(&sender.public_key)),
        2.0
    );

    let recipient = recipient_keypair.pubkey().to_base58();
    let signature = manager.send_sol(&sender, &recipient, 1.0).await?;
    assert!(!signature.is_empty());

    // The mock decoded exactly 1_000_000_000 lamports out of the wire bytes
    assert_eq!(backend.ledger.balance(&recipient), 1_000_000_000);
    assert_eq!(backend.ledger.counters().send_requests, 1);
    Ok(())
}

#[tokio::test]
async fn test_invalid_recipient_makes_no_network_calls() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));
    let (_keypair, sender) = test_wallet("user-1", [1u8; 32]);

    let err = manager
        .send_sol(&sender, "definitely not base58 0OIl", 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidRecipient(_)));
    assert_eq!(backend.ledger.counters().rpc_requests, 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_signing_key_blocks_before_network() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));
    let (recipient_keypair, _) = test_wallet("user-2", [2u8; 32]);
    let recipient = recipient_keypair.pubkey().to_base58();

    let (_keypair, mut sender) = test_wallet("user-1", [1u8; 32]);
    sender.secret_key.clear();
    let err = manager.send_sol(&sender, &recipient, 1.0).await.unwrap_err();
    assert!(matches!(err, WalletError::NoSigningKey));

    // Wrong-length key material is rejected the same way
    sender.secret_key = vec![1u8; 32];
    let err = manager.send_sol(&sender, &recipient, 1.0).await.unwrap_err();
    assert!(matches!(err, WalletError::NoSigningKey));

    assert_eq!(backend.ledger.counters().rpc_requests, 0);
    Ok(())
}

#[tokio::test]
async fn test_insufficient_funds_is_typed() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));

    let (_sender_keypair, sender) = test_wallet("user-1", [3u8; 32]);
    let (recipient_keypair, _) = test_wallet("user-2", [4u8; 32]);
    backend.ledger.set_balance(&sender.public_key, 1_000);

    let err = manager
        .send_sol(&sender, &recipient_keypair.pubkey().to_base58(), 1.0)
        .await
        .unwrap_err();
    match err {
        WalletError::InsufficientFunds(detail) => {
            assert!(detail.contains("insufficient lamports"))
        }
        other => panic!("unexpected error: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_stale_blockhash_maps_to_expired() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));

    let (_sender_keypair, sender) = test_wallet("user-1", [5u8; 32]);
    let (recipient_keypair, _) = test_wallet("user-2", [6u8; 32]);
    backend.ledger.set_balance(&sender.public_key, 2_000_000_000);
    backend.ledger.set_stale_blockhashes(true);

    let err = manager
        .send_sol(&sender, &recipient_keypair.pubkey().to_base58(), 0.5)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::BlockhashExpired));
    Ok(())
}

#[tokio::test]
async fn test_unconfirmed_transfer_expires_at_height_ceiling() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));

    let (_sender_keypair, sender) = test_wallet("user-1", [7u8; 32]);
    let (recipient_keypair, _) = test_wallet("user-2", [8u8; 32]);
    backend.ledger.set_balance(&sender.public_key, 2_000_000_000);
    // Broadcast is accepted but the transaction never confirms
    backend.ledger.set_hold_transactions(true);

    let recipient = recipient_keypair.pubkey().to_base58();
    let ledger = backend.ledger.clone();
    let (result, _) = tokio::join!(manager.send_sol(&sender, &recipient, 0.5), async move {
        // Let the confirmation wait start, then blow past the anchor's
        // valid-height ceiling
        tokio::time::sleep(Duration::from_millis(300)).await;
        ledger.advance_blocks(500);
    });

    assert!(matches!(result.unwrap_err(), WalletError::BlockhashExpired));
    Ok(())
}

#[tokio::test]
async fn test_invalid_amount_rejected() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));

    let (_keypair, sender) = test_wallet("user-1", [9u8; 32]);
    let (recipient_keypair, _) = test_wallet("user-2", [10u8; 32]);
    let recipient = recipient_keypair.pubkey().to_base58();

    for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = manager.send_sol(&sender, &recipient, amount).await.unwrap_err();
        assert!(matches!(err, WalletError::TransferFailed(_)));
    }
    assert_eq!(backend.ledger.counters().rpc_requests, 0);
    Ok(())
}
