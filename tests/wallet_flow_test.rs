mod common;

use std::time::Duration;

use common::*;
use serde_json::json;
use sol_wallet::WalletManager;

#[tokio::test]
async fn test_loader_reports_no_wallet_for_unknown_user() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));

    assert!(manager.load_wallet(Some("nobody")).await.is_none());
    assert!(!manager.loader().is_loading());
    Ok(())
}

#[tokio::test]
async fn test_loader_skips_query_without_user_id() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));

    assert!(manager.load_wallet(None).await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_loader_normalizes_string_encoded_secret() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));

    let (keypair, record) = test_wallet("user-1", [13u8; 32]);
    // The store column sometimes holds the byte array wrapped in a JSON
    // string; the loader must normalize both forms
    backend.ledger.insert_wallet_row(json!({
        "user_id": "user-1",
        "email": "user@example.com",
        "public_key": record.public_key,
        "private_key": serde_json::to_string(&record.secret_key)?,
        "created_at": "2024-05-01T00:00:00Z",
    }));

    let loaded = manager.load_wallet(Some("user-1")).await.expect("wallet row");
    assert_eq!(loaded.public_key, keypair.pubkey().to_base58());
    assert_eq!(loaded.secret_key, keypair.to_secret_bytes().to_vec());
    assert_eq!(loaded.email.as_deref(), Some("user@example.com"));
    Ok(())
}

#[tokio::test]
async fn test_loader_takes_first_of_multiple_rows() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));

    let (_k1, first) = test_wallet("user-1", [14u8; 32]);
    let (_k2, second) = test_wallet("user-1", [15u8; 32]);
    for record in [&first, &second] {
        backend.ledger.insert_wallet_row(json!({
            "user_id": record.user_id,
            "public_key": record.public_key,
            "private_key": record.secret_key,
        }));
    }

    let loaded = manager.load_wallet(Some("user-1")).await.expect("wallet row");
    assert_eq!(loaded.public_key, first.public_key);
    Ok(())
}

#[tokio::test]
async fn test_loader_fails_soft_when_store_unreachable() -> anyhow::Result<()> {
    init_logging();
    // Nothing listens here; the loader must swallow the error
    let manager = WalletManager::with_config(test_config("http://127.0.0.1:9"));

    assert!(manager.load_wallet(Some("user-1")).await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_balance_poller_fetches_immediately() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let mut config = test_config(&backend.base_url);
    // A long interval proves the first fetch does not wait for a tick
    config.balance_poll_interval = Duration::from_secs(3600);
    let manager = WalletManager::with_config(config);

    let (_keypair, record) = test_wallet("user-1", [16u8; 32]);
    backend.ledger.set_balance(&record.public_key, 5_000_000_000);

    let poller = manager.watch_balance(&record.public_key);
    assert!(
        wait_for(
            || poller.balance() == Some(5_000_000_000),
            Duration::from_secs(2)
        )
        .await,
        "first fetch should happen immediately"
    );
    assert_eq!(poller.balance_sol(), Some(5.0));
    Ok(())
}

#[tokio::test]
async fn test_balance_poller_clears_on_failure() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));

    let (_keypair, record) = test_wallet("user-1", [17u8; 32]);
    backend.ledger.set_balance(&record.public_key, 1_000_000);

    let poller = manager.watch_balance(&record.public_key);
    assert!(wait_for(|| poller.balance().is_some(), Duration::from_secs(2)).await);

    // A failed fetch clears the value instead of retaining the stale one
    backend.ledger.set_fail_balance(true);
    assert!(
        wait_for(|| poller.balance().is_none(), Duration::from_secs(2)).await,
        "balance should clear after a failed fetch"
    );
    Ok(())
}

#[tokio::test]
async fn test_balance_poller_teardown_stops_fetching() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));

    let (_keypair, record) = test_wallet("user-1", [18u8; 32]);
    backend.ledger.set_balance(&record.public_key, 1_000_000);

    let poller = manager.watch_balance(&record.public_key);
    assert!(wait_for(|| poller.balance().is_some(), Duration::from_secs(2)).await);

    poller.stop();
    assert_eq!(poller.balance(), None, "stop clears the published value");

    let before = backend.ledger.counters().balance_requests;
    tokio::time::sleep(Duration::from_millis(400)).await;
    let after = backend.ledger.counters().balance_requests;
    assert_eq!(before, after, "no fetch may fire after teardown");
    Ok(())
}

#[tokio::test]
async fn test_price_poller_retains_last_value_on_failure() -> anyhow::Result<()> {
    let backend = spawn_backend().await?;
    let manager = WalletManager::with_config(test_config(&backend.base_url));

    let poller = manager.watch_price();
    assert!(wait_for(|| poller.price() == Some(42.0), Duration::from_secs(2)).await);

    // Price is advisory display data; failures keep the last value
    backend.ledger.set_fail_price(true);
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(poller.price(), Some(42.0));
    Ok(())
}
