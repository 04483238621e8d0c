//! Wallet loading
//!
//! Resolves the single wallet row for a user. Store failures are logged
//! and reported as "no wallet": an absent wallet is a normal state for new
//! users and must not interrupt the caller.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::store::{WalletRecord, WalletStore};

pub struct WalletLoader {
    store: WalletStore,
    loading: AtomicBool,
}

impl WalletLoader {
    pub fn new(store: WalletStore) -> Self {
        Self {
            store,
            loading: AtomicBool::new(false),
        }
    }

    /// True while a load is in flight. Callers use this for UI gating.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Fetch the wallet for `user_id`, or `None` when there is no user, no
    /// matching row, or the store is unreachable. Callable repeatedly; each
    /// call re-queries the store.
    pub async fn load(&self, user_id: Option<&str>) -> Option<WalletRecord> {
        let user_id = user_id?;

        self.loading.store(true, Ordering::SeqCst);
        let result = self.store.wallets_for_user(user_id).await;
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(rows) => rows.into_iter().next(),
            Err(e) => {
                log::warn!("Failed to load wallet for user {}: {}", user_id, e);
                None
            }
        }
    }
}
