/// In-memory ledger backing the mock RPC node
///
/// Holds account balances, issued blockhashes, applied transactions and
/// the wallet store rows, plus request counters so tests can assert how
/// often the client actually hit the network.
use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

/// Flat per-signature fee charged on every applied transfer.
pub const TRANSACTION_FEE: u64 = 5_000;

/// How many blocks an issued blockhash stays valid.
const BLOCKHASH_VALIDITY: u64 = 150;

#[derive(Debug, Clone)]
pub struct TxRecord {
    pub signature: String,
    pub from: String,
    pub to: String,
    pub lamports: u64,
    pub slot: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestCounters {
    pub rpc_requests: u64,
    pub balance_requests: u64,
    pub send_requests: u64,
}

#[derive(Default)]
struct LedgerState {
    balances: HashMap<String, u64>,
    block_height: u64,
    blockhash_counter: u64,
    // blockhash -> last block height at which it is still valid
    valid_blockhashes: HashMap<String, u64>,
    transactions: HashMap<String, TxRecord>,
    wallet_rows: Vec<Value>,
    counters: RequestCounters,
    fail_balance: bool,
    fail_price: bool,
    stale_blockhashes: bool,
    hold_transactions: bool,
}

pub struct Ledger {
    inner: Mutex<LedgerState>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LedgerState {
                block_height: 100,
                ..Default::default()
            }),
        }
    }

    // ---- accounts -------------------------------------------------------

    pub fn set_balance(&self, address: &str, lamports: u64) {
        let mut state = self.inner.lock().unwrap();
        state.balances.insert(address.to_string(), lamports);
    }

    pub fn balance(&self, address: &str) -> u64 {
        let state = self.inner.lock().unwrap();
        state.balances.get(address).copied().unwrap_or(0)
    }

    // ---- blocks ---------------------------------------------------------

    pub fn block_height(&self) -> u64 {
        self.inner.lock().unwrap().block_height
    }

    pub fn advance_blocks(&self, count: u64) -> u64 {
        let mut state = self.inner.lock().unwrap();
        state.block_height += count;
        state.block_height
    }

    /// Issue a fresh deterministic blockhash valid for the next
    /// `BLOCKHASH_VALIDITY` blocks.
    pub fn latest_blockhash(&self) -> (String, u64) {
        let mut state = self.inner.lock().unwrap();
        state.blockhash_counter += 1;
        let mut seed = [0u8; 32];
        seed[..8].copy_from_slice(&state.blockhash_counter.to_le_bytes());
        let blockhash = bs58::encode(seed).into_string();
        let last_valid = if state.stale_blockhashes {
            0
        } else {
            state.block_height + BLOCKHASH_VALIDITY
        };
        state.valid_blockhashes.insert(blockhash.clone(), last_valid);
        (blockhash, last_valid)
    }

    /// Invalidate every issued blockhash, so the next broadcast is
    /// rejected the way a real node rejects a stale anchor.
    pub fn expire_blockhashes(&self) {
        let mut state = self.inner.lock().unwrap();
        for last_valid in state.valid_blockhashes.values_mut() {
            *last_valid = 0;
        }
    }

    // ---- transactions ---------------------------------------------------

    /// Validate and apply a decoded transfer. Error strings mirror the
    /// messages a real node returns.
    pub fn apply_transfer(
        &self,
        signature: &str,
        from: &str,
        to: &str,
        lamports: u64,
        blockhash: &str,
    ) -> Result<(), String> {
        let mut state = self.inner.lock().unwrap();

        match state.valid_blockhashes.get(blockhash) {
            Some(&last_valid) if state.block_height <= last_valid => {}
            _ => return Err("Blockhash not found".to_string()),
        }

        let available = state.balances.get(from).copied().unwrap_or(0);
        let needed = lamports + TRANSACTION_FEE;
        if available < needed {
            return Err(format!(
                "Transaction simulation failed: Transfer: insufficient lamports {}, need {}",
                available, needed
            ));
        }

        state.balances.insert(from.to_string(), available - needed);
        *state.balances.entry(to.to_string()).or_insert(0) += lamports;

        let slot = state.block_height;
        state.block_height += 1;
        state.transactions.insert(
            signature.to_string(),
            TxRecord {
                signature: signature.to_string(),
                from: from.to_string(),
                to: to.to_string(),
                lamports,
                slot,
            },
        );
        Ok(())
    }

    pub fn transaction(&self, signature: &str) -> Option<TxRecord> {
        self.inner.lock().unwrap().transactions.get(signature).cloned()
    }

    // ---- wallet store rows ----------------------------------------------

    pub fn insert_wallet_row(&self, row: Value) {
        self.inner.lock().unwrap().wallet_rows.push(row);
    }

    pub fn wallet_rows_for_user(&self, user_id: &str) -> Vec<Value> {
        let state = self.inner.lock().unwrap();
        state
            .wallet_rows
            .iter()
            .filter(|row| row.get("user_id").and_then(Value::as_str) == Some(user_id))
            .cloned()
            .collect()
    }

    // ---- failure injection & counters -----------------------------------

    pub fn set_fail_balance(&self, fail: bool) {
        self.inner.lock().unwrap().fail_balance = fail;
    }

    pub fn fail_balance(&self) -> bool {
        self.inner.lock().unwrap().fail_balance
    }

    /// When set, issued blockhashes are already expired, so the next
    /// broadcast is rejected the way a real node rejects a stale anchor.
    pub fn set_stale_blockhashes(&self, stale: bool) {
        self.inner.lock().unwrap().stale_blockhashes = stale;
    }

    /// When set, broadcasts are accepted but never applied, leaving the
    /// signature permanently unconfirmed.
    pub fn set_hold_transactions(&self, hold: bool) {
        self.inner.lock().unwrap().hold_transactions = hold;
    }

    pub fn hold_transactions(&self) -> bool {
        self.inner.lock().unwrap().hold_transactions
    }

    pub fn set_fail_price(&self, fail: bool) {
        self.inner.lock().unwrap().fail_price = fail;
    }

    pub fn fail_price(&self) -> bool {
        self.inner.lock().unwrap().fail_price
    }

    pub fn count_rpc(&self, method: &str) {
        let mut state = self.inner.lock().unwrap();
        state.counters.rpc_requests += 1;
        match method {
            "getBalance" => state.counters.balance_requests += 1,
            "sendTransaction" => state.counters.send_requests += 1,
            _ => {}
        }
    }

    pub fn counters(&self) -> RequestCounters {
        self.inner.lock().unwrap().counters
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
