/// Axum handlers for the mock backends
///
/// One JSON-RPC dispatch endpoint for the Solana node surface, a
/// PostgREST-style row store under /rest/v1/wallets, and a few /mock
/// helper endpoints for tests.
use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use base64::Engine;
use ed25519_dalek::{Signature, VerifyingKey};
use serde_json::{json, Value};

use crate::ledger::Ledger;
use crate::types::*;
use crate::wire;

/// Shared application state
pub type AppState = Arc<Ledger>;

/// POST /
/// JSON-RPC dispatch for the Solana node surface
pub async fn rpc_handler(
    State(ledger): State<AppState>,
    Json(request): Json<RpcRequest>,
) -> Json<Value> {
    ledger.count_rpc(&request.method);
    log::debug!("RPC {} {}", request.method, request.params);

    let response = match request.method.as_str() {
        "getBalance" => get_balance(&ledger, &request),
        "getLatestBlockhash" => get_latest_blockhash(&ledger, &request),
        "getBlockHeight" => rpc_result(&request.id, json!(ledger.block_height())),
        "sendTransaction" => send_transaction(&ledger, &request),
        "getSignatureStatuses" => get_signature_statuses(&ledger, &request),
        "getTransaction" => get_transaction(&ledger, &request),
        other => rpc_error(&request.id, -32601, format!("Method not found: {}", other)),
    };
    Json(response)
}

fn get_balance(ledger: &Ledger, request: &RpcRequest) -> Value {
    if ledger.fail_balance() {
        return rpc_error(&request.id, -32005, "Node is unhealthy");
    }
    let Some(address) = request.params.get(0).and_then(Value::as_str) else {
        return rpc_error(&request.id, -32602, "getBalance: missing address");
    };
    rpc_result(
        &request.id,
        json!({
            "context": { "slot": ledger.block_height() },
            "value": ledger.balance(address),
        }),
    )
}

fn get_latest_blockhash(ledger: &Ledger, request: &RpcRequest) -> Value {
    let (blockhash, last_valid_block_height) = ledger.latest_blockhash();
    rpc_result(
        &request.id,
        json!({
            "context": { "slot": ledger.block_height() },
            "value": {
                "blockhash": blockhash,
                "lastValidBlockHeight": last_valid_block_height,
            },
        }),
    )
}

fn send_transaction(ledger: &Ledger, request: &RpcRequest) -> Value {
    let Some(encoded) = request.params.get(0).and_then(Value::as_str) else {
        return rpc_error(&request.id, -32602, "sendTransaction: missing transaction");
    };
    let wire_bytes = match base64::engine::general_purpose::STANDARD.decode(encoded) {
        Ok(bytes) => bytes,
        Err(e) => return rpc_error(&request.id, -32602, format!("invalid base64: {}", e)),
    };

    let decoded = match wire::decode_transfer(&wire_bytes) {
        Ok(decoded) => decoded,
        Err(e) => return rpc_error(&request.id, -32602, format!("failed to decode transaction: {}", e)),
    };

    // The fee payer's signature must verify over the message bytes.
    let verified = VerifyingKey::from_bytes(&decoded.from)
        .map(|key| {
            key.verify_strict(&decoded.message, &Signature::from_bytes(&decoded.signature))
                .is_ok()
        })
        .unwrap_or(false);
    if !verified {
        return rpc_error(&request.id, -32003, "Transaction signature verification failure");
    }

    let signature = bs58::encode(decoded.signature).into_string();
    let from = bs58::encode(decoded.from).into_string();
    let to = bs58::encode(decoded.to).into_string();

    if ledger.hold_transactions() {
        log::info!("Holding transfer {} (never confirms)", signature);
        return rpc_result(&request.id, json!(signature));
    }

    match ledger.apply_transfer(&signature, &from, &to, decoded.lamports, &decoded.blockhash) {
        Ok(()) => {
            log::info!("Applied transfer {} lamports {} -> {}", decoded.lamports, from, to);
            rpc_result(&request.id, json!(signature))
        }
        Err(message) => rpc_error(&request.id, -32002, message),
    }
}

fn get_signature_statuses(ledger: &Ledger, request: &RpcRequest) -> Value {
    let signatures = request
        .params
        .get(0)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let statuses: Vec<Value> = signatures
        .iter()
        .map(|sig| {
            sig.as_str()
                .and_then(|s| ledger.transaction(s))
                .map(|tx| {
                    json!({
                        "slot": tx.slot,
                        "confirmations": 1,
                        "err": null,
                        "confirmationStatus": "confirmed",
                    })
                })
                .unwrap_or(Value::Null)
        })
        .collect();
    rpc_result(
        &request.id,
        json!({
            "context": { "slot": ledger.block_height() },
            "value": statuses,
        }),
    )
}

fn get_transaction(ledger: &Ledger, request: &RpcRequest) -> Value {
    let Some(signature) = request.params.get(0).and_then(Value::as_str) else {
        return rpc_error(&request.id, -32602, "getTransaction: missing signature");
    };
    match ledger.transaction(signature) {
        Some(tx) => rpc_result(
            &request.id,
            json!({
                "slot": tx.slot,
                "transaction": { "signatures": [tx.signature] },
                "meta": { "err": null },
            }),
        ),
        None => rpc_result(&request.id, Value::Null),
    }
}

/// GET /rest/v1/wallets?user_id=eq.<id>
/// Returns matching wallet rows as a JSON array
pub async fn get_wallet_rows(
    State(ledger): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let rows = match params.get("user_id").and_then(|f| f.strip_prefix("eq.")) {
        Some(user_id) => ledger.wallet_rows_for_user(user_id),
        None => Vec::new(),
    };
    Json(Value::Array(rows))
}

/// POST /rest/v1/wallets
/// Inserts a wallet row (object) or rows (array)
pub async fn insert_wallet_rows(
    State(ledger): State<AppState>,
    Json(body): Json<Value>,
) -> StatusCode {
    match body {
        Value::Array(rows) => {
            for row in rows {
                ledger.insert_wallet_row(row);
            }
        }
        row => ledger.insert_wallet_row(row),
    }
    StatusCode::CREATED
}

/// GET /mock/price
/// CoinGecko-shaped SOL/USD price response
pub async fn get_price(State(ledger): State<AppState>) -> Result<Json<Value>, StatusCode> {
    if ledger.fail_price() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(Json(json!({ "solana": { "usd": 42.0 } })))
}

/// POST /mock/airdrop
/// Sets an account balance directly
pub async fn airdrop(
    State(ledger): State<AppState>,
    Json(request): Json<AirdropRequest>,
) -> Json<Value> {
    ledger.set_balance(&request.address, request.lamports);
    Json(json!({ "address": request.address, "lamports": request.lamports }))
}

/// POST /mock/advance
/// Advances the block height
pub async fn advance_blocks(
    State(ledger): State<AppState>,
    Json(request): Json<AdvanceRequest>,
) -> Json<Value> {
    let new_height = ledger.advance_blocks(request.blocks);
    Json(json!({ "new_height": new_height }))
}

/// POST /mock/fail
/// Toggles failure injection for balance and price queries
pub async fn set_failures(
    State(ledger): State<AppState>,
    Json(request): Json<FailureRequest>,
) -> StatusCode {
    if let Some(fail) = request.balance {
        ledger.set_fail_balance(fail);
    }
    if let Some(fail) = request.price {
        ledger.set_fail_price(fail);
    }
    StatusCode::NO_CONTENT
}

/// GET /mock/counters
/// Request counters for teardown assertions
pub async fn get_counters(State(ledger): State<AppState>) -> Json<Value> {
    let counters = ledger.counters();
    Json(json!({
        "rpc_requests": counters.rpc_requests,
        "balance_requests": counters.balance_requests,
        "send_requests": counters.send_requests,
    }))
}

/// GET /health
pub async fn health_check() -> &'static str {
    "ok"
}
