/// JSON-RPC envelope types and response helpers

use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

pub fn rpc_result(id: &Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

pub fn rpc_error(id: &Value, code: i64, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message.into(),
        },
    })
}

#[derive(Debug, Deserialize)]
pub struct AirdropRequest {
    pub address: String,
    pub lamports: u64,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    pub blocks: u64,
}

#[derive(Debug, Deserialize)]
pub struct FailureRequest {
    #[serde(default)]
    pub balance: Option<bool>,
    #[serde(default)]
    pub price: Option<bool>,
}
