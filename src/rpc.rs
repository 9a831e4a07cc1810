//! JSON-RPC envelope models.
//!
//! Minimal serde views of the requests and responses the host transport
//! hands to the middleware. Batch responses are a distinct variant so the
//! batch pass-through policy is a type-level fact rather than a runtime
//! shape check.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Call kinds whose payload is encrypted outbound.
///
/// Only `Call` expects a response to decrypt; `EstimateGas` and
/// `SendTransaction` are encrypt-only, tracked solely so a reused
/// transaction object is not encrypted twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Call,
    EstimateGas,
    SendTransaction,
}

/// Closed classification of inbound method names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Carries an encryptable payload (`to` + `data`).
    Encryptable(CallKind),
    /// Meaningless under payload encryption, rejected fast.
    GetStorageAt,
    /// Everything else passes through untouched.
    Other,
}

impl MethodKind {
    pub fn classify(method: &str) -> MethodKind {
        match method {
            "eth_call" => MethodKind::Encryptable(CallKind::Call),
            "eth_estimateGas" => MethodKind::Encryptable(CallKind::EstimateGas),
            "eth_sendTransaction" => MethodKind::Encryptable(CallKind::SendTransaction),
            "eth_getStorageAt" => MethodKind::GetStorageAt,
            _ => MethodKind::Other,
        }
    }
}

/// Outbound request as seen before serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// A single response object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcCallResponse {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// Inbound response after deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcResponse {
    Batch(Vec<JsonRpcCallResponse>),
    Single(JsonRpcCallResponse),
}

/// Normalize a JSON-RPC id to a session key.
///
/// Ids may be numbers or strings while in flight; notifications (null id)
/// have no response to correlate and yield `None`.
pub fn request_key(id: &Value) -> Option<String> {
    match id {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Encode bytes as a `0x`-prefixed hex string.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a hex string, tolerating a `0x` prefix.
pub fn from_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
}
