//! JSON-RPC 2.0 message envelopes.
//!
//! Core request, response, and error types exchanged over whichever
//! transport frames them. The dispatcher decodes a [`JsonRpcRequest`] from
//! every inbound frame and encodes a [`JsonRpcResponse`] for every one that
//! carried an `id`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An incoming request or notification. `id` is `None` for notifications.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    pub _jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// An outgoing response. Either `result` or `error` is set, never both.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(result), error: None }
    }

    pub fn error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: None, error: Some(error) }
    }

    pub fn null(id: Option<Value>) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(Value::Null), error: None }
    }
}

/// A server-to-client notification: no `id`, no response expected.
#[derive(Debug, Serialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self { jsonrpc: "2.0".to_string(), method: method.into(), params: Some(params) }
    }
}

/// A JSON-RPC error object.
#[derive(Debug, Serialize, Clone)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    pub fn with_data(code: i32, message: impl Into<String>, data: Value) -> Self {
        Self { code, message: message.into(), data: Some(data) }
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcError {}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn success_response_carries_no_error() {
        let r = JsonRpcResponse::success(Some(Value::from(1)), serde_json::json!({"ok": true}));
        assert!(r.error.is_none());
        assert_eq!(r.result, Some(serde_json::json!({"ok": true})));
    }

    #[test]
    fn error_response_carries_no_result() {
        let r = JsonRpcResponse::error(Some(Value::from(1)), JsonRpcError::new(-32600, "bad"));
        assert!(r.result.is_none());
        assert_eq!(r.error.expect("error").code, -32600);
    }

    #[test]
    fn request_deserializes_from_wire_json() {
        let raw = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "textDocument/hover",
            "params": {"x": 1}
        });
        let req: JsonRpcRequest = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(req.method, "textDocument/hover");
        assert_eq!(req.id, Some(Value::from(7)));
    }

    #[test]
    fn notification_has_no_id_field() {
        let n = JsonRpcNotification::new("textDocument/publishDiagnostics", serde_json::json!({}));
        let encoded = serde_json::to_value(&n).expect("serialize");
        assert!(encoded.get("id").is_none());
    }
}
