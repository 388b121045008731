//! Standard JSON-RPC 2.0 error codes plus the LSP-specific extensions, and
//! builders for the [`JsonRpcError`] values the dispatcher boundary hands
//! back to the client.

use crate::jsonrpc::{JsonRpcError, JsonRpcResponse};
use serde_json::Value;

// JSON-RPC 2.0 standard codes.
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// Reserved server-error range start, per the JSON-RPC 2.0 spec (-32099..-32000).
pub const SERVER_ERROR_START: i32 = -32099;
/// Reserved server-error range end, per the JSON-RPC 2.0 spec (-32099..-32000).
pub const SERVER_ERROR_END: i32 = -32000;

pub const CONNECTION_CLOSED: i32 = -32050;
pub const TRANSPORT_ERROR: i32 = -32051;

// LSP 3.17 codes.
pub const SERVER_CANCELLED: i32 = -32802;
pub const CONTENT_MODIFIED: i32 = -32801;
pub const REQUEST_CANCELLED: i32 = -32800;
pub const REQUEST_FAILED: i32 = -32803;

/// Server not initialized — any request other than `initialize` received
/// before initialization completes.
pub const SERVER_NOT_INITIALIZED: i32 = -32002;

pub fn cancelled_response(id: &Value) -> JsonRpcResponse {
    JsonRpcResponse::error(Some(id.clone()), request_cancelled_error())
}

pub fn request_cancelled_error() -> JsonRpcError {
    JsonRpcError::new(REQUEST_CANCELLED, "Request cancelled")
}

pub fn server_cancelled_error() -> JsonRpcError {
    JsonRpcError::new(SERVER_CANCELLED, "Server cancelled the request")
}

pub fn method_not_found(method: &str) -> JsonRpcError {
    JsonRpcError::new(METHOD_NOT_FOUND, format!("Method not found: {method}"))
}

/// The client requested a feature the server never advertised in its
/// `initialize` response.
pub fn method_not_advertised() -> JsonRpcError {
    JsonRpcError::new(METHOD_NOT_FOUND, "Method not advertised in server capabilities")
}

pub fn invalid_params(message: impl Into<String>) -> JsonRpcError {
    JsonRpcError::new(INVALID_PARAMS, message.into())
}

pub fn server_not_initialized() -> JsonRpcError {
    JsonRpcError::new(SERVER_NOT_INITIALIZED, "Server not initialized")
}

pub fn internal_error(message: impl Into<String>) -> JsonRpcError {
    JsonRpcError::new(INTERNAL_ERROR, message.into())
}

pub fn connection_closed_error() -> JsonRpcError {
    JsonRpcError::new(CONNECTION_CLOSED, "Connection closed")
}

pub fn transport_error(message: impl Into<String>) -> JsonRpcError {
    JsonRpcError::new(TRANSPORT_ERROR, message.into())
}

/// Extracts `textDocument.uri` from request params.
pub fn req_uri(params: &Value) -> Result<&str, JsonRpcError> {
    params.pointer("/textDocument/uri").and_then(|v| v.as_str()).ok_or_else(|| {
        invalid_params("Missing required parameter: textDocument.uri")
    })
}

/// Extracts `position.{line,character}` from request params.
pub fn req_position(params: &Value) -> Result<(u32, u32), JsonRpcError> {
    let line = u32_field(params, "/position/line", "position.line")?;
    let character = u32_field(params, "/position/character", "position.character")?;
    Ok((line, character))
}

/// Extracts `range.{start,end}.{line,character}` from request params.
pub fn req_range(params: &Value) -> Result<((u32, u32), (u32, u32)), JsonRpcError> {
    let start_line = u32_field(params, "/range/start/line", "range.start.line")?;
    let start_char = u32_field(params, "/range/start/character", "range.start.character")?;
    let end_line = u32_field(params, "/range/end/line", "range.end.line")?;
    let end_char = u32_field(params, "/range/end/character", "range.end.character")?;
    Ok(((start_line, start_char), (end_line, end_char)))
}

fn u32_field(params: &Value, pointer: &str, name: &str) -> Result<u32, JsonRpcError> {
    let raw = params
        .pointer(pointer)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| invalid_params(format!("Missing required parameter: {name}")))?;
    u32::try_from(raw).map_err(|_| invalid_params(format!("{name} exceeds u32::MAX")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn req_uri_extracts_nested_field() {
        let params = serde_json::json!({"textDocument": {"uri": "file:///a.txt"}});
        assert_eq!(req_uri(&params).expect("uri"), "file:///a.txt");
    }

    #[test]
    fn req_uri_missing_is_invalid_params() {
        let params = serde_json::json!({});
        assert_eq!(req_uri(&params).unwrap_err().code, INVALID_PARAMS);
    }

    #[test]
    fn req_position_extracts_line_and_character() {
        let params = serde_json::json!({"position": {"line": 3, "character": 9}});
        assert_eq!(req_position(&params).expect("position"), (3, 9));
    }

    #[test]
    fn req_range_extracts_all_four_fields() {
        let params = serde_json::json!({
            "range": {"start": {"line": 1, "character": 2}, "end": {"line": 3, "character": 4}}
        });
        assert_eq!(req_range(&params).expect("range"), ((1, 2), (3, 4)));
    }

    #[test]
    fn cancelled_response_uses_request_cancelled_code() {
        let id = Value::from(5);
        let response = cancelled_response(&id);
        assert_eq!(response.error.expect("error").code, REQUEST_CANCELLED);
    }
}
