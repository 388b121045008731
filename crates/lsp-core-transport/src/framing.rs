//! Content-Length message framing, per the LSP Base Protocol.
//!
//! `Content-Length: <n>\r\n\r\n<n bytes of JSON>`, repeated for every
//! frame in either direction. No other headers are emitted or required.

use lsp_core_protocol::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};
use std::collections::HashMap;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

/// Reads one framed message. `Ok(None)` means a clean EOF or a frame that
/// failed to parse as JSON (malformed frames are logged and skipped
/// rather than treated as fatal — a single corrupt message must not bring
/// the connection down). `Err` is reserved for I/O failure on the
/// underlying stream.
pub async fn read_message<R: AsyncBufRead + Unpin>(reader: &mut R) -> io::Result<Option<JsonRpcRequest>> {
    let mut headers = HashMap::new();

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(": ") {
            headers.insert(key.to_string(), value.to_string());
        }
    }

    let Some(length) = headers.get("Content-Length").and_then(|v| v.parse::<usize>().ok()) else {
        warn!("frame missing a valid Content-Length header");
        return Ok(None);
    };

    let mut content = vec![0u8; length];
    tokio::io::AsyncReadExt::read_exact(reader, &mut content).await?;

    match serde_json::from_slice(&content) {
        Ok(request) => Ok(Some(request)),
        Err(e) => {
            warn!(error = %e, "malformed JSON-RPC frame, discarding");
            Ok(None)
        }
    }
}

/// Writes a framed response.
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, response: &JsonRpcResponse) -> io::Result<()> {
    write_framed(writer, &response).await
}

/// Writes a framed server-to-client notification.
pub async fn write_notification<W: AsyncWrite + Unpin>(
    writer: &mut W,
    method: &str,
    params: serde_json::Value,
) -> io::Result<()> {
    write_framed(writer, &JsonRpcNotification::new(method, params)).await
}

async fn write_framed<W: AsyncWrite + Unpin, T: serde::Serialize>(writer: &mut W, value: &T) -> io::Result<()> {
    let content = serde_json::to_string(value)?;
    let frame = format!("Content-Length: {}\r\n\r\n{}", content.len(), content);
    writer.write_all(frame.as_bytes()).await?;
    writer.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn read_message_parses_a_single_frame() {
        let body = serde_json::json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": null}).to_string();
        let frame = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);
        let mut reader = BufReader::new(frame.as_bytes());
        let req = read_message(&mut reader).await.expect("read").expect("some");
        assert_eq!(req.method, "initialize");
    }

    #[tokio::test]
    async fn read_message_returns_none_at_eof() {
        let mut reader = BufReader::new(&b""[..]);
        assert!(read_message(&mut reader).await.expect("read").is_none());
    }

    #[tokio::test]
    async fn read_message_skips_malformed_json_without_erroring() {
        let body = "not json";
        let frame = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);
        let mut reader = BufReader::new(frame.as_bytes());
        assert!(read_message(&mut reader).await.expect("read").is_none());
    }

    #[tokio::test]
    async fn write_message_emits_content_length_header() {
        let mut buf = Vec::new();
        let response = JsonRpcResponse::null(Some(serde_json::Value::from(1)));
        write_message(&mut buf, &response).await.expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("Content-Length: "));
        assert!(text.contains("\r\n\r\n"));
    }

    #[tokio::test]
    async fn round_trip_through_framing() {
        let mut buf = Vec::new();
        write_notification(&mut buf, "textDocument/publishDiagnostics", serde_json::json!({"uri": "file:///a"}))
            .await
            .expect("write");
        let mut reader = BufReader::new(buf.as_slice());
        let req = read_message(&mut reader).await.expect("read").expect("some");
        assert_eq!(req.method, "textDocument/publishDiagnostics");
    }
}
