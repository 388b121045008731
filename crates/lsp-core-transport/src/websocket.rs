//! The WebSocket transport: an upgrade on an HTTP path, bridged to a
//! plain byte-stream [`Connection`] so the dispatcher never has to know
//! it's talking over message frames instead of a raw socket.
//!
//! `tokio-tungstenite` gives a message-oriented `Sink`/`Stream`, not an
//! `AsyncRead`/`AsyncWrite` pair. Rather than hand-roll a `poll_read`
//! that has to reassemble partial messages, two small bridge tasks pump
//! bytes through a pair of `tokio::io::duplex` pipes: one forwards
//! inbound WebSocket frames into a pipe the dispatcher reads from, the
//! other forwards a pipe the dispatcher writes to out as outbound binary
//! frames.

use crate::Connection;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

#[derive(thiserror::Error, Debug)]
pub enum WebSocketTransportError {
    #[error("websocket handshake failed: {0}")]
    Handshake(#[from] tokio_tungstenite::tungstenite::Error),
}

const BRIDGE_BUFFER: usize = 64 * 1024;

/// Completes the WebSocket upgrade on `stream` and returns a byte-stream
/// [`Connection`] bridged to it.
pub async fn accept<S>(stream: S) -> Result<Connection, WebSocketTransportError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sink, mut ws_source) = ws.split();

    // `inbound` carries bytes from the websocket to the dispatcher;
    // `outbound` carries bytes from the dispatcher to the websocket.
    // Each `tokio::io::duplex` pipe end implements both AsyncRead and
    // AsyncWrite, but each bridge task only uses the direction it needs.
    let (inbound_feed, inbound_tap) = tokio::io::duplex(BRIDGE_BUFFER);
    let (outbound_tap, outbound_feed) = tokio::io::duplex(BRIDGE_BUFFER);

    tokio::spawn(async move {
        let mut sink = inbound_feed;
        while let Some(msg) = ws_source.next().await {
            let data = match msg {
                Ok(Message::Binary(data)) => data.to_vec(),
                Ok(Message::Text(data)) => data.as_bytes().to_vec(),
                Ok(Message::Close(_)) => {
                    debug!("websocket client closed the connection");
                    break;
                }
                Ok(_) => continue,
                Err(e) => {
                    warn!(error = %e, "websocket read error, closing bridge");
                    break;
                }
            };
            if sink.write_all(&data).await.is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        let mut source = outbound_tap;
        let mut buf = vec![0u8; BRIDGE_BUFFER];
        loop {
            match source.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    if ws_sink.send(Message::Binary(buf[..n].to_vec().into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "bridge read error, closing websocket");
                    break;
                }
            }
        }
        let _ = ws_sink.close().await;
    });

    Ok(Connection::new(BufReader::new(inbound_tap), outbound_feed))
}
