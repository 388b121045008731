//! Funnels every response and notification through one writer task.
//!
//! A `Connection`'s writer half can't be shared across the many
//! `tokio::spawn`'d handler tasks a dispatcher runs concurrently without
//! its own synchronization, so instead of an `Arc<Mutex<Writer>>` every
//! handler locks around an `.await`, outbound traffic goes through an
//! unbounded channel into a single task that owns the writer and drains
//! it in order.

use lsp_core_protocol::JsonRpcResponse;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;

pub enum Outgoing {
    Response(JsonRpcResponse),
    Notification { method: String, params: serde_json::Value },
}

/// A cheaply-cloneable handle every handler task holds to send responses
/// and notifications back to the client.
#[derive(Clone)]
pub struct OutboundSink {
    tx: mpsc::UnboundedSender<Outgoing>,
}

impl OutboundSink {
    pub fn respond(&self, response: JsonRpcResponse) {
        // The writer task only exits once every sender (including this
        // one) has dropped, so a send error here means the connection is
        // already torn down — nothing left to do with it.
        let _ = self.tx.send(Outgoing::Response(response));
    }

    pub fn notify(&self, method: impl Into<String>, params: serde_json::Value) {
        let _ = self.tx.send(Outgoing::Notification { method: method.into(), params });
    }

    #[cfg(test)]
    pub fn for_test(tx: mpsc::UnboundedSender<Outgoing>) -> Self {
        OutboundSink { tx }
    }
}

/// Spawns the writer task and returns the [`OutboundSink`] handle to it.
/// The task runs until every `OutboundSink` clone is dropped and the
/// channel drains.
pub fn spawn_writer<W>(mut writer: W) -> OutboundSink
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Outgoing>();

    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let result = match msg {
                Outgoing::Response(response) => lsp_core_transport::write_message(&mut writer, &response).await,
                Outgoing::Notification { method, params } => {
                    lsp_core_transport::write_notification(&mut writer, &method, params).await
                }
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, "failed to write outbound message, closing writer task");
                break;
            }
        }
    });

    OutboundSink { tx }
}
