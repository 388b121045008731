//! The one shape every transport binding reduces to: a duplex byte stream
//! the dispatcher frames messages over.

use tokio::io::{AsyncBufRead, AsyncWrite};

/// A boxed duplex stream. Each transport binding (stdio, TCP, WebSocket,
/// Node IPC) produces one of these per client connection; the dispatcher
/// only ever sees this type, never the transport it came from.
pub struct Connection {
    pub reader: Box<dyn AsyncBufRead + Unpin + Send>,
    pub writer: Box<dyn AsyncWrite + Unpin + Send>,
}

impl Connection {
    pub fn new(
        reader: impl AsyncBufRead + Unpin + Send + 'static,
        writer: impl AsyncWrite + Unpin + Send + 'static,
    ) -> Self {
        Connection { reader: Box::new(reader), writer: Box::new(writer) }
    }
}
