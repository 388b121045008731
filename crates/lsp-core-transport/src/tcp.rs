//! The TCP transport: a listener on `host:port`, one [`Connection`] per
//! accepted client.

use crate::Connection;
use std::io;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tracing::info;

/// Binds a listener. The caller loops on [`accept`] to serve one
/// dispatcher per client.
pub async fn bind(addr: &str) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "tcp transport listening");
    Ok(listener)
}

/// Accepts the next client connection.
pub async fn accept(listener: &TcpListener) -> io::Result<Connection> {
    let (stream, peer) = listener.accept().await?;
    info!(%peer, "tcp client connected");
    Ok(from_stream(stream))
}

fn from_stream(stream: TcpStream) -> Connection {
    let (read_half, write_half) = stream.into_split();
    Connection::new(BufReader::new(read_half), write_half)
}
