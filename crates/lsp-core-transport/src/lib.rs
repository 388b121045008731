//! Content-Length message framing plus the four transport bindings that
//! turn a concrete I/O channel into the [`Connection`] the dispatcher
//! reads and writes framed JSON-RPC messages over.

mod connection;
pub mod framing;
pub mod node_ipc;
pub mod stdio;
pub mod tcp;
pub mod websocket;

pub use connection::Connection;
pub use framing::{read_message, write_message, write_notification};
