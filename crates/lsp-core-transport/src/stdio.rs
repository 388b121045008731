//! The stdio transport: read requests from stdin, write responses to
//! stdout. The default binding for an editor that spawns the server as a
//! child process and talks to it over its inherited pipes.

use crate::Connection;
use tokio::io::BufReader;

/// A single [`Connection`] over the process's own stdin/stdout. Only one
/// stdio connection can ever exist per process.
pub fn connection() -> Connection {
    Connection::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
}
