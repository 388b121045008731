//! The Node IPC transport: the file descriptor Node.js hands a child
//! process via `NODE_CHANNEL_FD` when spawned with an `"ipc"` stdio
//! entry. Only defined on unix, matching Node's own IPC implementation.

use crate::Connection;
use std::io;
use tokio::io::BufReader;

#[derive(thiserror::Error, Debug)]
pub enum NodeIpcError {
    #[error("NODE_CHANNEL_FD is not set")]
    MissingEnvVar,
    #[error("NODE_CHANNEL_FD is not a valid file descriptor: {0}")]
    InvalidFd(String),
    #[error("failed to attach to the Node IPC channel: {0}")]
    Io(#[from] io::Error),
}

/// Opens the Node IPC channel named by `NODE_CHANNEL_FD`.
#[cfg(unix)]
pub fn connection() -> Result<Connection, NodeIpcError> {
    use std::os::fd::FromRawFd;
    use tokio::net::UnixStream;

    let raw = std::env::var("NODE_CHANNEL_FD").map_err(|_| NodeIpcError::MissingEnvVar)?;
    let fd: i32 = raw.parse().map_err(|_| NodeIpcError::InvalidFd(raw))?;

    // SAFETY: Node guarantees this fd is a connected, open Unix domain
    // socket for the lifetime of the child process; ownership transfers
    // to the UnixStream, which closes it on drop.
    let std_stream = unsafe { std::os::unix::net::UnixStream::from_raw_fd(fd) };
    std_stream.set_nonblocking(true)?;
    let stream = UnixStream::from_std(std_stream)?;

    let (read_half, write_half) = stream.into_split();
    Ok(Connection::new(BufReader::new(read_half), write_half))
}

#[cfg(not(unix))]
pub fn connection() -> Result<Connection, NodeIpcError> {
    Err(NodeIpcError::Io(io::Error::new(io::ErrorKind::Unsupported, "Node IPC is only supported on unix")))
}
