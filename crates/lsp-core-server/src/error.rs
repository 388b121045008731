//! The dispatcher's own error kinds, kept distinct from
//! [`lsp_core_protocol::JsonRpcError`] until the very edge of the
//! dispatcher — handlers return a [`DispatchError`], and only
//! [`handle_request`](crate::dispatcher::Dispatcher)/
//! [`handle_notification`](crate::dispatcher::Dispatcher) convert it to
//! wire shape via [`From`].

use lsp_core_protocol::{invalid_params, JsonRpcError};

#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    /// A request named a URI with no backing `File` — never opened, or
    /// already closed.
    #[error("file not opened")]
    FileNotOpened,
    /// `didChange` arrived with whole-document content but this server
    /// only ever advertises incremental sync.
    #[error("configuration issue: whole-document didChange requires incremental sync")]
    ConfigIssue,
    /// A malformed or missing request parameter.
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error(transparent)]
    Registry(#[from] lsp_core_registry::RegistryError),
}

impl From<DispatchError> for JsonRpcError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::FileNotOpened | DispatchError::ConfigIssue | DispatchError::Registry(_) => {
                invalid_params(err.to_string())
            }
            DispatchError::InvalidParams(message) => invalid_params(message),
        }
    }
}
