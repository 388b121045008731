//! The dispatcher that turns a [`lsp_core_transport::Connection`] and a
//! [`lsp_core_registry::Languages`] registry into a running LSP
//! connection: JSON-RPC method routing, the initialization state
//! machine, `$/cancelRequest` handling, and the document lifecycle
//! handlers every language plugin rides on top of.

mod cancellation;
mod dispatcher;
mod error;
mod lifecycle;
mod outbound;
mod state;
mod text_document;

pub use cancellation::InFlightRegistry;
pub use dispatcher::{standard_handlers, Dispatcher};
pub use error::DispatchError;
pub use lsp_core_protocol::capabilities::RegisteredHandlers;
pub use outbound::{spawn_writer, OutboundSink};
pub use state::{ConnectionState, InitState};
