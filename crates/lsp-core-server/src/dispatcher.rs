//! The method table: one [`Dispatcher`] per connection, owning the
//! language registry, the initialization state machine, the in-flight
//! cancellation table, and the outbound writer handle.
//!
//! Every inbound message is read off the connection serially, then
//! handed to its own `tokio::spawn`'d task — so a slow `hover` on one
//! document never blocks a `didChange` on another. The only shared state
//! a handler can contend on is the registry's own per-language/per-file
//! mutexes, the in-flight table's mutex, and the outbound channel; none
//! of those are held across an `.await`.

use crate::cancellation::{self, InFlightRegistry};
use crate::outbound::OutboundSink;
use crate::state::{ConnectionState, InitState};
use crate::{lifecycle, text_document};
use lsp_core_protocol::capabilities::RegisteredHandlers;
use lsp_core_protocol::{errors, methods, JsonRpcError, JsonRpcResponse};
use lsp_core_registry::Languages;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// The handler set this fixed method table always wires up, for a binary
/// that has no reason to advertise fewer providers than it implements.
/// An embedder with its own reduced method table can build a different
/// [`RegisteredHandlers`] and pass that to [`Dispatcher::new`] instead.
pub fn standard_handlers() -> RegisteredHandlers {
    RegisteredHandlers {
        did_open_close: true,
        did_change: true,
        hover: true,
        definition: false,
        references: false,
        document_symbol: false,
        code_action: true,
        semantic_tokens: true,
        execute_command: true,
        completion: true,
    }
}

pub struct Dispatcher {
    languages: Arc<Languages>,
    handlers: RegisteredHandlers,
    state: ConnectionState,
    in_flight: InFlightRegistry,
    out: OutboundSink,
}

impl Dispatcher {
    /// Builds a dispatcher and wires `languages`' `Notify` callback
    /// through to this connection's own outbound channel, so a plugin's
    /// `LanguageCallbacks::notify` reaches the client instead of being a
    /// no-op.
    pub fn new(languages: Arc<Languages>, handlers: RegisteredHandlers, out: OutboundSink) -> Arc<Self> {
        let sink = out.clone();
        languages.set_notify(move |method, params| sink.notify(method.to_string(), params));
        Arc::new(Dispatcher {
            languages,
            handlers,
            state: ConnectionState::new(),
            in_flight: InFlightRegistry::new(),
            out,
        })
    }

    /// Drives one connection to completion: reads framed requests off
    /// `reader` until EOF or `exit`, dispatching every other message to
    /// its own task. Responses and notifications go out through the
    /// [`OutboundSink`] this dispatcher was built with, not through
    /// `reader` — a connection's writer half is owned by its own spawned
    /// writer task, not by this loop.
    pub async fn run(self: Arc<Self>, mut reader: Box<dyn tokio::io::AsyncBufRead + Unpin + Send>) {
        loop {
            let request = match lsp_core_transport::read_message(&mut reader).await {
                Ok(Some(request)) => request,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "transport read failed, closing connection");
                    break;
                }
            };

            if request.method == methods::EXIT {
                break;
            }

            tokio::spawn(self.clone().dispatch_one(request));
        }
    }

    async fn dispatch_one(self: Arc<Self>, request: lsp_core_protocol::JsonRpcRequest) {
        let method = request.method;
        let params = request.params.unwrap_or(Value::Null);

        if method == methods::CANCEL_REQUEST {
            if let Some(id) = params.get("id").cloned() {
                self.in_flight.cancel(&id);
            }
            return;
        }

        match request.id {
            Some(id) => self.dispatch_request(id, method, params).await,
            None => self.dispatch_notification(method, params).await,
        }
    }

    async fn dispatch_request(self: Arc<Self>, id: Value, method: String, params: Value) {
        if !self.init_allows(&method) {
            self.out.respond(JsonRpcResponse::error(Some(id), errors::server_not_initialized()));
            return;
        }

        let token = self.in_flight.register(&id);
        let outcome = cancellation::race(&token, async { self.handle_request(&method, params) }).await;
        self.in_flight.remove(&id);

        match outcome {
            Ok(Ok(value)) => self.out.respond(JsonRpcResponse::success(Some(id), value)),
            Ok(Err(err)) => self.out.respond(JsonRpcResponse::error(Some(id), err)),
            Err(()) => self.out.respond(errors::cancelled_response(&id)),
        }
    }

    async fn dispatch_notification(self: Arc<Self>, method: String, params: Value) {
        if !self.init_allows(&method) {
            warn!(%method, "dropping notification received before initialization");
            return;
        }
        if let Err(err) = self.handle_notification(&method, params) {
            warn!(%method, error = %err, "notification handler failed");
        }
    }

    fn init_allows(&self, method: &str) -> bool {
        match self.state.get() {
            InitState::Uninitialized => {
                matches!(method, methods::INITIALIZE | methods::INITIALIZED | methods::SET_TRACE)
            }
            InitState::Initialized => true,
            InitState::Shutdown => method == methods::SHUTDOWN,
        }
    }

    /// Runs the method table. Handlers below the `initialize`/`shutdown`
    /// pair return a [`crate::error::DispatchError`], kept distinct from
    /// the wire [`JsonRpcError`] until here — this is the one place in
    /// the dispatcher that boundary conversion happens.
    fn handle_request(&self, method: &str, params: Value) -> Result<Value, JsonRpcError> {
        match method {
            methods::INITIALIZE => Ok(lifecycle::initialize(&self.languages, &self.handlers)),
            methods::SHUTDOWN => {
                self.state.set(InitState::Shutdown);
                Ok(Value::Null)
            }
            methods::TEXT_DOCUMENT_HOVER => text_document::hover(&self.languages, &params).map_err(JsonRpcError::from),
            methods::TEXT_DOCUMENT_SEMANTIC_TOKENS_FULL => {
                text_document::semantic_tokens_full(&self.languages, &params).map_err(JsonRpcError::from)
            }
            methods::TEXT_DOCUMENT_CODE_ACTION => {
                text_document::code_action(&self.languages, &params).map_err(JsonRpcError::from)
            }
            methods::TEXT_DOCUMENT_COMPLETION => text_document::completion(&self.languages).map_err(JsonRpcError::from),
            methods::WORKSPACE_EXECUTE_COMMAND => {
                text_document::execute_command(&self.languages, &params).map_err(JsonRpcError::from)
            }
            other => Err(errors::method_not_found(other)),
        }
    }

    fn handle_notification(&self, method: &str, params: Value) -> Result<(), JsonRpcError> {
        match method {
            methods::INITIALIZED => {
                self.state.set(InitState::Initialized);
                Ok(())
            }
            methods::SET_TRACE => Ok(()),
            methods::TEXT_DOCUMENT_DID_OPEN => {
                text_document::did_open(&self.languages, &self.out, params).map_err(JsonRpcError::from)
            }
            methods::TEXT_DOCUMENT_DID_CHANGE => {
                text_document::did_change(&self.languages, &self.out, params).map_err(JsonRpcError::from)
            }
            methods::TEXT_DOCUMENT_DID_SAVE => {
                text_document::did_save(&self.languages, &self.out, params).map_err(JsonRpcError::from)
            }
            methods::TEXT_DOCUMENT_DID_CLOSE => text_document::did_close(&self.languages, params).map_err(JsonRpcError::from),
            // Unknown notifications have no response to send and no
            // sender to report an error to; the LSP spec requires they
            // be ignored rather than torn down the connection over.
            _ => Ok(()),
        }
    }
}
