//! The three methods that drive [`crate::state::InitState`]:
//! `initialize`, `initialized`, and `shutdown`. `exit` is handled by the
//! dispatcher's read loop directly since it tears down the connection
//! rather than producing a response.

use lsp_core_protocol::capabilities::{capabilities_for, RegisteredHandlers};
use lsp_core_registry::Languages;
use serde_json::Value;

fn semantic_tokens_legend() -> lsp_types::SemanticTokensLegend {
    let legend = lsp_core_diagnostics::legend();
    lsp_types::SemanticTokensLegend {
        token_types: legend.token_types.into_iter().map(lsp_types::SemanticTokenType::from).collect(),
        token_modifiers: legend.modifiers.into_iter().map(lsp_types::SemanticTokenModifier::from).collect(),
    }
}

/// Builds the `initialize` response: capabilities derived from exactly
/// the handlers this dispatcher build actually wires up, plus whatever
/// commands the registered languages contribute.
pub fn initialize(languages: &Languages, handlers: &RegisteredHandlers) -> Value {
    let capabilities =
        capabilities_for(handlers, semantic_tokens_legend(), languages.command_provider().commands);
    serde_json::json!({
        "capabilities": capabilities,
        "serverInfo": { "name": "lsp-core-server", "version": env!("CARGO_PKG_VERSION") },
    })
}
