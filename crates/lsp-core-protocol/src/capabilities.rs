//! Server capability negotiation.
//!
//! Unlike a language server built around one fixed feature set, this core
//! doesn't know ahead of time which handlers a binary wires up — so
//! capabilities are derived from what actually got registered with the
//! dispatcher, not from compile-time feature flags.

use lsp_types::*;

/// Which handlers a dispatcher instance has registered, gathered at
/// `initialize` time to build the `ServerCapabilities` response.
#[derive(Debug, Clone, Default)]
pub struct RegisteredHandlers {
    pub did_open_close: bool,
    pub did_change: bool,
    pub hover: bool,
    pub definition: bool,
    pub references: bool,
    pub document_symbol: bool,
    pub code_action: bool,
    pub semantic_tokens: bool,
    pub execute_command: bool,
    pub completion: bool,
}

/// Builds the `ServerCapabilities` response from the registered handlers,
/// the semantic-token legend in use, and the command names the language
/// registry has accumulated.
pub fn capabilities_for(
    handlers: &RegisteredHandlers,
    semantic_legend: SemanticTokensLegend,
    commands: Vec<String>,
) -> ServerCapabilities {
    let mut caps = ServerCapabilities::default();

    caps.text_document_sync = Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
        open_close: Some(handlers.did_open_close),
        change: Some(if handlers.did_change { TextDocumentSyncKind::INCREMENTAL } else { TextDocumentSyncKind::NONE }),
        will_save: None,
        will_save_wait_until: None,
        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions { include_text: Some(true) })),
    }));

    // The "Â®" trigger character is a historical mojibake artifact of the
    // source project's trigger-character list, preserved byte-for-byte
    // rather than corrected.
    caps.completion_provider = handlers.completion.then(|| CompletionOptions {
        trigger_characters: Some(vec!["@".to_string(), "Â®".to_string()]),
        resolve_provider: None,
        all_commit_characters: None,
        work_done_progress_options: WorkDoneProgressOptions::default(),
        completion_item: None,
    });

    caps.hover_provider = handlers.hover.then_some(HoverProviderCapability::Simple(true));
    caps.definition_provider = handlers.definition.then_some(OneOf::Left(true));
    caps.references_provider = handlers.references.then_some(OneOf::Left(true));
    caps.document_symbol_provider = handlers.document_symbol.then_some(OneOf::Left(true));

    caps.code_action_provider = handlers.code_action.then(|| {
        CodeActionProviderCapability::Options(CodeActionOptions {
            code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
            resolve_provider: None,
            work_done_progress_options: WorkDoneProgressOptions::default(),
        })
    });

    caps.semantic_tokens_provider = handlers.semantic_tokens.then(|| {
        SemanticTokensServerCapabilities::SemanticTokensOptions(SemanticTokensOptions {
            work_done_progress_options: WorkDoneProgressOptions::default(),
            legend: semantic_legend,
            range: Some(false),
            full: Some(SemanticTokensFullOptions::Bool(true)),
        })
    });

    caps.execute_command_provider = handlers.execute_command.then(|| ExecuteCommandOptions {
        commands,
        work_done_progress_options: WorkDoneProgressOptions::default(),
    });

    caps
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn empty_legend() -> SemanticTokensLegend {
        SemanticTokensLegend { token_types: Vec::new(), token_modifiers: Vec::new() }
    }

    #[test]
    fn unregistered_handlers_leave_providers_unset() {
        let caps = capabilities_for(&RegisteredHandlers::default(), empty_legend(), Vec::new());
        assert!(caps.hover_provider.is_none());
        assert!(caps.semantic_tokens_provider.is_none());
        assert!(caps.execute_command_provider.is_none());
    }

    #[test]
    fn hover_handler_sets_simple_provider() {
        let handlers = RegisteredHandlers { hover: true, ..Default::default() };
        let caps = capabilities_for(&handlers, empty_legend(), Vec::new());
        assert!(matches!(caps.hover_provider, Some(HoverProviderCapability::Simple(true))));
    }

    #[test]
    fn did_change_sets_incremental_sync() {
        let handlers = RegisteredHandlers { did_open_close: true, did_change: true, ..Default::default() };
        let caps = capabilities_for(&handlers, empty_legend(), Vec::new());
        let Some(TextDocumentSyncCapability::Options(opts)) = caps.text_document_sync else {
            unreachable!("sync options always set");
        };
        assert_eq!(opts.change, Some(TextDocumentSyncKind::INCREMENTAL));
        assert_eq!(opts.open_close, Some(true));
    }

    #[test]
    fn execute_command_carries_registry_command_names() {
        let handlers = RegisteredHandlers { execute_command: true, ..Default::default() };
        let caps = capabilities_for(&handlers, empty_legend(), vec!["foo.bar".to_string()]);
        assert_eq!(caps.execute_command_provider.expect("provider").commands, vec!["foo.bar".to_string()]);
    }

    #[test]
    fn completion_trigger_characters_preserve_mojibake_artifact() {
        let handlers = RegisteredHandlers { completion: true, ..Default::default() };
        let caps = capabilities_for(&handlers, empty_legend(), Vec::new());
        let triggers = caps.completion_provider.expect("provider").trigger_characters.expect("triggers");
        assert_eq!(triggers, vec!["@".to_string(), "Â®".to_string()]);
    }
}
