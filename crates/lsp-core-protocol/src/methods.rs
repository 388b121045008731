//! LSP method name constants for dispatch, capability registration, and
//! error reporting.
//!
//! # Usage
//!
//! ```rust
//! use lsp_core_protocol::methods;
//!
//! fn should_support_cancellation(method: &str) -> bool {
//!     matches!(
//!         method,
//!         methods::TEXT_DOCUMENT_COMPLETION
//!             | methods::TEXT_DOCUMENT_HOVER
//!             | methods::TEXT_DOCUMENT_SEMANTIC_TOKENS_FULL
//!     )
//! }
//! ```

// Lifecycle.

pub const INITIALIZE: &str = "initialize";
pub const INITIALIZED: &str = "initialized";
pub const SHUTDOWN: &str = "shutdown";
pub const EXIT: &str = "exit";
pub const SET_TRACE: &str = "$/setTrace";

// Text document synchronization.

pub const TEXT_DOCUMENT_DID_OPEN: &str = "textDocument/didOpen";
pub const TEXT_DOCUMENT_DID_CHANGE: &str = "textDocument/didChange";
pub const TEXT_DOCUMENT_DID_CLOSE: &str = "textDocument/didClose";
pub const TEXT_DOCUMENT_DID_SAVE: &str = "textDocument/didSave";
pub const TEXT_DOCUMENT_WILL_SAVE: &str = "textDocument/willSave";
pub const TEXT_DOCUMENT_WILL_SAVE_WAIT_UNTIL: &str = "textDocument/willSaveWaitUntil";
pub const TEXT_DOCUMENT_PUBLISH_DIAGNOSTICS: &str = "textDocument/publishDiagnostics";

// Language features.

pub const TEXT_DOCUMENT_COMPLETION: &str = "textDocument/completion";
pub const COMPLETION_ITEM_RESOLVE: &str = "completionItem/resolve";
pub const TEXT_DOCUMENT_HOVER: &str = "textDocument/hover";
pub const TEXT_DOCUMENT_SIGNATURE_HELP: &str = "textDocument/signatureHelp";
pub const TEXT_DOCUMENT_DEFINITION: &str = "textDocument/definition";
pub const TEXT_DOCUMENT_DECLARATION: &str = "textDocument/declaration";
pub const TEXT_DOCUMENT_TYPE_DEFINITION: &str = "textDocument/typeDefinition";
pub const TEXT_DOCUMENT_IMPLEMENTATION: &str = "textDocument/implementation";
pub const TEXT_DOCUMENT_REFERENCES: &str = "textDocument/references";
pub const TEXT_DOCUMENT_DOCUMENT_SYMBOL: &str = "textDocument/documentSymbol";
pub const TEXT_DOCUMENT_DOCUMENT_HIGHLIGHT: &str = "textDocument/documentHighlight";
pub const TEXT_DOCUMENT_CODE_ACTION: &str = "textDocument/codeAction";
pub const CODE_ACTION_RESOLVE: &str = "codeAction/resolve";
pub const TEXT_DOCUMENT_CODE_LENS: &str = "textDocument/codeLens";
pub const CODE_LENS_RESOLVE: &str = "codeLens/resolve";
pub const TEXT_DOCUMENT_FORMATTING: &str = "textDocument/formatting";
pub const TEXT_DOCUMENT_RANGE_FORMATTING: &str = "textDocument/rangeFormatting";
pub const TEXT_DOCUMENT_ON_TYPE_FORMATTING: &str = "textDocument/onTypeFormatting";
pub const TEXT_DOCUMENT_PREPARE_RENAME: &str = "textDocument/prepareRename";
pub const TEXT_DOCUMENT_RENAME: &str = "textDocument/rename";
pub const TEXT_DOCUMENT_LINKED_EDITING_RANGE: &str = "textDocument/linkedEditingRange";
pub const TEXT_DOCUMENT_SEMANTIC_TOKENS_FULL: &str = "textDocument/semanticTokens/full";
pub const TEXT_DOCUMENT_SEMANTIC_TOKENS_RANGE: &str = "textDocument/semanticTokens/range";
pub const TEXT_DOCUMENT_FOLDING_RANGE: &str = "textDocument/foldingRange";
pub const TEXT_DOCUMENT_SELECTION_RANGE: &str = "textDocument/selectionRange";
pub const TEXT_DOCUMENT_DIAGNOSTIC: &str = "textDocument/diagnostic";
pub const WORKSPACE_DIAGNOSTIC: &str = "workspace/diagnostic";

// Workspace features.

pub const WORKSPACE_SYMBOL: &str = "workspace/symbol";
pub const WORKSPACE_EXECUTE_COMMAND: &str = "workspace/executeCommand";
pub const WORKSPACE_APPLY_EDIT: &str = "workspace/applyEdit";
pub const WORKSPACE_CONFIGURATION: &str = "workspace/configuration";
pub const WORKSPACE_DID_CHANGE_WORKSPACE_FOLDERS: &str = "workspace/didChangeWorkspaceFolders";
pub const WORKSPACE_DID_CHANGE_CONFIGURATION: &str = "workspace/didChangeConfiguration";
pub const WORKSPACE_DID_CHANGE_WATCHED_FILES: &str = "workspace/didChangeWatchedFiles";
pub const WORKSPACE_SEMANTIC_TOKENS_REFRESH: &str = "workspace/semanticTokens/refresh";
pub const WORKSPACE_DIAGNOSTIC_REFRESH: &str = "workspace/diagnostic/refresh";

// Window features.

pub const WINDOW_SHOW_MESSAGE: &str = "window/showMessage";
pub const WINDOW_LOG_MESSAGE: &str = "window/logMessage";
pub const WINDOW_SHOW_MESSAGE_REQUEST: &str = "window/showMessageRequest";
pub const WINDOW_WORK_DONE_PROGRESS_CREATE: &str = "window/workDoneProgress/create";
pub const WINDOW_WORK_DONE_PROGRESS_CANCEL: &str = "window/workDoneProgress/cancel";

// Special methods.

pub const CANCEL_REQUEST: &str = "$/cancelRequest";
pub const DOLLAR_PROGRESS: &str = "$/progress";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_methods_match_the_wire_names() {
        assert_eq!(INITIALIZE, "initialize");
        assert_eq!(SHUTDOWN, "shutdown");
        assert_eq!(EXIT, "exit");
    }

    #[test]
    fn text_document_methods_match_the_wire_names() {
        assert_eq!(TEXT_DOCUMENT_HOVER, "textDocument/hover");
        assert_eq!(TEXT_DOCUMENT_DID_OPEN, "textDocument/didOpen");
        assert_eq!(TEXT_DOCUMENT_SEMANTIC_TOKENS_FULL, "textDocument/semanticTokens/full");
    }

    #[test]
    fn workspace_and_special_methods_match_the_wire_names() {
        assert_eq!(WORKSPACE_EXECUTE_COMMAND, "workspace/executeCommand");
        assert_eq!(CANCEL_REQUEST, "$/cancelRequest");
    }
}
