//! Document lifecycle and language-feature handlers: everything that
//! reads or writes through a [`Languages`] registry rather than the
//! connection's own lifecycle state.

use crate::error::DispatchError;
use crate::outbound::OutboundSink;
use lsp_core_diagnostics::{token_map_to_protocol, ProblemLevel};
use lsp_core_point::{Point, Range};
use lsp_core_protocol::{methods, JsonRpcError};
use lsp_core_registry::{Language, Languages};
use lsp_core_uri::DocumentUri;
use serde_json::Value;
use std::sync::Arc;

fn parse_uri(raw: &str) -> Result<DocumentUri, DispatchError> {
    DocumentUri::parse(raw).map_err(|e| DispatchError::InvalidParams(format!("invalid uri: {e}")))
}

fn to_core_point(line: u32, character: u32) -> Point {
    Point::new(line as i32, character as i32)
}

fn to_core_range(v: &Value) -> Option<Range> {
    let start = v.pointer("/start")?;
    let end = v.pointer("/end")?;
    Some(Range::new(
        to_core_point(start.get("line")?.as_u64()? as u32, start.get("character")?.as_u64()? as u32),
        to_core_point(end.get("line")?.as_u64()? as u32, end.get("character")?.as_u64()? as u32),
    ))
}

/// Wraps the [`lsp_core_protocol::errors`] param-extraction helpers,
/// which fail with a [`JsonRpcError`] directly since they have no
/// dispatcher-specific error kind of their own.
fn as_invalid_params<T>(result: Result<T, JsonRpcError>) -> Result<T, DispatchError> {
    result.map_err(|e| DispatchError::InvalidParams(e.message))
}

fn require_uri(params: &Value) -> Result<DocumentUri, DispatchError> {
    let raw = params
        .pointer("/textDocument/uri")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DispatchError::InvalidParams("Missing required parameter: textDocument.uri".to_string()))?;
    parse_uri(raw)
}

fn require_open_file(languages: &Languages, uri: &DocumentUri) -> Result<(Arc<Language>, Arc<dyn lsp_core_registry::File>), DispatchError> {
    languages.get_from_uri(uri).ok_or(DispatchError::FileNotOpened)
}

/// Publishes every problem currently known for `uri`, at severity cutoff
/// `None` — every level, not just errors.
fn publish_diagnostics(out: &OutboundSink, uri: &DocumentUri, problems: &lsp_core_diagnostics::Problems) {
    let diagnostics = problems.protocol_diagnostics(ProblemLevel::None);
    out.notify(
        methods::TEXT_DOCUMENT_PUBLISH_DIAGNOSTICS,
        serde_json::json!({ "uri": uri.as_str(), "diagnostics": diagnostics }),
    );
}

pub fn did_open(languages: &Languages, out: &OutboundSink, params: Value) -> Result<(), DispatchError> {
    let uri = require_uri(&params)?;
    let language_id = params
        .pointer("/textDocument/languageId")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DispatchError::InvalidParams("Missing required parameter: textDocument.languageId".to_string()))?;
    let text = params
        .pointer("/textDocument/text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DispatchError::InvalidParams("Missing required parameter: textDocument.text".to_string()))?;

    let file = languages.create_file(uri.clone(), language_id, &mut text.as_bytes())?;
    publish_diagnostics(out, &uri, &file.problems());
    Ok(())
}

pub fn did_change(languages: &Languages, out: &OutboundSink, params: Value) -> Result<(), DispatchError> {
    let uri = require_uri(&params)?;
    let (_, file) = require_open_file(languages, &uri)?;

    let changes = params
        .pointer("/contentChanges")
        .and_then(|v| v.as_array())
        .ok_or_else(|| DispatchError::InvalidParams("Missing required parameter: contentChanges".to_string()))?;

    for change in changes {
        let text = change
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DispatchError::InvalidParams("change missing text".to_string()))?;
        match change.get("range") {
            Some(range_value) if !range_value.is_null() => {
                let range = to_core_range(range_value)
                    .ok_or_else(|| DispatchError::InvalidParams("malformed change range".to_string()))?;
                file.replace(text, range);
            }
            // The whole-document content-change variant has no `range`
            // field; this server only ever advertises incremental sync,
            // so a client sending one is a configuration mismatch.
            _ => return Err(DispatchError::ConfigIssue),
        }
    }

    publish_diagnostics(out, &uri, &file.problems());
    Ok(())
}

pub fn did_save(languages: &Languages, out: &OutboundSink, params: Value) -> Result<(), DispatchError> {
    let uri = require_uri(&params)?;
    let (lang, file) = require_open_file(languages, &uri)?;

    let text = params
        .pointer("/text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DispatchError::InvalidParams("Missing required parameter: text".to_string()))?;
    file.reset(text);

    publish_diagnostics(out, &uri, &file.problems());
    lang.on_save(&file);
    Ok(())
}

pub fn did_close(languages: &Languages, params: Value) -> Result<(), DispatchError> {
    let uri = require_uri(&params)?;
    languages.delete_uri(&uri);
    Ok(())
}

pub fn hover(languages: &Languages, params: &Value) -> Result<Value, DispatchError> {
    let uri = parse_uri(as_invalid_params(lsp_core_protocol::req_uri(params))?)?;
    let (line, character) = as_invalid_params(lsp_core_protocol::req_position(params))?;
    let (_, file) = require_open_file(languages, &uri)?;

    match file.hover(to_core_point(line, character)) {
        Some(hover) => serde_json::to_value(hover.to_protocol())
            .map_err(|e| DispatchError::InvalidParams(e.to_string())),
        None => Ok(Value::Null),
    }
}

pub fn semantic_tokens_full(languages: &Languages, params: &Value) -> Result<Value, DispatchError> {
    let uri = parse_uri(as_invalid_params(lsp_core_protocol::req_uri(params))?)?;
    let (_, file) = require_open_file(languages, &uri)?;

    let token_map = file.semantics().token_map();
    let data: Vec<u32> = token_map_to_protocol(&token_map).into_iter().flatten().collect();
    serde_json::to_value(lsp_types::SemanticTokens { result_id: None, data: decode_tokens(data) })
        .map_err(|e| DispatchError::InvalidParams(e.to_string()))
}

fn decode_tokens(flat: Vec<u32>) -> Vec<lsp_types::SemanticToken> {
    flat.chunks_exact(5)
        .map(|c| lsp_types::SemanticToken {
            delta_line: c[0],
            delta_start: c[1],
            length: c[2],
            token_type: c[3],
            token_modifiers_bitset: c[4],
        })
        .collect()
}

pub fn code_action(languages: &Languages, params: &Value) -> Result<Value, DispatchError> {
    let uri = parse_uri(as_invalid_params(lsp_core_protocol::req_uri(params))?)?;
    let ((start_line, start_char), (end_line, end_char)) = as_invalid_params(lsp_core_protocol::req_range(params))?;
    let (_, file) = require_open_file(languages, &uri)?;

    let range = Range::new(to_core_point(start_line, start_char), to_core_point(end_line, end_char));
    let actions: Vec<lsp_types::CodeActionOrCommand> = file
        .code_actions(range)
        .into_iter()
        .map(|fix| {
            let mut changes = std::collections::HashMap::new();
            if let Ok(url) = url::Url::parse(uri.as_str()) {
                changes.insert(url, vec![fix.text_edit()]);
            }
            lsp_types::CodeActionOrCommand::CodeAction(lsp_types::CodeAction {
                title: fix.title.clone(),
                kind: Some(lsp_types::CodeActionKind::QUICKFIX),
                diagnostics: None,
                edit: Some(lsp_types::WorkspaceEdit { changes: Some(changes), ..Default::default() }),
                command: None,
                is_preferred: None,
                disabled: None,
                data: None,
            })
        })
        .collect();

    serde_json::to_value(actions).map_err(|e| DispatchError::InvalidParams(e.to_string()))
}

/// `textDocument/completion` is not file-specific: it always returns the
/// union of every registered language's static completion list.
pub fn completion(languages: &Languages) -> Result<Value, DispatchError> {
    serde_json::to_value(languages.completions()).map_err(|e| DispatchError::InvalidParams(e.to_string()))
}

pub fn execute_command(languages: &Languages, params: &Value) -> Result<Value, DispatchError> {
    let command = params
        .get("command")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DispatchError::InvalidParams("Missing required parameter: command".to_string()))?;
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
    Ok(languages.commands_execute(command, &arguments)?)
}
