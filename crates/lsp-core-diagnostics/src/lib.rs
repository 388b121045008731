//! Diagnostics and semantic-token accounting shared by every language
//! plugin: a [`problems::Problems`] accumulator for `textDocument/publishDiagnostics`,
//! and a [`semantic::Semantics`] matrix for `textDocument/semanticTokens`.

pub mod problems;
pub mod semantic;

pub use problems::{Fix, Problem, ProblemLevel, Problems};
pub use semantic::{legend, token_map_to_protocol, EncodedToken, Semantic, Semantics, TokenKind, TokensLegend};
