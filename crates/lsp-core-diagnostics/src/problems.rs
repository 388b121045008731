//! Diagnostics accumulator: [`Problem`]s found while processing a document,
//! collected into a [`Problems`] list and converted to LSP diagnostics on
//! request.

use lsp_core_chain::CharRange;
use lsp_core_point::{Point, Range};

/// Severity of a [`Problem`], ordered most to least severe so that
/// `level <= max_level` reads as "at least this severe".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProblemLevel {
    Error,
    Warning,
    Info,
    Hint,
    /// Never actually attached to a problem; the maximum `max_level` a
    /// caller can pass to [`Problems::protocol_diagnostics`] to mean "all
    /// of them".
    None,
}

/// An optional suggested edit attached to a [`Problem`].
#[derive(Debug, Clone)]
pub struct Fix {
    pub title: String,
    pub range: Range,
    pub fixed: String,
}

impl Fix {
    /// The LSP `TextEdit` a code action would apply.
    pub fn text_edit(&self) -> lsp_types::TextEdit {
        lsp_types::TextEdit { range: to_lsp_range(self.range), new_text: self.fixed.clone() }
    }
}

/// One diagnostic finding: a severity, a message, the range it occurred
/// at, and an optional fix a client could offer as a code action.
#[derive(Debug, Clone)]
pub struct Problem {
    pub level: ProblemLevel,
    pub message: String,
    pub location: Range,
    pub char_range: Option<CharRange>,
    pub fix: Option<Fix>,
}

impl Problem {
    /// The macro name embedded in an `AddPossible` message, e.g.
    /// `"possible macro found: FOO"` yields `Some("FOO")`. Returns `None`
    /// for any other problem.
    pub fn possible_macro(&self) -> Option<&str> {
        self.message.strip_prefix("possible macro found: ")
    }
}

fn to_lsp_position(p: Point) -> lsp_types::Position {
    lsp_types::Position { line: p.line.max(0) as u32, character: p.column.max(0) as u32 }
}

fn to_lsp_range(r: Range) -> lsp_types::Range {
    lsp_types::Range { start: to_lsp_position(r.start), end: to_lsp_position(r.end) }
}

fn problem_level_to_severity(level: ProblemLevel) -> Option<lsp_types::DiagnosticSeverity> {
    match level {
        ProblemLevel::Error => Some(lsp_types::DiagnosticSeverity::ERROR),
        ProblemLevel::Warning => Some(lsp_types::DiagnosticSeverity::WARNING),
        ProblemLevel::Info => Some(lsp_types::DiagnosticSeverity::INFORMATION),
        ProblemLevel::Hint => Some(lsp_types::DiagnosticSeverity::HINT),
        ProblemLevel::None => None,
    }
}

/// An accumulator of [`Problem`]s found while walking a document.
#[derive(Debug, Clone, Default)]
pub struct Problems {
    p: Vec<Problem>,
}

impl Problems {
    pub fn new() -> Self {
        Problems::default()
    }

    /// A list holding a single error, with no location.
    pub fn new_err(message: impl Into<String>, location: Range) -> Self {
        Problems {
            p: vec![Problem {
                level: ProblemLevel::Error,
                message: message.into(),
                location,
                char_range: None,
                fix: None,
            }],
        }
    }

    pub fn add_err(&mut self, message: impl Into<String>, loc: CharRange, range: Range, fix: Option<Fix>) {
        self.p.push(Problem {
            level: ProblemLevel::Error,
            message: message.into(),
            location: range,
            char_range: Some(loc),
            fix,
        });
    }

    pub fn add_warning(&mut self, message: impl Into<String>, loc: CharRange, range: Range, fix: Option<Fix>) {
        self.p.push(Problem {
            level: ProblemLevel::Warning,
            message: message.into(),
            location: range,
            char_range: Some(loc),
            fix,
        });
    }

    pub fn add_info(&mut self, message: impl Into<String>, loc: CharRange, range: Range) {
        self.p.push(Problem {
            level: ProblemLevel::Info,
            message: message.into(),
            location: range,
            char_range: Some(loc),
            fix: None,
        });
    }

    /// Records a possible macro invocation found at `range` — an
    /// informational hint, not backed by a `CharRange`.
    pub fn add_possible(&mut self, name: &str, range: Range) {
        self.p.push(Problem {
            level: ProblemLevel::Info,
            message: format!("possible macro found: {name}"),
            location: range,
            char_range: None,
            fix: None,
        });
    }

    /// Every message at [`ProblemLevel::Error`], each prefixed with `name`.
    pub fn errors(&self, name: &str) -> Vec<String> {
        self.p
            .iter()
            .filter(|pr| pr.level == ProblemLevel::Error)
            .map(|pr| format!("{name}: {}", pr.message))
            .collect()
    }

    /// Appends another list's problems in place.
    pub fn add(&mut self, other: &Problems) {
        self.p.extend(other.p.iter().cloned());
    }

    /// Alias of [`Problems::add`], matching the source's two names for the
    /// same merge operation.
    pub fn append(&mut self, other: &Problems) {
        self.add(other);
    }

    pub fn slice(&self) -> &[Problem] {
        &self.p
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.p.iter()
    }

    /// A new list holding only the problems whose location intersects
    /// `range`.
    pub fn intersects(&self, range: Range) -> Problems {
        Problems { p: self.p.iter().filter(|pr| pr.location.intersects(&range)).cloned().collect() }
    }

    pub fn len(&self) -> usize {
        self.p.len()
    }

    pub fn is_empty(&self) -> bool {
        self.p.is_empty()
    }

    /// Converts every problem at or more severe than `max_level` into an
    /// LSP diagnostic, in accumulation order.
    pub fn protocol_diagnostics(&self, max_level: ProblemLevel) -> Vec<lsp_types::Diagnostic> {
        self.p
            .iter()
            .filter(|pr| pr.level <= max_level)
            .map(|pr| lsp_types::Diagnostic {
                range: to_lsp_range(pr.location),
                severity: problem_level_to_severity(pr.level),
                code: None,
                code_description: None,
                source: None,
                message: pr.message.clone(),
                related_information: None,
                tags: None,
                data: None,
            })
            .collect()
    }
}
