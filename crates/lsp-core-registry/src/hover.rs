//! The hover payload a [`crate::File`] returns for `textDocument/hover`.

use lsp_core_point::{Point, Range};

/// Markdown content plus the range it describes. Rendering the markdown
/// itself (headers, code fences, links) is a language plugin's job; this
/// crate only carries the already-rendered string through to the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hover {
    pub markdown: String,
    pub range: Range,
}

impl Hover {
    pub fn new(markdown: impl Into<String>, range: Range) -> Self {
        Hover { markdown: markdown.into(), range }
    }

    /// The LSP wire form.
    pub fn to_protocol(&self) -> lsp_types::Hover {
        lsp_types::Hover {
            contents: lsp_types::HoverContents::Markup(lsp_types::MarkupContent {
                kind: lsp_types::MarkupKind::Markdown,
                value: self.markdown.clone(),
            }),
            range: Some(to_lsp_range(self.range)),
        }
    }
}

fn to_lsp_position(p: Point) -> lsp_types::Position {
    lsp_types::Position { line: p.line.max(0) as u32, character: p.column.max(0) as u32 }
}

fn to_lsp_range(r: Range) -> lsp_types::Range {
    lsp_types::Range { start: to_lsp_position(r.start), end: to_lsp_position(r.end) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn to_protocol_carries_markdown_and_range() {
        let hover = Hover::new("**bold**", Range::new(Point::new(0, 0), Point::new(0, 4)));
        let protocol = hover.to_protocol();
        let lsp_types::HoverContents::Markup(markup) = protocol.contents else {
            unreachable!("hover always produces markup contents");
        };
        assert_eq!(markup.value, "**bold**");
        assert_eq!(protocol.range.expect("range").end.character, 4);
    }
}
