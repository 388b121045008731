//! Semantic token classification and the LSP delta-encoding pipeline.
//!
//! A [`Semantics`] list is a flat bag of `(range, token)` pairs in
//! whatever order a language plugin produced them. [`Semantics::token_map`]
//! rasterizes that bag into a dense `lines × columns` grid, and
//! [`token_map_to_protocol`] compresses the grid into the
//! `semanticTokens/full` wire format.

use lsp_core_point::{Point, Range};
use rustc_hash::FxHashMap;

/// A semantic token kind. Ordered so that, when two entries overlap the
/// same point, the lowest-ordinal one wins — earlier variants here are
/// treated as more specific than later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    Comment,
    Method,
    Macro,
    Variable,
    String,
    Operator,
    TypeParameter,
    Keyword,
    Property,
    Function,
    Parameter,
    /// No token found at this point.
    None,
}

impl TokenKind {
    /// All real token kinds (excludes [`TokenKind::None`]), in legend order.
    pub const ALL: [TokenKind; 11] = [
        TokenKind::Comment,
        TokenKind::Method,
        TokenKind::Macro,
        TokenKind::Variable,
        TokenKind::String,
        TokenKind::Operator,
        TokenKind::TypeParameter,
        TokenKind::Keyword,
        TokenKind::Property,
        TokenKind::Function,
        TokenKind::Parameter,
    ];

    fn name(self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::Method => "method",
            TokenKind::Macro => "macro",
            TokenKind::Variable => "variable",
            TokenKind::String => "string",
            TokenKind::Operator => "operator",
            TokenKind::TypeParameter => "typeParameter",
            TokenKind::Keyword => "keyword",
            TokenKind::Property => "property",
            TokenKind::Function => "function",
            TokenKind::Parameter => "parameter",
            TokenKind::None => "none",
        }
    }
}

/// A 5-tuple `[deltaLine, deltaStartChar, length, tokenTypeIndex,
/// tokenModifiers]`, the unit LSP's `semanticTokens/full` response is
/// built from.
pub type EncodedToken = [u32; 5];

/// The legend a client needs to decode [`EncodedToken`]s: the token type
/// name at each index, and no modifiers (this crate never assigns any).
pub struct TokensLegend {
    pub token_types: Vec<String>,
    pub modifiers: Vec<String>,
    pub map: FxHashMap<String, u32>,
}

/// Builds the legend covering every [`TokenKind`] except
/// [`TokenKind::None`], in declaration order.
pub fn legend() -> TokensLegend {
    let token_types: Vec<String> = TokenKind::ALL.iter().map(|t| t.name().to_string()).collect();
    let mut map = FxHashMap::default();
    for (i, t) in token_types.iter().enumerate() {
        map.insert(t.clone(), i as u32);
    }
    TokensLegend { token_types, modifiers: Vec::new(), map }
}

/// One classified span: `location` carries the same +1-exclusive-end
/// convention as [`lsp_core_chain::CharRange::protocol_range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semantic {
    pub location: Range,
    pub token: TokenKind,
}

impl Semantic {
    pub fn new(location: Range, token: TokenKind) -> Self {
        Semantic { location, token }
    }
}

/// A flat, unordered bag of [`Semantic`] spans for one document.
#[derive(Debug, Clone, Default)]
pub struct Semantics {
    s: Vec<Semantic>,
}

impl Semantics {
    pub fn new(semantics: Vec<Semantic>) -> Self {
        Semantics { s: semantics }
    }

    pub fn append(&mut self, more: impl IntoIterator<Item = Semantic>) {
        self.s.extend(more);
    }

    pub fn slice(&self) -> &[Semantic] {
        &self.s
    }

    /// Orders entries by where they start in the document.
    pub fn sort(&mut self) {
        self.s.sort_by(|a, b| {
            if a.location.less_than(&b.location) {
                std::cmp::Ordering::Less
            } else if b.location.less_than(&a.location) {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        });
    }

    /// `1 + the highest end-line` across every entry, or `0` if empty.
    pub fn lines(&self) -> i32 {
        if self.s.is_empty() {
            return 0;
        }
        self.s.iter().map(|sem| sem.location.end.line).max().unwrap_or(0) + 1
    }

    /// `1 + the highest end-column` across every entry.
    pub fn last_column(&self) -> i32 {
        self.s.iter().map(|sem| sem.location.end.column).max().unwrap_or(0) + 1
    }

    /// The sub-list of entries spanning line `l`.
    pub fn line(&self, l: i32) -> Semantics {
        Semantics {
            s: self
                .s
                .iter()
                .filter(|sem| l >= sem.location.start.line && l <= sem.location.end.line)
                .copied()
                .collect(),
        }
    }

    /// The lowest-ordinal token among entries whose range is [`Range::within`]
    /// the single point `(l, c)`, or [`TokenKind::None`] if none match.
    pub fn token_at(&self, l: i32, c: i32) -> TokenKind {
        let point = Range::new(Point::new(l, c), Point::new(l, c));
        let mut best = TokenKind::None;
        for sem in &self.s {
            if point.within(&sem.location) && sem.token < best {
                best = sem.token;
            }
        }
        best
    }

    /// Rasterizes into a dense `lines × columns` grid, one [`TokenKind`]
    /// per cell.
    pub fn token_map(&self) -> Vec<Vec<TokenKind>> {
        let lines = self.lines();
        let mut map = Vec::with_capacity(lines.max(0) as usize);
        for l in 0..lines {
            let sem_line = self.line(l);
            let last_column = sem_line.last_column();
            let mut row = Vec::with_capacity(last_column.max(0) as usize);
            for c in 0..last_column {
                row.push(sem_line.token_at(l, c));
            }
            map.push(row);
        }
        map
    }
}

/// Compresses a [`Semantics::token_map`] grid into LSP's delta-encoded
/// wire format: one 5-tuple each time the running token changes along a
/// line, with `deltaStart`/`deltaLine` reset at every line boundary. The
/// trailing `0` is the token-modifiers bitset — always zero, since this
/// crate never assigns modifiers, but always present (a 4-tuple is not
/// valid semantic-token data).
pub fn token_map_to_protocol(token_map: &[Vec<TokenKind>]) -> Vec<EncodedToken> {
    let mut tokens = Vec::new();
    let mut length: u32 = 0;
    let mut last_start: u32 = 0;
    let mut curr_start: u32 = 0;
    let mut line_diff: u32 = 0;
    let mut curr_token = TokenKind::None;

    for line in token_map {
        for (column, &t) in line.iter().enumerate() {
            if t != curr_token {
                if curr_token != TokenKind::None {
                    tokens.push(make_token_slice(line_diff, curr_start - last_start, length, curr_token));
                    line_diff = 0;
                    last_start = curr_start;
                }
                length = 0;
                curr_token = t;
                curr_start = column as u32;
            }
            length += 1;
        }
        line_diff += 1;
        curr_token = TokenKind::None;
        last_start = 0;
        length = 0;
    }

    tokens
}

fn make_token_slice(line_diff: u32, column_diff: u32, length: u32, token: TokenKind) -> EncodedToken {
    [line_diff, column_diff, length, token as u32, 0]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn r(sl: i32, sc: i32, el: i32, ec: i32) -> Range {
        Range::new(Point::new(sl, sc), Point::new(el, ec))
    }

    #[test]
    fn legend_lists_every_kind_except_none() {
        let leg = legend();
        assert_eq!(leg.token_types.len(), 11);
        assert!(leg.token_types.contains(&"keyword".to_string()));
        assert!(!leg.token_types.contains(&"none".to_string()));
        assert_eq!(leg.map["function"], leg.token_types.iter().position(|t| t == "function").unwrap() as u32);
    }

    #[test]
    fn sort_orders_by_start_position() {
        let mut s = Semantics::new(vec![
            Semantic::new(r(1, 0, 1, 2), TokenKind::Keyword),
            Semantic::new(r(0, 0, 0, 2), TokenKind::Comment),
        ]);
        s.sort();
        assert_eq!(s.slice()[0].token, TokenKind::Comment);
        assert_eq!(s.slice()[1].token, TokenKind::Keyword);
    }

    #[test]
    fn lines_and_last_column_track_the_furthest_entry() {
        let s = Semantics::new(vec![
            Semantic::new(r(0, 0, 0, 3), TokenKind::Keyword),
            Semantic::new(r(2, 0, 2, 5), TokenKind::String),
        ]);
        assert_eq!(s.lines(), 3);
        assert_eq!(s.last_column(), 6);
    }

    #[test]
    fn lines_is_zero_for_empty_list() {
        assert_eq!(Semantics::default().lines(), 0);
    }

    #[test]
    fn token_at_prefers_lowest_ordinal_on_overlap() {
        let s = Semantics::new(vec![
            Semantic::new(r(0, 0, 0, 10), TokenKind::Variable),
            Semantic::new(r(0, 2, 0, 4), TokenKind::Keyword),
        ]);
        // Variable's ordinal (3) is lower than Keyword's (7), so the
        // narrower Keyword span loses where both cover the point.
        assert_eq!(s.token_at(0, 3), TokenKind::Variable);
    }

    #[test]
    fn token_at_defaults_to_none() {
        let s = Semantics::new(vec![Semantic::new(r(0, 0, 0, 2), TokenKind::Keyword)]);
        assert_eq!(s.token_at(5, 0), TokenKind::None);
    }

    #[test]
    fn token_map_builds_dense_grid_matching_last_column() {
        let s = Semantics::new(vec![Semantic::new(r(0, 0, 0, 3), TokenKind::Keyword)]);
        let map = s.token_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map[0], vec![TokenKind::Keyword, TokenKind::Keyword, TokenKind::Keyword, TokenKind::None]);
    }

    #[test]
    fn token_map_to_protocol_emits_delta_encoded_tuples() {
        // Line 0: "kw" at columns 0-1 (Keyword), then nothing.
        // Line 1: "v" at column 2 (Variable).
        let map = vec![
            vec![TokenKind::Keyword, TokenKind::Keyword, TokenKind::None],
            vec![TokenKind::None, TokenKind::None, TokenKind::Variable],
        ];
        let encoded = token_map_to_protocol(&map);
        assert_eq!(
            encoded,
            vec![
                [0, 0, 2, TokenKind::Keyword as u32, 0],
                [1, 2, 1, TokenKind::Variable as u32, 0],
            ]
        );
    }

    #[test]
    fn token_map_to_protocol_resets_start_at_each_line() {
        let map = vec![
            vec![TokenKind::None, TokenKind::None, TokenKind::Keyword],
            vec![TokenKind::Variable, TokenKind::None],
        ];
        let encoded = token_map_to_protocol(&map);
        assert_eq!(
            encoded,
            vec![
                [0, 2, 1, TokenKind::Keyword as u32, 0],
                [1, 0, 1, TokenKind::Variable as u32, 0],
            ]
        );
    }

    #[test]
    fn token_map_to_protocol_empty_grid_yields_no_tokens() {
        let map: Vec<Vec<TokenKind>> = vec![vec![TokenKind::None, TokenKind::None]];
        assert!(token_map_to_protocol(&map).is_empty());
    }
}
