//! (line, column) position algebra.
//!
//! [`Point`] and [`Range`] are the only way every other `lsp-core` crate
//! talks about a place in a document. Nothing here carries a byte or
//! character offset — that choice lets a [`Range`] queued for a later edit
//! stay meaningful even after an earlier edit in the same `didChange` batch
//! has changed the document's length, as long as each edit is applied
//! against the post-previous state in order.
//!
//! # Example
//!
//! ```
//! use lsp_core_point::{Point, Range};
//!
//! let r = Range::new(Point::new(0, 0), Point::new(0, 3));
//! assert!(r.contains(Point::new(0, 2)));
//! assert!(!r.contains(Point::new(1, 0)));
//! ```

use std::fmt;

/// A `(line, column)` position, both zero-based and signed.
///
/// Signed so that the sentinel [`Point::NEG`] (`(-1, -1)`) can serve as
/// "before the start of the document" without a special-cased `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub line: i32,
    pub column: i32,
}

impl Point {
    /// `(0, 0)`.
    pub const ZERO: Point = Point { line: 0, column: 0 };
    /// `(-1, -1)` — precedes every real position; used as a `Range` start
    /// meaning "from the beginning of the document".
    pub const NEG: Point = Point { line: -1, column: -1 };
    /// `(2^30 - 1, 2^30 - 1)` — follows every real position; used as a
    /// `Range` end meaning "to the end of the document".
    pub const MAX: Point = Point {
        line: (1 << 30) - 1,
        column: (1 << 30) - 1,
    };

    pub const fn new(line: i32, column: i32) -> Self {
        Point { line, column }
    }

    pub fn is_zero(self) -> bool {
        self.line == 0 && self.column == 0
    }

    /// The point one newline past `self`: next line, column 0.
    pub fn new_line(self) -> Point {
        Point { line: self.line + 1, column: 0 }
    }

    /// The point one character past `self` on the same line.
    pub fn new_column(self) -> Point {
        Point { line: self.line, column: self.column + 1 }
    }

    /// `true` if `self` lies at or after `start`.
    ///
    /// Deliberately asymmetric with [`Point::before`]: the column
    /// comparison here is `>=`, not `>`. Preserved because callers depend
    /// on a point equal to `start` counting as "after" it.
    pub fn after(self, start: Point) -> bool {
        self.line > start.line || (self.line == start.line && self.column >= start.column)
    }

    /// `true` if `self` lies strictly before `end`.
    pub fn before(self, end: Point) -> bool {
        self.line < end.line || (self.line == end.line && self.column < end.column)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line: {} Column: {}", self.line, self.column)
    }
}

/// A half-open... no — an **inclusive** span between two [`Point`]s.
///
/// `Start` and `End` are not required to satisfy `Start <= End` at
/// construction time; [`Range::correct`] clamps negative components but
/// does not reorder them, and [`Range::invalid`] is how callers detect an
/// end-before-start range after an edit has shifted things around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub start: Point,
    pub end: Point,
}

impl Range {
    pub const fn new(start: Point, end: Point) -> Self {
        Range { start, end }
    }

    /// `[Point::NEG, Point::MAX]` — "the whole document".
    pub const fn full() -> Self {
        Range { start: Point::NEG, end: Point::MAX }
    }

    /// Clamp any negative line/column component of `start`/`end` to zero.
    pub fn correct(&mut self) {
        if self.start.line < 0 {
            self.start.line = 0;
        }
        if self.start.column < 0 {
            self.start.column = 0;
        }
        if self.end.line < 0 {
            self.end.line = 0;
        }
        if self.end.column < 0 {
            self.end.column = 0;
        }
    }

    /// Returns a copy of `self` with [`Range::correct`] applied.
    pub fn corrected(mut self) -> Self {
        self.correct();
        self
    }

    /// Whether `p` lies within `self`, inclusive at both ends.
    pub fn contains(&self, p: Point) -> bool {
        if self.start.line == p.line && self.start.line == self.end.line {
            return self.start.column <= p.column && self.end.column >= p.column;
        }
        if self.start.line == p.line {
            return self.start.column <= p.column;
        }
        if self.end.line == p.line {
            return self.end.column >= p.column;
        }
        self.start.line <= p.line && self.end.line >= p.line
    }

    /// Symmetric overlap test, including shared endpoints.
    ///
    /// This is NOT a generic interval-overlap check: it is the specific
    /// four-branch test the source used, preserved verbatim because other
    /// components (the Problem list's `Intersects`) rely on its exact
    /// boundary behavior rather than on interval overlap in general.
    pub fn intersects(&self, other: &Range) -> bool {
        if self.start.after(other.start) && self.start.before(other.end) {
            return true;
        }
        if other.start.after(self.start) && other.start.before(self.end) {
            return true;
        }
        if self.start == other.start {
            return true;
        }
        if self.end == other.end {
            return true;
        }
        false
    }

    /// Whether `self` is entirely contained within `outer`.
    ///
    /// The end-of-line column comparison is strict `<`, not `<=` — this
    /// documents LSP's half-open end convention even though [`Range`]
    /// itself is inclusive-both-ends everywhere else.
    pub fn within(&self, outer: &Range) -> bool {
        if self.start.line == outer.start.line && self.end.line == outer.end.line {
            return self.start.column >= outer.start.column && self.end.column < outer.end.column;
        }
        if self.start.line > outer.start.line && self.end.line < outer.end.line {
            return true;
        }
        if self.start.line == outer.start.line && self.start.column >= outer.start.column {
            return true;
        }
        if self.end.line == outer.end.line && self.end.column < outer.end.column {
            return true;
        }
        false
    }

    /// New range with `start.column` shifted by `-i` (end untouched).
    pub fn minus(&self, i: i32) -> Range {
        Range {
            start: Point::new(self.start.line, self.start.column - i),
            end: self.end,
        }
    }

    /// New range with `end.column` shifted by `i` (start untouched).
    pub fn plus(&self, i: i32) -> Range {
        Range {
            start: self.start,
            end: Point::new(self.end.line, self.end.column + i),
        }
    }

    /// Collapses `self` to cover exactly the single character at `start`.
    pub fn make_single(&self) -> Range {
        self.plus(-1).minus(-1)
    }

    /// `true` when `end` lies strictly before `start` — the range was
    /// inverted by an edit and should not be used for further seeks.
    pub fn invalid(&self) -> bool {
        self.end.before(self.start)
    }

    /// Ordering used to sort ranges by where they start in the document.
    pub fn less_than(&self, other: &Range) -> bool {
        self.start.line < other.start.line
            || (self.start.line == other.start.line && self.start.column < other.start.column)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Range Start:L{}:C{} End:L{}:C{})",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn point_new_line_resets_column() {
        assert_eq!(Point::new(2, 5).new_line(), Point::new(3, 0));
    }

    #[test]
    fn point_new_column_advances() {
        assert_eq!(Point::new(2, 5).new_column(), Point::new(2, 6));
    }

    #[test]
    fn after_is_inclusive_before_is_strict() {
        let p = Point::new(0, 3);
        assert!(p.after(Point::new(0, 3)));
        assert!(!p.before(Point::new(0, 3)));
        assert!(p.before(Point::new(0, 4)));
    }

    #[test]
    fn contains_same_line_is_inclusive_both_ends() {
        let r = Range::new(Point::new(0, 2), Point::new(0, 5));
        assert!(r.contains(Point::new(0, 2)));
        assert!(r.contains(Point::new(0, 5)));
        assert!(!r.contains(Point::new(0, 6)));
    }

    #[test]
    fn contains_multiline() {
        let r = Range::new(Point::new(0, 5), Point::new(2, 3));
        assert!(r.contains(Point::new(1, 100)));
        assert!(r.contains(Point::new(0, 5)));
        assert!(!r.contains(Point::new(0, 4)));
        assert!(r.contains(Point::new(2, 3)));
        assert!(!r.contains(Point::new(2, 4)));
    }

    #[test]
    fn intersects_is_symmetric() {
        let a = Range::new(Point::new(0, 0), Point::new(0, 5));
        let b = Range::new(Point::new(0, 3), Point::new(0, 8));
        assert_eq!(a.intersects(&b), b.intersects(&a));
        assert!(a.intersects(&b));
    }

    #[test]
    fn intersects_shared_endpoint() {
        let a = Range::new(Point::new(0, 0), Point::new(0, 5));
        let b = Range::new(Point::new(0, 0), Point::new(1, 0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn contains_implies_single_point_intersects() {
        let container = Range::new(Point::new(0, 0), Point::new(0, 10));
        let p = Point::new(0, 4);
        assert!(container.contains(p));
        let single = Range::new(p, p);
        assert!(container.intersects(&single));
    }

    #[test]
    fn within_uses_strict_less_than_at_end() {
        let outer = Range::new(Point::new(0, 0), Point::new(0, 10));
        assert!(Range::new(Point::new(0, 0), Point::new(0, 9)).within(&outer));
        assert!(!Range::new(Point::new(0, 0), Point::new(0, 10)).within(&outer));
    }

    #[test]
    fn correct_clamps_negative_components_only() {
        let mut r = Range::new(Point::new(-5, -1), Point::new(3, 4));
        r.correct();
        assert_eq!(r, Range::new(Point::new(0, 0), Point::new(3, 4)));
    }

    #[test]
    fn invalid_when_end_before_start() {
        let r = Range::new(Point::new(2, 0), Point::new(1, 0));
        assert!(r.invalid());
        assert!(!Range::new(Point::new(1, 0), Point::new(2, 0)).invalid());
    }

    #[test]
    fn make_single_collapses_to_start() {
        let r = Range::new(Point::new(0, 3), Point::new(0, 9));
        let single = r.make_single();
        assert_eq!(single.start, Point::new(0, 4));
        assert_eq!(single.end, Point::new(0, 8));
    }

    proptest::proptest! {
        #[test]
        fn intersects_is_always_symmetric(
            sl in 0i32..50, sc in 0i32..50, el in 0i32..50, ec in 0i32..50,
            sl2 in 0i32..50, sc2 in 0i32..50, el2 in 0i32..50, ec2 in 0i32..50,
        ) {
            let a = Range::new(Point::new(sl, sc), Point::new(el, ec));
            let b = Range::new(Point::new(sl2, sc2), Point::new(el2, ec2));
            proptest::prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }

        #[test]
        fn contains_implies_intersects_with_point_range(
            sl in 0i32..20, sc in 0i32..20, el in 0i32..20, ec in 0i32..20,
            pl in 0i32..20, pc in 0i32..20,
        ) {
            let r = Range::new(Point::new(sl, sc), Point::new(el, ec));
            let p = Point::new(pl, pc);
            if r.contains(p) {
                let single = Range::new(p, p);
                proptest::prop_assert!(r.intersects(&single));
            }
        }
    }
}
