//! Single-cursor seeking over a [`crate::Chain`].
//!
//! A `Tracker` is deliberately dumb: `goto` sets `curr` to whatever index
//! it's given without checking that the index belongs to the chain it's
//! later used with — the source's `GoTo` has the same lack of validation
//! (a more careful forward/backward search was written and then commented
//! out), so callers are responsible for passing indices that came from the
//! same chain.

use crate::node::Chain;
use lsp_core_point::Point;

/// A cursor into a [`Chain`]. The Document buffer keeps two of these — one
/// for edits, one for streaming reads — so a read in progress is not
/// disturbed by a concurrent edit's seek.
#[derive(Debug, Clone, Copy)]
pub struct Tracker {
    pub curr: u32,
}

impl Tracker {
    pub fn new(curr: u32) -> Self {
        Tracker { curr }
    }

    /// One step forward, clamped at the tail sentinel.
    pub fn forward(&mut self, chain: &Chain) {
        if let Some(n) = chain.next_of(self.curr) {
            self.curr = n;
        }
    }

    /// One step backward, clamped at the head sentinel.
    pub fn reverse(&mut self, chain: &Chain) {
        if let Some(p) = chain.prev_of(self.curr) {
            self.curr = p;
        }
    }

    /// Peek one step forward without moving; clamped to `curr` itself.
    pub fn next(&self, chain: &Chain) -> u32 {
        chain.next_of(self.curr).unwrap_or(self.curr)
    }

    /// Peek one step backward without moving; clamped to `curr` itself.
    pub fn prev(&self, chain: &Chain) -> u32 {
        chain.prev_of(self.curr).unwrap_or(self.curr)
    }

    /// Walks toward line `n`, one character at a time, stopping when the
    /// current line matches `n` or a sentinel blocks further movement.
    pub fn goto_line(&mut self, chain: &Chain, n: i32) {
        loop {
            let cur = chain.point_at(self.curr).line;
            if cur < n {
                match chain.next_of(self.curr) {
                    Some(next) => self.curr = next,
                    None => break,
                }
            } else if cur > n {
                match chain.prev_of(self.curr) {
                    Some(prev) => self.curr = prev,
                    None => break,
                }
            } else {
                break;
            }
        }
    }

    /// Walks toward column `n` on the current line, same clamping rule as
    /// [`Tracker::goto_line`].
    pub fn goto_col(&mut self, chain: &Chain, n: i32) {
        loop {
            let cur = chain.point_at(self.curr).column;
            if cur < n {
                match chain.next_of(self.curr) {
                    Some(next) => self.curr = next,
                    None => break,
                }
            } else if cur > n {
                match chain.prev_of(self.curr) {
                    Some(prev) => self.curr = prev,
                    None => break,
                }
            } else {
                break;
            }
        }
    }

    /// Line-seek then column-seek; skips the line-seek if already on the
    /// target line.
    pub fn goto_point(&mut self, chain: &Chain, p: Point) {
        if chain.point_at(self.curr).line != p.line {
            self.goto_line(chain, p.line);
        }
        self.goto_col(chain, p.column);
    }

    /// Returns to the very first node of the chain (its head sentinel).
    pub fn reset(&mut self, chain: &Chain) {
        self.curr = chain.first();
    }

    /// Jumps directly to `idx`, unchecked.
    pub fn goto(&mut self, idx: u32) {
        self.curr = idx;
    }
}
