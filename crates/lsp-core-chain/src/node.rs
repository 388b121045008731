//! The arena that backs a [`crate::Chain`].
//!
//! Nodes are addressed by `u32` index rather than by pointer (SPEC §9
//! option (a)): `prev`/`next` are `Option<u32>` and a [`crate::CharRange`]
//! is a `(start, end)` index pair that stays valid across edits that don't
//! touch its own endpoints, exactly as a pointer pair would in the source.
//! Deleted slots go on a free list and are reused by later allocations —
//! unlike the source's garbage-collected runtime, nothing here is
//! reclaimed automatically, so every splice explicitly frees the nodes it
//! detaches.

use lsp_core_point::Point;

/// Sentinel code point marking chain head/tail.
pub const SENTINEL: i32 = -1;

#[derive(Debug, Clone, Copy)]
pub(crate) struct CharNode {
    pub c: i32,
    pub point: Point,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl CharNode {
    fn sentinel() -> Self {
        CharNode { c: SENTINEL, point: Point::ZERO, prev: None, next: None }
    }
}

/// An arena of [`CharNode`]s forming one doubly-linked chain with a head
/// and tail sentinel (code point `-1`).
#[derive(Debug, Clone)]
pub struct Chain {
    pub(crate) nodes: Vec<CharNode>,
    pub(crate) free: Vec<u32>,
    pub(crate) head: u32,
    pub(crate) tail: u32,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    /// An empty chain: just the head and tail sentinels, directly linked.
    pub fn new() -> Self {
        let mut nodes = vec![CharNode::sentinel(), CharNode::sentinel()];
        nodes[0].next = Some(1);
        nodes[1].prev = Some(0);
        Chain { nodes, free: Vec::new(), head: 0, tail: 1 }
    }

    pub fn head(&self) -> u32 {
        self.head
    }

    pub fn tail(&self) -> u32 {
        self.tail
    }

    pub fn rune_at(&self, idx: u32) -> i32 {
        self.nodes[idx as usize].c
    }

    pub fn point_at(&self, idx: u32) -> Point {
        self.nodes[idx as usize].point
    }

    pub fn is_sentinel(&self, idx: u32) -> bool {
        self.nodes[idx as usize].c == SENTINEL
    }

    pub fn next_of(&self, idx: u32) -> Option<u32> {
        self.nodes[idx as usize].next
    }

    pub fn prev_of(&self, idx: u32) -> Option<u32> {
        self.nodes[idx as usize].prev
    }

    /// The chain's head sentinel — the anchor `set_loc` and `Tracker::reset`
    /// seed coordinate recomputation from, matching the source's `first()`.
    /// Despite the name this is the sentinel itself, not the first real
    /// character: `set_loc` relies on processing it first to seed `(0,-1)`.
    pub fn first(&self) -> u32 {
        self.head
    }

    /// The last character of the whole chain (walks forward to the tail
    /// sentinel), matching the source's `last()`.
    pub fn last(&self) -> u32 {
        let mut c = self.tail;
        while let Some(n) = self.nodes[c as usize].next {
            c = n;
        }
        c
    }

    pub(crate) fn alloc(&mut self, c: i32) -> u32 {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx as usize] = CharNode { c, point: Point::ZERO, prev: None, next: None };
            idx
        } else {
            self.nodes.push(CharNode { c, point: Point::ZERO, prev: None, next: None });
            (self.nodes.len() - 1) as u32
        }
    }

    /// Detaches a run of nodes `[from, to]` (both inclusive, walked via
    /// `next`) and returns them to the free list. Callers must already
    /// have relinked whatever used to point at `from`/`to`.
    pub(crate) fn free_run(&mut self, from: u32, to: u32) {
        let mut c = from;
        loop {
            let next = self.nodes[c as usize].next;
            self.free.push(c);
            if c == to {
                break;
            }
            match next {
                Some(n) => c = n,
                None => break,
            }
        }
    }

    pub(crate) fn link(&mut self, a: u32, b: u32) {
        self.nodes[a as usize].next = Some(b);
        self.nodes[b as usize].prev = Some(a);
    }

    /// Builds a fragment of real characters from `s`, collapsing `\r\n`
    /// into `\n` as it goes (the source's `readString`). Returns `None`
    /// for an empty string — there is nothing to splice in, matching the
    /// source's "text is empty" fast path in `Replace`.
    pub(crate) fn build_fragment(&mut self, s: &str) -> Option<(u32, u32)> {
        let mut first: Option<u32> = None;
        let mut last: Option<u32> = None;
        for ch in s.chars() {
            if ch == '\n' {
                if let Some(l) = last {
                    if self.nodes[l as usize].c == '\r' as i32 {
                        // Splice the bare `\r` back out.
                        let cr = l;
                        let cr_prev = self.nodes[cr as usize].prev;
                        match cr_prev {
                            Some(p) => {
                                self.nodes[p as usize].next = None;
                                last = Some(p);
                            }
                            None => {
                                // the `\r` was the fragment's first node
                                first = None;
                                last = None;
                            }
                        }
                        self.free.push(cr);
                    }
                }
            }
            let idx = self.alloc(ch as i32);
            match last {
                Some(l) => self.link(l, idx),
                None => first = Some(idx),
            }
            last = Some(idx);
        }
        match (first, last) {
            (Some(f), Some(l)) => Some((f, l)),
            _ => None,
        }
    }

    /// Frees whatever real characters previously sat between
    /// `start_anchor` and `end_anchor`, then splices `fragment` between
    /// them. This is the arena housekeeping the source doesn't need
    /// (its runtime is garbage-collected) but a fixed-capacity arena does,
    /// to keep repeated edits from growing the chain without bound.
    pub(crate) fn replace_between(
        &mut self,
        start_anchor: u32,
        end_anchor: u32,
        fragment: Option<(u32, u32)>,
    ) {
        if let Some(old_first) = self.nodes[start_anchor as usize].next {
            if old_first != end_anchor {
                if let Some(old_last) = self.nodes[end_anchor as usize].prev {
                    self.free_run(old_first, old_last);
                }
            }
        }
        self.splice(start_anchor, fragment, end_anchor);
    }

    /// Splices `fragment` (a `build_fragment` result) between
    /// `start_anchor` and `end_anchor`, or links the anchors directly
    /// when `fragment` is `None` (pure deletion). Equivalent to the
    /// source's `File.Replace` splice step.
    pub(crate) fn splice(
        &mut self,
        start_anchor: u32,
        fragment: Option<(u32, u32)>,
        end_anchor: u32,
    ) {
        match fragment {
            Some((first, last)) => {
                self.link(start_anchor, first);
                self.link(last, end_anchor);
            }
            None => self.link(start_anchor, end_anchor),
        }
    }

    /// Inserts a single new node with code point `c` immediately after
    /// `after`, returning its index. Used by `CharRange::pad`.
    pub(crate) fn insert_single(&mut self, after: u32, c: i32) -> u32 {
        let old_next = self.nodes[after as usize].next;
        let idx = self.alloc(c);
        self.link(after, idx);
        if let Some(n) = old_next {
            self.link(idx, n);
        }
        idx
    }

    /// Walks forward from `from`, recomputing `point` for every node from
    /// there to the tail. Mirrors the source's `setLoc`: a node with no
    /// predecessor seeds at `(0, -1)` (so the first real character lands
    /// on column 0 via `new_column`); otherwise a newline predecessor
    /// advances the line, anything else advances the column.
    pub fn set_loc(&mut self, from: u32) {
        let mut c = from;
        loop {
            let point = match self.nodes[c as usize].prev {
                Some(p) => {
                    let pred = self.nodes[p as usize];
                    if pred.c == '\n' as i32 {
                        pred.point.new_line()
                    } else {
                        pred.point.new_column()
                    }
                }
                None => Point::new(0, -1),
            };
            self.nodes[c as usize].point = point;
            match self.nodes[c as usize].next {
                Some(n) => c = n,
                None => break,
            }
        }
    }

    /// Concatenates all real characters (sentinels excluded) in order.
    pub fn to_string_lossless(&self) -> String {
        let mut s = String::new();
        let mut c = self.head;
        while let Some(n) = self.nodes[c as usize].next {
            c = n;
            if self.nodes[c as usize].c != SENTINEL {
                if let Some(ch) = char::from_u32(self.nodes[c as usize].c as u32) {
                    s.push(ch);
                }
            }
        }
        s
    }

    /// Structural equality of two chains, rune by rune, skipping the
    /// leading sentinel on each side (the source's `Char.equals`).
    pub fn structurally_equals(&self, other: &Chain) -> bool {
        let mut a = self.head;
        let mut b = other.head;
        if self.nodes[a as usize].c == SENTINEL {
            if let Some(n) = self.nodes[a as usize].next {
                a = n;
            }
        }
        if other.nodes[b as usize].c == SENTINEL {
            if let Some(n) = other.nodes[b as usize].next {
                b = n;
            }
        }
        loop {
            if self.nodes[a as usize].c != other.nodes[b as usize].c {
                return false;
            }
            let a_next = self.nodes[a as usize].next.filter(|&n| self.nodes[n as usize].c != SENTINEL);
            let b_next = other.nodes[b as usize].next.filter(|&n| other.nodes[n as usize].c != SENTINEL);
            match (a_next, b_next) {
                (None, None) => return true,
                (Some(an), Some(bn)) => {
                    a = an;
                    b = bn;
                }
                _ => return false,
            }
        }
    }
}
