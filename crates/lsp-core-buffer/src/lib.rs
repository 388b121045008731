//! The document buffer LSP handlers actually hold onto: a [`Chain`] behind
//! a mutex, plus one tracker driving edits and one driving a sequential
//! read pass.
//!
//! `Document` is the thing a `textDocument/didOpen` handler creates and a
//! `textDocument/didChange` handler mutates in place. The edit and read
//! trackers are independent so a parser streaming through the buffer with
//! [`Document::read_rune`] is never disturbed by a concurrent
//! [`Document::replace`] landing elsewhere in the same document — they
//! just take turns under the one mutex.

use lsp_core_chain::{ingest, Chain, CharRange, Encoding, IngestError, Tracker};
use lsp_core_point::{Point, Range};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use tracing::debug;

struct Inner {
    chain: Chain,
    edit: Tracker,
    read: Tracker,
    encoding: Encoding,
}

/// A mutex-guarded character chain plus its edit and read cursors.
pub struct Document {
    inner: Mutex<Inner>,
}

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("failed to read document contents: {0}")]
    Ingest(#[from] IngestError),
}

impl Document {
    /// Builds a document from a byte stream, detecting its encoding as it
    /// reads. Both cursors start parked on the chain's head sentinel.
    pub fn new<R: io::Read>(reader: R) -> Result<Self, DocumentError> {
        let (chain, encoding) = ingest(reader)?;
        debug!(?encoding, "document ingested");
        let edit = Tracker::new(chain.head());
        let read = Tracker::new(chain.head());
        Ok(Document { inner: Mutex::new(Inner { chain, edit, read, encoding }) })
    }

    /// The encoding this document's bytes were classified as while ingesting.
    pub fn encoding(&self) -> Encoding {
        self.inner.lock().encoding
    }

    /// Applies an incremental `didChange` edit.
    pub fn replace(&self, text: &str, range: Range) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        lsp_core_chain::replace(&mut inner.chain, &mut inner.edit, text, range);
    }

    /// The full document text, sentinels excluded.
    pub fn text(&self) -> String {
        self.inner.lock().chain.to_string_lossless()
    }

    /// Replaces the entire document, as when a client resends the whole
    /// buffer on save instead of an incremental range. Both cursors reset
    /// to the new chain's head.
    pub fn reset(&self, text: &str) {
        let mut guard = self.inner.lock();
        debug!(len = text.len(), "resetting document to full re-sent text");
        let chain = lsp_core_chain::from_text(text);
        guard.edit = Tracker::new(chain.head());
        guard.read = Tracker::new(chain.head());
        guard.chain = chain;
        guard.encoding = Encoding::Utf8;
    }

    /// Structural equality of the two documents' chains, rune by rune.
    pub fn equals(&self, other: &Document) -> bool {
        let a = self.inner.lock();
        let b = other.inner.lock();
        a.chain.structurally_equals(&b.chain)
    }

    /// The chain's head sentinel index.
    pub fn head(&self) -> u32 {
        self.inner.lock().chain.head()
    }

    /// The chain's tail sentinel index.
    pub fn tail(&self) -> u32 {
        self.inner.lock().chain.last()
    }

    /// The position of the character at `idx`.
    pub fn point_of(&self, idx: u32) -> Point {
        self.inner.lock().chain.point_at(idx)
    }

    /// The rune at `idx`, or `None` if `idx` addresses a sentinel.
    pub fn rune_at(&self, idx: u32) -> Option<char> {
        let inner = self.inner.lock();
        if inner.chain.is_sentinel(idx) {
            None
        } else {
            char::from_u32(inner.chain.rune_at(idx) as u32)
        }
    }

    /// Extracts a range's text. `range` must address characters from this
    /// document's own chain.
    pub fn range_text(&self, range: CharRange) -> String {
        range.string(&self.inner.lock().chain)
    }

    /// Moves the read cursor directly to `idx` (a character address
    /// obtained from this same document). Unchecked, matching the source.
    pub fn goto(&self, idx: u32) {
        self.inner.lock().read.goto(idx);
    }

    /// The read cursor's current character address.
    pub fn char(&self) -> u32 {
        self.inner.lock().read.curr
    }

    /// Advances the read cursor and returns the rune it landed on, or
    /// `None` at end of document.
    pub fn read_rune(&self) -> Option<char> {
        let mut guard = self.inner.lock();
        advance_read(&mut guard)
    }

    /// [`Document::read_rune`], folding ASCII lowercase to uppercase.
    pub fn read_rune_upper(&self) -> Option<char> {
        self.read_rune().map(|c| c.to_ascii_uppercase())
    }

    /// Moves the read cursor back one character.
    pub fn unread(&self) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        inner.read.reverse(&inner.chain);
    }

    /// The rune one past the read cursor, without advancing.
    pub fn peek(&self) -> Option<char> {
        let inner = self.inner.lock();
        let next = inner.read.next(&inner.chain);
        if inner.chain.is_sentinel(next) {
            None
        } else {
            char::from_u32(inner.chain.rune_at(next) as u32)
        }
    }

    /// Reads forward from the current position through the first
    /// occurrence of `target`, inclusive, advancing the read cursor to
    /// match. Reaching end of document without finding `target` returns
    /// whatever was read up to that point instead of failing outright;
    /// `None` only when there was nothing left to read at all.
    pub fn read_until_rune(&self, target: char) -> Option<CharRange> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let mut start = None;
        let mut last = None;
        loop {
            match advance_read(inner) {
                Some(ch) => {
                    let idx = inner.read.curr;
                    start.get_or_insert(idx);
                    last = Some(idx);
                    if ch == target {
                        return start.map(|s| CharRange { start: s, end: idx });
                    }
                }
                None => return start.zip(last).map(|(s, l)| CharRange { start: s, end: l }),
            }
        }
    }

    /// [`Document::read_until_rune`] for a multi-character needle.
    pub fn read_until_string(&self, needle: &str) -> Option<CharRange> {
        let target: Vec<char> = needle.chars().collect();
        if target.is_empty() {
            return None;
        }
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let mut start = None;
        let mut last = None;
        let mut window: VecDeque<char> = VecDeque::with_capacity(target.len());
        loop {
            match advance_read(inner) {
                Some(ch) => {
                    let idx = inner.read.curr;
                    start.get_or_insert(idx);
                    last = Some(idx);
                    window.push_back(ch);
                    if window.len() > target.len() {
                        window.pop_front();
                    }
                    if window.len() == target.len() && window.iter().eq(target.iter()) {
                        return start.map(|s| CharRange { start: s, end: idx });
                    }
                }
                None => return start.zip(last).map(|(s, l)| CharRange { start: s, end: l }),
            }
        }
    }

    /// [`Document::read_until_rune`] for `'\n'` — the line includes the
    /// newline when one exists before end of document.
    pub fn read_line(&self) -> Option<CharRange> {
        self.read_until_rune('\n')
    }
}

impl io::Read for Document {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let mut n = 0;
        while n < buf.len() {
            match advance_read(inner) {
                Some(ch) => {
                    let mut tmp = [0u8; 4];
                    let encoded = ch.encode_utf8(&mut tmp);
                    if n + encoded.len() > buf.len() {
                        inner.read.reverse(&inner.chain);
                        break;
                    }
                    buf[n..n + encoded.len()].copy_from_slice(encoded.as_bytes());
                    n += encoded.len();
                }
                None => break,
            }
        }
        Ok(n)
    }
}

fn advance_read(inner: &mut Inner) -> Option<char> {
    inner.read.forward(&inner.chain);
    if inner.chain.is_sentinel(inner.read.curr) {
        None
    } else {
        char::from_u32(inner.chain.rune_at(inner.read.curr) as u32)
    }
}
