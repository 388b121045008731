//! Doubly-linked character chain: the positional backbone the Document
//! buffer (`lsp-core-buffer`) wraps with a mutex and a pair of trackers.
//!
//! A [`Chain`] is an arena of code points with sentinel (`-1`) head/tail
//! nodes; real characters carry a cached [`lsp_core_point::Point`] kept in
//! sync by [`Chain::set_loc`] after every structural edit. [`replace`] is
//! the one entry point that performs a full seek-splice-relocate cycle;
//! everything else ([`Tracker`], [`CharRange`]) is a building block it's
//! assembled from.

mod charrange;
mod encoding;
mod node;
mod tracker;

pub use charrange::CharRange;
pub use encoding::{ingest, Encoding, IngestError};
pub use node::{Chain, SENTINEL};
pub use tracker::Tracker;

use lsp_core_point::Range;

/// Applies `Replace(text, range)`: seeks the edit tracker to the range's
/// end and start-minus-one to find the two anchors that survive the
/// splice, builds `text` into a fragment (collapsing `\r\n` as it goes),
/// splices it in, and refreshes coordinates from the left anchor forward.
///
/// `edit` ends the call parked on `start_anchor`, matching the source
/// (the edit tracker is left where the splice happened, ready for the
/// next sequential edit in the same `didChange` batch).
pub fn replace(chain: &mut Chain, edit: &mut Tracker, text: &str, range: Range) {
    let mut range = range;
    range.correct();

    edit.goto_point(chain, range.end);
    let end_anchor = edit.curr;

    edit.goto_point(chain, range.start);
    edit.reverse(chain);
    let start_anchor = edit.curr;

    let fragment = chain.build_fragment(text);
    chain.replace_between(start_anchor, end_anchor, fragment);
    chain.set_loc(start_anchor);

    edit.goto(start_anchor);
}

/// Builds a brand-new chain from `text` directly, bypassing encoding
/// detection (the caller already has a decoded Rust string — used for a
/// full-document `Reset`, e.g. when a client re-sends the whole buffer on
/// save rather than an incremental edit).
pub fn from_text(text: &str) -> Chain {
    let mut chain = Chain::new();
    if let Some((first, last)) = chain.build_fragment(text) {
        chain.link(chain.head(), first);
        chain.link(last, chain.tail());
    }
    chain.set_loc(chain.first());
    chain
}
