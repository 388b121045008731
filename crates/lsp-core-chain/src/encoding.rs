//! Windows-1252 / UTF-8 detection and ingestion.
//!
//! The source resolves encoding once per line while reading a file
//! top-to-bottom and sticks with its first non-`Unknown` verdict for the
//! rest of the buffer's life. The heuristic: decoding raw bytes as UTF-8
//! and seeing the replacement character means the bytes were actually
//! Windows-1252; seeing an `Â` immediately before a `©`/`®` means the
//! opposite happened — the bytes were valid UTF-8 that got pre-decoded as
//! Windows-1252 by mistake, breaking one two-byte UTF-8 sequence into two
//! separate single-byte characters.

use crate::node::Chain;
use encoding_rs::WINDOWS_1252;
use std::io::BufRead;

/// Resolved or provisional encoding of a [`Chain`] built by [`ingest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Unknown,
    Windows1252,
    Utf8,
}

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

fn decode_1252(bytes: &[u8]) -> String {
    let (cow, _enc, _had_errors) = WINDOWS_1252.decode(bytes);
    cow.into_owned()
}

fn contains_replacement_char(s: &str) -> bool {
    s.chars().any(|c| c == '\u{FFFD}')
}

/// `Â` (U+00C2) immediately followed by `©` (U+00A9) or `®` (U+00AE).
fn contains_1252_marker_pair(s: &str) -> bool {
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if let Some(p) = prev {
            if p == '\u{00C2}' && (c == '\u{00A9}' || c == '\u{00AE}') {
                return true;
            }
        }
        prev = Some(c);
    }
    false
}

/// Resolves one line's encoding and returns the text it should be parsed
/// into the chain as.
fn classify_line(current: Encoding, raw: &[u8]) -> (Encoding, String) {
    let initial = if current == Encoding::Windows1252 {
        decode_1252(raw)
    } else {
        String::from_utf8_lossy(raw).into_owned()
    };

    if contains_replacement_char(&initial) {
        return (Encoding::Windows1252, decode_1252(raw));
    }

    if contains_1252_marker_pair(&initial) {
        // These bytes were valid UTF-8 all along; recover the original
        // bytes by re-encoding the (wrongly 1252-decoded) text through
        // 1252, then decode that as UTF-8.
        let (bytes, _enc, _had_errors) = WINDOWS_1252.encode(&initial);
        return (Encoding::Utf8, String::from_utf8_lossy(&bytes).into_owned());
    }

    let resolved = if current == Encoding::Unknown { Encoding::Utf8 } else { current };
    (resolved, initial)
}

/// Reads `reader` line by line (splitting on `\n`, keeping it), resolving
/// encoding and appending each line's fragment onto a running chain.
/// CRLF collapse happens inside [`Chain::build_fragment`] for every line.
pub fn ingest<R: std::io::Read>(reader: R) -> Result<(Chain, Encoding), IngestError> {
    let mut buf = std::io::BufReader::new(reader);
    let mut chain = Chain::new();
    let mut encoding = Encoding::Unknown;
    let mut running_tail = chain.head();

    loop {
        let mut line = Vec::new();
        let n = buf.read_until(b'\n', &mut line)?;
        if n == 0 {
            break;
        }
        let (new_encoding, text) = classify_line(encoding, &line);
        encoding = new_encoding;
        if let Some((first, last)) = chain.build_fragment(&text) {
            chain.link(running_tail, first);
            running_tail = last;
        }
    }

    chain.link(running_tail, chain.tail());
    chain.set_loc(chain.first());
    Ok((chain, encoding))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_resolves_to_utf8() {
        let (chain, enc) = ingest("abc\ndef\n".as_bytes()).expect("ingest");
        assert_eq!(enc, Encoding::Utf8);
        assert_eq!(chain.to_string_lossless(), "abc\ndef\n");
    }

    #[test]
    fn crlf_collapses_during_ingestion() {
        let (chain, _) = ingest(b"a\r\nb".as_ref()).expect("ingest");
        assert_eq!(chain.to_string_lossless(), "a\nb");
    }

    #[test]
    fn windows_1252_marker_pair_reclassifies_as_utf8() {
        // Bytes 0xC2 0xAE are valid UTF-8 for U+00AE (registered sign),
        // but ingest them already forced through a 1252 decode so the
        // heuristic sees "Â" immediately before "®" and recovers UTF-8.
        let raw: &[u8] = &[0xC2, 0xAE];
        let (_, text) = classify_line(Encoding::Windows1252, raw);
        assert_eq!(text, "\u{00AE}");
    }

    #[test]
    fn invalid_utf8_byte_reclassifies_as_1252() {
        let raw: &[u8] = &[0xAE]; // lone 0xAE is invalid UTF-8 on its own
        let (encoding, text) = classify_line(Encoding::Unknown, raw);
        assert_eq!(encoding, Encoding::Windows1252);
        assert_eq!(text, "\u{00AE}");
    }

    #[test]
    fn ingest_recovers_utf8_misdecoded_as_1252_end_to_end() {
        // A first line forces the Windows-1252 verdict (it contains a byte
        // with no valid standalone UTF-8 interpretation), then a later line
        // carries a lone registered-sign code point as genuine UTF-8 bytes
        // (0xC2 0xAE). Decoded through the already-locked 1252 verdict that
        // would come out as "Â®"; the marker-pair heuristic must catch it
        // and recover the single `®` character instead.
        let mut raw = Vec::new();
        raw.extend_from_slice(&[0xAE, b'\n']);
        raw.extend_from_slice(&[0xC2, 0xAE, b'\n']);

        let (chain, encoding) = ingest(raw.as_slice()).expect("ingest");
        assert_eq!(encoding, Encoding::Utf8);
        assert_eq!(chain.to_string_lossless(), "\u{00AE}\n\u{00AE}\n");
    }
}
