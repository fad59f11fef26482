//! Property-based tests for SSE framing and parsing
//!
//! The load-bearing invariants:
//! - Chunk-boundary invariance: splitting a payload into byte chunks at any
//!   boundaries yields the same framed lines as feeding it whole.
//! - Reassembly correctness: concatenating every decoded delta equals the
//!   text the stream carried.

use super::{parse_line, LineEvent, LineFramer};
use proptest::prelude::*;

/// Feed a payload through the framer in the given chunk sizes and collect
/// all framed lines plus the end-of-stream remainder.
fn frame_chunked(payload: &[u8], chunk_sizes: &[usize]) -> (Vec<String>, Option<String>) {
    let mut framer = LineFramer::new();
    let mut lines = Vec::new();
    let mut offset = 0;
    for &size in chunk_sizes {
        let end = (offset + size).min(payload.len());
        framer.push_chunk(&payload[offset..end]);
        while let Some(line) = framer.next_line() {
            lines.push(line);
        }
        offset = end;
        if offset == payload.len() {
            break;
        }
    }
    if offset < payload.len() {
        framer.push_chunk(&payload[offset..]);
        while let Some(line) = framer.next_line() {
            lines.push(line);
        }
    }
    (lines, framer.take_remainder())
}

/// Arbitrary text payload, newlines included, with a bias toward multi-byte
/// characters so UTF-8 carry is exercised.
fn arb_payload() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            4 => "[a-zA-Z0-9 :,.{}\"\\[\\]]{1,20}",
            2 => Just("\n".to_string()),
            1 => Just("\r\n".to_string()),
            1 => Just("héllo wörld 👋".to_string()),
        ],
        0..20,
    )
    .prop_map(|parts| parts.concat())
}

/// Delta fragments safe to embed in a JSON string literal.
fn arb_deltas() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-zA-Z0-9 .,!?éö👋]{1,30}", 1..10)
}

proptest! {

    /// Chunk-boundary invariance (framer level): any split of the byte
    /// payload produces the same line sequence and remainder as one chunk.
    #[test]
    fn prop_chunk_boundary_invariance(
        payload in arb_payload(),
        chunk_sizes in proptest::collection::vec(1usize..7, 1..64),
    ) {
        let bytes = payload.as_bytes();
        let whole = frame_chunked(bytes, &[bytes.len().max(1)]);
        let chunked = frame_chunked(bytes, &chunk_sizes);
        prop_assert_eq!(whole, chunked);
    }

    /// Reassembly correctness: a well-formed stream of delta payloads,
    /// split at arbitrary byte boundaries, decodes to deltas whose
    /// concatenation is exactly the carried text.
    #[test]
    fn prop_deltas_reassemble_exactly(
        deltas in arb_deltas(),
        chunk_sizes in proptest::collection::vec(1usize..9, 1..128),
    ) {
        let mut doc = String::new();
        for delta in &deltas {
            let chunk = serde_json::json!({"choices": [{"delta": {"content": delta}}]});
            doc.push_str("data: ");
            doc.push_str(&chunk.to_string());
            doc.push('\n');
        }
        doc.push_str("data: [DONE]\n");

        let (lines, remainder) = frame_chunked(doc.as_bytes(), &chunk_sizes);
        prop_assert_eq!(remainder, None);

        let mut reassembled = String::new();
        let mut done = false;
        for line in &lines {
            match parse_line(line) {
                LineEvent::Delta(text) => reassembled.push_str(&text),
                LineEvent::Done => {
                    done = true;
                    break;
                }
                LineEvent::Ignore => {}
                LineEvent::Malformed => prop_assert!(false, "malformed line: {line}"),
            }
        }
        prop_assert!(done, "sentinel not observed");
        prop_assert_eq!(reassembled, deltas.concat());
    }
}
