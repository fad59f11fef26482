//! Line framing over a chunked byte stream
//!
//! Chunk boundaries are arbitrary: they can split a line, or fall in the
//! middle of a multi-byte UTF-8 sequence. The framer carries both kinds of
//! partial state across calls.

/// Turns raw byte chunks into complete text lines.
///
/// Line terminators (`\n` and `\r\n`) are stripped. A non-empty remainder
/// at stream end is surfaced via [`LineFramer::take_remainder`] — providers
/// have been seen terminating without a trailing newline.
#[derive(Debug, Default)]
pub struct LineFramer {
    /// Decoded text not yet emitted as lines.
    text: String,
    /// Trailing bytes of an incomplete UTF-8 sequence from the last chunk.
    partial: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk, decoding incrementally.
    ///
    /// A multi-byte character split across chunks is held back until its
    /// remaining bytes arrive. Invalid sequences decode to U+FFFD.
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        self.partial.extend_from_slice(chunk);
        loop {
            match std::str::from_utf8(&self.partial) {
                Ok(valid) => {
                    self.text.push_str(valid);
                    self.partial.clear();
                    break;
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    if let Ok(valid) = std::str::from_utf8(&self.partial[..valid_up_to]) {
                        self.text.push_str(valid);
                    }
                    match err.error_len() {
                        // Incomplete trailing sequence: keep it for the next chunk.
                        None => {
                            self.partial.drain(..valid_up_to);
                            break;
                        }
                        Some(bad_len) => {
                            self.text.push(char::REPLACEMENT_CHARACTER);
                            self.partial.drain(..valid_up_to + bad_len);
                        }
                    }
                }
            }
        }
    }

    /// Extract the next complete line, if one is buffered.
    pub fn next_line(&mut self) -> Option<String> {
        let newline = self.text.find('\n')?;
        let rest = self.text.split_off(newline + 1);
        let mut line = std::mem::replace(&mut self.text, rest);
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }

    /// Re-prepend a line extracted prematurely.
    ///
    /// No terminator is re-inserted: the next chunk joins the same logical
    /// line, so a payload split by a spurious upstream newline can complete.
    pub fn push_back(&mut self, line: &str) {
        self.text.insert_str(0, line);
    }

    /// Drain whatever is left at stream end as a final line.
    ///
    /// Returns `None` when the buffer is empty. An incomplete UTF-8 tail is
    /// decoded lossily — no more bytes are coming.
    pub fn take_remainder(&mut self) -> Option<String> {
        if !self.partial.is_empty() {
            let tail = String::from_utf8_lossy(&self.partial).into_owned();
            self.text.push_str(&tail);
            self.partial.clear();
        }
        if self.text.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(framer: &mut LineFramer) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = framer.next_line() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn splits_single_chunk_into_lines() {
        let mut framer = LineFramer::new();
        framer.push_chunk(b"one\ntwo\nthree\n");
        assert_eq!(drain(&mut framer), vec!["one", "two", "three"]);
        assert_eq!(framer.take_remainder(), None);
    }

    #[test]
    fn strips_crlf_terminators() {
        let mut framer = LineFramer::new();
        framer.push_chunk(b"one\r\ntwo\n");
        assert_eq!(drain(&mut framer), vec!["one", "two"]);
    }

    #[test]
    fn preserves_blank_lines() {
        let mut framer = LineFramer::new();
        framer.push_chunk(b"a\n\nb\n");
        assert_eq!(drain(&mut framer), vec!["a", "", "b"]);
    }

    #[test]
    fn line_split_across_chunks() {
        let mut framer = LineFramer::new();
        framer.push_chunk(b"hel");
        assert_eq!(framer.next_line(), None);
        framer.push_chunk(b"lo\nworld");
        assert_eq!(framer.next_line(), Some("hello".to_string()));
        assert_eq!(framer.next_line(), None);
        assert_eq!(framer.take_remainder(), Some("world".to_string()));
    }

    #[test]
    fn multibyte_character_split_across_chunks() {
        // "👋" is four bytes; split it in the middle.
        let bytes = "👋 hi\n".as_bytes();
        let mut framer = LineFramer::new();
        framer.push_chunk(&bytes[..2]);
        assert_eq!(framer.next_line(), None);
        framer.push_chunk(&bytes[2..]);
        assert_eq!(framer.next_line(), Some("👋 hi".to_string()));
    }

    #[test]
    fn invalid_bytes_decode_to_replacement() {
        let mut framer = LineFramer::new();
        framer.push_chunk(b"a\xffb\n");
        assert_eq!(framer.next_line(), Some("a\u{fffd}b".to_string()));
    }

    #[test]
    fn remainder_without_trailing_newline_is_not_discarded() {
        let mut framer = LineFramer::new();
        framer.push_chunk(b"data: [DONE]");
        assert_eq!(framer.next_line(), None);
        assert_eq!(framer.take_remainder(), Some("data: [DONE]".to_string()));
        assert_eq!(framer.take_remainder(), None);
    }

    #[test]
    fn push_back_joins_with_later_data() {
        let mut framer = LineFramer::new();
        framer.push_chunk(b"data: {\"half\nrest\n");
        let premature = framer.next_line().expect("premature line");
        assert_eq!(premature, "data: {\"half");
        framer.push_back(&premature);
        // The pushed-back text joins the buffered continuation.
        assert_eq!(framer.next_line(), Some("data: {\"halfrest".to_string()));
    }

    #[test]
    fn incomplete_utf8_tail_flushes_lossily_at_stream_end() {
        let bytes = "é".as_bytes();
        let mut framer = LineFramer::new();
        framer.push_chunk(&bytes[..1]);
        assert_eq!(framer.take_remainder(), Some("\u{fffd}".to_string()));
    }
}
