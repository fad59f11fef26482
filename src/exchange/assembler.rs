//! Accumulation of streamed deltas into the full reply

/// Accumulates delta fragments by concatenation.
///
/// Every `apply` yields the complete accumulated text, so a consumer
/// overwrites its rendered view with an always-consistent value instead of
/// patching. No normalization: interior whitespace arrives exactly as the
/// provider sent it. Snapshots are monotonically non-decreasing — a token,
/// once published, is never retracted.
#[derive(Debug, Default)]
pub struct ResponseAssembler {
    text: String,
}

impl ResponseAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the accumulated text; returns the new full snapshot.
    pub fn apply(&mut self, delta: &str) -> &str {
        self.text.push_str(delta);
        &self.text
    }

    pub fn snapshot(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_in_order() {
        let mut assembler = ResponseAssembler::new();
        assert_eq!(assembler.apply("It is "), "It is ");
        assert_eq!(assembler.apply("X."), "It is X.");
        assert_eq!(assembler.snapshot(), "It is X.");
    }

    #[test]
    fn interior_whitespace_is_untouched() {
        let mut assembler = ResponseAssembler::new();
        assembler.apply("  a\n");
        assembler.apply("\t b  ");
        assert_eq!(assembler.snapshot(), "  a\n\t b  ");
    }

    #[test]
    fn empty_stream_yields_empty_snapshot() {
        let assembler = ResponseAssembler::new();
        assert_eq!(assembler.snapshot(), "");
    }
}
