//! Classification of framed SSE lines into stream events

/// End-of-stream sentinel sent as the final data line.
pub const DONE_SENTINEL: &str = "[DONE]";

const DATA_PREFIX: &str = "data: ";

/// Result of classifying one framed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// Comment, blank, non-data line, or a payload carrying no content.
    Ignore,
    /// The `[DONE]` sentinel: stop consuming the stream.
    Done,
    /// An incremental fragment of the assistant reply.
    Delta(String),
    /// A `data:` payload that is not decodable JSON. Recoverable: the
    /// caller pushes the line back into the framer and waits for more data.
    Malformed,
}

/// Classify one framed line.
///
/// Only `choices[0].delta.content` is consumed from a data payload; every
/// other field the provider sends is ignored.
pub fn parse_line(line: &str) -> LineEvent {
    if line.trim().is_empty() || line.starts_with(':') {
        return LineEvent::Ignore;
    }
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return LineEvent::Ignore;
    };
    let payload = payload.trim();
    if payload == DONE_SENTINEL {
        return LineEvent::Done;
    }

    let Ok(value) = serde_json::from_str::<serde_json::Value>(payload) else {
        return LineEvent::Malformed;
    };
    let content = value
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("delta"))
        .and_then(|delta| delta.get("content"))
        .and_then(|content| content.as_str());
    match content {
        Some(text) if !text.is_empty() => LineEvent::Delta(text.to_string()),
        _ => LineEvent::Ignore,
    }
}
