//! SSE wire-format handling for the chat proxy's event stream
//!
//! The proxy answers a chat request with a `text/event-stream` body framed
//! as newline-delimited lines, each one of:
//! - `data: <json>` — a completion chunk payload
//! - `data: [DONE]` — end-of-stream sentinel
//! - lines starting with `:` — comments (ignored)
//! - blank lines — event separators (ignored)
//!
//! `framer` turns raw byte chunks into complete lines; `parser` classifies
//! one line into a stream event.

mod framer;
mod parser;

#[cfg(test)]
mod proptests;

pub use framer::LineFramer;
pub use parser::{parse_line, LineEvent, DONE_SENTINEL};
