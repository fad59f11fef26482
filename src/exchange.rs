//! One request/response exchange over the streaming transport
//!
//! An exchange moves through `Sending → StreamOpen → Streaming` and ends in
//! exactly one of `Completed`, `Aborted`, or `Failed`. The controller owns
//! all transient exchange state; nothing is exposed to the consumer except
//! snapshots of the accumulated reply.

mod assembler;
mod controller;
mod error;

pub use assembler::ResponseAssembler;
pub use controller::{ExchangeController, ExchangeSink};
pub use error::ExchangeError;

/// Non-terminal phases of an exchange, tracked for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePhase {
    /// Request issued, response headers not yet received.
    Sending,
    /// Headers accepted, assistant placeholder established.
    StreamOpen,
    /// At least one delta has been applied.
    Streaming,
}

impl ExchangePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ExchangePhase::Sending => "sending",
            ExchangePhase::StreamOpen => "stream_open",
            ExchangePhase::Streaming => "streaming",
        }
    }
}

/// Terminal outcome of an exchange.
///
/// Cancellation is a tagged outcome, not an error: an abort keeps whatever
/// content was accumulated and must never surface a failure notification.
#[derive(Debug)]
pub enum ExchangeOutcome {
    /// The sentinel arrived or the stream ended cleanly.
    Completed,
    /// The caller cancelled; accumulated content stays committed.
    Aborted,
    /// The request was rejected or the stream broke mid-flight.
    Failed(ExchangeError),
}

impl ExchangeOutcome {
    pub fn is_terminal_success(&self) -> bool {
        matches!(self, ExchangeOutcome::Completed)
    }
}
