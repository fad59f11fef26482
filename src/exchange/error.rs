//! Exchange error taxonomy

use thiserror::Error;

/// Why an exchange ended in `Failed`.
///
/// Cancellation is deliberately absent: it is a distinct terminal outcome,
/// matched explicitly at the call site rather than inferred from error
/// identity.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Non-success HTTP status before any stream was consumed. The reason
    /// is the proxy's declared `error` field when the body carries one,
    /// otherwise a synthesized status message. Displayed verbatim to the
    /// user, so no prefix.
    #[error("{reason}")]
    RequestRejected { status: u16, reason: String },

    /// A read failed mid-stream for a reason other than cancellation.
    /// Partial content accumulated so far stays committed.
    #[error("stream interrupted: {detail}")]
    TransportInterrupted { detail: String },
}

impl ExchangeError {
    /// True when the conversation gained no assistant placeholder.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ExchangeError::RequestRejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_displays_reason_verbatim() {
        let err = ExchangeError::RequestRejected {
            status: 429,
            reason: "Rate limit exceeded.".to_string(),
        };
        assert_eq!(err.to_string(), "Rate limit exceeded.");
        assert!(err.is_rejection());
    }

    #[test]
    fn interruption_is_prefixed() {
        let err = ExchangeError::TransportInterrupted {
            detail: "connection reset".to_string(),
        };
        assert_eq!(err.to_string(), "stream interrupted: connection reset");
        assert!(!err.is_rejection());
    }
}
