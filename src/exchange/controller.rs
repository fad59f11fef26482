//! Exchange controller
//!
//! Orchestrates one request/response cycle: builds the request from the
//! conversation history, owns the cancellation token for its duration, and
//! drives the framer/parser/assembler loop over the response body. All
//! network and parse failures are converted to the exchange taxonomy here;
//! nothing escapes as a panic.

use super::{ExchangeError, ExchangeOutcome, ExchangePhase, ResponseAssembler};
use crate::config::ChatConfig;
use crate::conversation::Message;
use crate::sse::{parse_line, LineEvent, LineFramer};
use futures::{Stream, StreamExt};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Where exchange progress lands: the session appends the assistant
/// placeholder on `stream_opened` and overwrites it with each snapshot.
///
/// `Send` because the exchange future is driven from spawned tasks and the
/// sink is held across its awaits.
pub trait ExchangeSink: Send {
    /// The response stream opened; establish the assistant placeholder.
    fn stream_opened(&mut self);
    /// A new full snapshot of the in-flight reply, in delta arrival order.
    fn snapshot(&mut self, text: &str);
}

/// Runs one exchange against the chat proxy.
pub struct ExchangeController<'a> {
    client: &'a Client,
    config: &'a ChatConfig,
}

impl<'a> ExchangeController<'a> {
    pub fn new(client: &'a Client, config: &'a ChatConfig) -> Self {
        Self { client, config }
    }

    /// Drive the exchange to a terminal outcome.
    ///
    /// The conversation history is replayed verbatim, in order. Triggering
    /// the token resolves the next pending await as `Aborted`, never
    /// `Failed`.
    pub async fn run(
        &self,
        history: &[Message],
        token: &CancellationToken,
        sink: &mut dyn ExchangeSink,
    ) -> ExchangeOutcome {
        let body = ChatRequest {
            messages: history
                .iter()
                .map(|message| WireMessage {
                    role: message.role.as_wire(),
                    content: message.content.clone(),
                })
                .collect(),
        };
        tracing::debug!(
            phase = ExchangePhase::Sending.as_str(),
            messages = body.messages.len(),
            "issuing chat request"
        );

        let response = tokio::select! {
            biased;
            () = token.cancelled() => return ExchangeOutcome::Aborted,
            response = self
                .client
                .post(&self.config.endpoint)
                .bearer_auth(&self.config.token)
                .json(&body)
                .send() => match response {
                Ok(response) => response,
                Err(err) => {
                    return ExchangeOutcome::Failed(ExchangeError::TransportInterrupted {
                        detail: err.to_string(),
                    })
                }
            },
        };

        let status = response.status();
        if !status.is_success() {
            let body = tokio::select! {
                biased;
                () = token.cancelled() => return ExchangeOutcome::Aborted,
                body = response.text() => body.ok(),
            };
            let reason = derive_failure_reason(status, body.as_deref());
            return ExchangeOutcome::Failed(ExchangeError::RequestRejected {
                status: status.as_u16(),
                reason,
            });
        }

        tracing::debug!(phase = ExchangePhase::StreamOpen.as_str(), "response accepted");
        sink.stream_opened();

        let stream = std::pin::pin!(response.bytes_stream());
        consume_stream(stream, token, sink).await
    }
}

/// Consume the response body: frame lines, classify them, and publish a
/// snapshot per delta until the sentinel, stream end, cancellation, or a
/// read failure.
async fn consume_stream<S, B, E>(
    mut stream: S,
    token: &CancellationToken,
    sink: &mut dyn ExchangeSink,
) -> ExchangeOutcome
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut framer = LineFramer::new();
    let mut assembler = ResponseAssembler::new();
    let mut streaming = false;

    loop {
        let chunk = tokio::select! {
            biased;
            () = token.cancelled() => {
                tracing::debug!("exchange cancelled; keeping accumulated content");
                return ExchangeOutcome::Aborted;
            }
            chunk = stream.next() => chunk,
        };

        match chunk {
            // Clean stream end without a sentinel: a trailing line without
            // its newline is still processed, not discarded.
            None => {
                if let Some(line) = framer.take_remainder() {
                    match parse_line(&line) {
                        LineEvent::Delta(delta) => sink.snapshot(assembler.apply(&delta)),
                        LineEvent::Done | LineEvent::Ignore | LineEvent::Malformed => {}
                    }
                }
                return ExchangeOutcome::Completed;
            }
            Some(Err(err)) => {
                return ExchangeOutcome::Failed(ExchangeError::TransportInterrupted {
                    detail: err.to_string(),
                });
            }
            Some(Ok(bytes)) => {
                framer.push_chunk(bytes.as_ref());
                while let Some(line) = framer.next_line() {
                    match parse_line(&line) {
                        LineEvent::Ignore => {}
                        LineEvent::Done => return ExchangeOutcome::Completed,
                        LineEvent::Delta(delta) => {
                            if !streaming {
                                streaming = true;
                                tracing::debug!(
                                    phase = ExchangePhase::Streaming.as_str(),
                                    "first delta received"
                                );
                            }
                            sink.snapshot(assembler.apply(&delta));
                        }
                        // The line may have been framed prematurely by a
                        // spurious upstream newline. Re-buffer it and wait
                        // for the next chunk to complete the logical line.
                        LineEvent::Malformed => {
                            tracing::debug!(len = line.len(), "re-buffering undecodable data line");
                            framer.push_back(&line);
                            break;
                        }
                    }
                }
            }
        }
    }
}

/// Failure reason for a rejected request: the proxy's declared `error`
/// field when present, otherwise a synthesized status message.
fn derive_failure_reason(status: StatusCode, body: Option<&str>) -> String {
    body.and_then(|text| serde_json::from_str::<ErrorBody>(text).ok())
        .map(|parsed| parsed.error)
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}
