//! Chat session facade
//!
//! Owns the conversation and the single-exchange guard, publishes events to
//! the rendering consumer, and exposes the cancellation handle. The
//! conversation is mutated only from here, and only while an exchange holds
//! the guard — the consumer treats it as read-only between dispatching a
//! send and observing the terminal outcome.

use crate::config::ChatConfig;
use crate::conversation::{Conversation, Message, MessageId, MessageRole};
use crate::exchange::{ExchangeController, ExchangeOutcome, ExchangeSink};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Event published to the rendering consumer.
///
/// Aborts are silent by design: the accumulated content stays committed and
/// no notification is raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Full snapshot of the in-flight assistant reply. The consumer
    /// overwrites its rendered view rather than patching.
    Snapshot { message: MessageId, text: String },
    /// A user-visible failure notification with the derived reason.
    Failed { reason: String },
}

/// Why a send request was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejection {
    /// Trimmed user text was empty.
    EmptyMessage,
    /// An exchange is already in flight for this conversation.
    ExchangeInFlight,
}

/// Result of a send request.
#[derive(Debug)]
pub enum SendOutcome {
    Rejected(SendRejection),
    Finished(ExchangeOutcome),
}

/// One chat widget session: a conversation plus at most one in-flight
/// exchange. Cheap to clone; clones share state, so a clone can cancel an
/// exchange driven elsewhere.
#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: reqwest::Client,
    config: ChatConfig,
    events: mpsc::UnboundedSender<ChatEvent>,
    state: Mutex<SessionState>,
}

struct SessionState {
    conversation: Conversation,
    /// `Some` while an exchange is in flight; doubles as the exclusivity
    /// guard and the cancellation handle.
    active: Option<CancellationToken>,
}

impl SessionInner {
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChatSession {
    /// Create a session with a welcome-seeded conversation. Returns the
    /// receiving end of the event channel alongside the session.
    pub fn new(config: ChatConfig) -> (Self, mpsc::UnboundedReceiver<ChatEvent>) {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");
        let (events, receiver) = mpsc::unbounded_channel();
        let conversation = Conversation::with_welcome(config.welcome.clone());
        let session = Self {
            inner: Arc::new(SessionInner {
                client,
                config,
                events,
                state: Mutex::new(SessionState {
                    conversation,
                    active: None,
                }),
            }),
        };
        (session, receiver)
    }

    /// Send one user message and drive the exchange to a terminal outcome.
    ///
    /// No-op when the trimmed text is empty or an exchange is in flight.
    /// The user message is committed synchronously before the first await —
    /// that commit is not cancellable. Dropping the returned future releases
    /// the exchange slot; the committed user message stays.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Rejected(SendRejection::EmptyMessage);
        }

        let (history, token) = {
            let mut state = self.inner.state();
            if state.active.is_some() {
                tracing::debug!("send rejected: exchange already in flight");
                return SendOutcome::Rejected(SendRejection::ExchangeInFlight);
            }
            state.conversation.push(MessageRole::User, text);
            let token = CancellationToken::new();
            state.active = Some(token.clone());
            (state.conversation.messages().to_vec(), token)
        };

        // Holds the exchange slot for exactly as long as this future lives,
        // so a caller dropping `send` mid-flight (a timeout wrapper, say)
        // does not leave the session wedged busy.
        let _active = ExchangeGuard { inner: &self.inner };

        let controller = ExchangeController::new(&self.inner.client, &self.inner.config);
        let mut sink = SessionSink {
            inner: &self.inner,
            pending: None,
        };
        let outcome = controller.run(&history, &token, &mut sink).await;

        match &outcome {
            ExchangeOutcome::Completed => {
                tracing::debug!("exchange completed");
            }
            ExchangeOutcome::Aborted => {
                tracing::debug!("exchange aborted by caller");
            }
            ExchangeOutcome::Failed(err) => {
                tracing::warn!(error = %err, "exchange failed");
                let _ = self.inner.events.send(ChatEvent::Failed {
                    reason: err.to_string(),
                });
            }
        }
        SendOutcome::Finished(outcome)
    }

    /// Cancel the in-flight exchange, if any. The next pending read
    /// resolves as `Aborted`; accumulated content stays committed.
    pub fn cancel(&self) {
        let state = self.inner.state();
        if let Some(token) = &state.active {
            token.cancel();
        }
    }

    /// True while an exchange is in flight.
    pub fn is_busy(&self) -> bool {
        self.inner.state().active.is_some()
    }

    /// Snapshot of the conversation log.
    pub fn messages(&self) -> Vec<Message> {
        self.inner.state().conversation.messages().to_vec()
    }
}

/// Releases the single-exchange slot when the exchange ends, including when
/// the driving future is dropped before reaching a terminal outcome.
struct ExchangeGuard<'a> {
    inner: &'a SessionInner,
}

impl Drop for ExchangeGuard<'_> {
    fn drop(&mut self) {
        self.inner.state().active = None;
    }
}

/// Applies exchange progress to the conversation and publishes events.
struct SessionSink<'a> {
    inner: &'a SessionInner,
    pending: Option<MessageId>,
}

impl ExchangeSink for SessionSink<'_> {
    fn stream_opened(&mut self) {
        let mut state = self.inner.state();
        let id = state.conversation.push(MessageRole::Assistant, "");
        self.pending = Some(id);
    }

    fn snapshot(&mut self, text: &str) {
        let Some(id) = self.pending else { return };
        self.inner.state().conversation.set_content(id, text);
        let _ = self.inner.events.send(ChatEvent::Snapshot {
            message: id,
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Callers drive `send` from spawned tasks, so its future must be `Send`.
    #[test]
    fn send_future_is_send() {
        fn assert_send<T: Send>(_: &T) {}
        let (session, _events) = ChatSession::new(ChatConfig::new("http://localhost/chat", "t"));
        let future = session.send("hello");
        assert_send(&future);
    }
}
