//! Streaming chat transport for the MS questionnaire assistant
//!
//! Sends a conversation to the chat proxy and incrementally reconstructs
//! the assistant's reply from a chunked server-sent event stream, publishing
//! a full snapshot of the reply after every delta so a consumer can render
//! tokens as they arrive.
//!
//! At most one exchange is in flight per conversation; a second send while
//! one is running is a no-op. Cancellation is a first-class terminal
//! outcome, distinct from failure, and never raises a notification.

pub mod config;
pub mod conversation;
pub mod exchange;
pub mod session;
pub mod sse;

pub use config::ChatConfig;
pub use conversation::{Conversation, Message, MessageId, MessageRole, WELCOME_MESSAGE};
pub use exchange::{ExchangeError, ExchangeOutcome};
pub use session::{ChatEvent, ChatSession, SendOutcome, SendRejection};
