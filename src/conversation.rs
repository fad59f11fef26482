//! Conversation store
//!
//! Ordered log of messages replayed verbatim to the proxy as dialogue
//! history. Message identity is the ordinal position in the log; content is
//! mutable only while a message is the in-flight assistant reply.

/// Welcome message seeded into every new conversation.
pub const WELCOME_MESSAGE: &str = "👋 Hello! I'm here to help you with the questionnaire. \
If you have any questions about filling in the form, understanding specific fields, \
or need clarification on medical terminology, feel free to ask!";

/// Ordinal identity of a message within its conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(usize);

impl MessageId {
    /// Position of the message in the conversation log.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Role string as it appears on the wire.
    pub fn as_wire(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Message in a conversation
#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub role: MessageRole,
    pub content: String,
}

/// Append-only log of messages for one chat widget session.
///
/// Insertion order is semantically significant: the whole log is sent as
/// dialogue history with every exchange. The store is not persisted; it
/// lives and dies with the session.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Empty conversation (no seeded welcome).
    pub fn new() -> Self {
        Self::default()
    }

    /// Conversation seeded with an assistant welcome message.
    pub fn with_welcome(welcome: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.push(MessageRole::Assistant, welcome);
        conversation
    }

    /// Append a message; returns its ordinal id.
    pub fn push(&mut self, role: MessageRole, content: impl Into<String>) -> MessageId {
        let id = MessageId(self.messages.len());
        self.messages.push(Message {
            id,
            role,
            content: content.into(),
        });
        id
    }

    /// Overwrite the content of a message with a new snapshot.
    ///
    /// Only the in-flight assistant reply is ever updated this way; the
    /// exchange controller is the sole caller.
    pub fn set_content(&mut self, id: MessageId, snapshot: &str) {
        if let Some(message) = self.messages.get_mut(id.index()) {
            message.content.clear();
            message.content.push_str(snapshot);
        }
    }

    pub fn content_of(&self, id: MessageId) -> Option<&str> {
        self.messages.get(id.index()).map(|m| m.content.as_str())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
