//! Transport configuration

use crate::conversation::WELCOME_MESSAGE;

/// Configuration for the chat transport.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Proxy endpoint receiving the POSTed conversation.
    pub endpoint: String,
    /// Bearer token supplied by the hosting environment; opaque here.
    pub token: String,
    /// Seeded assistant welcome message.
    pub welcome: String,
}

impl ChatConfig {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            welcome: WELCOME_MESSAGE.to_string(),
        }
    }

    /// Read configuration from the environment. Returns `None` when the
    /// endpoint or token is missing.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("MSQ_CHAT_URL").ok()?;
        let token = std::env::var("MSQ_API_TOKEN").ok()?;
        let welcome =
            std::env::var("MSQ_WELCOME").unwrap_or_else(|_| WELCOME_MESSAGE.to_string());
        Some(Self {
            endpoint,
            token,
            welcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_to_product_welcome() {
        let config = ChatConfig::new("http://localhost/chat", "token");
        assert_eq!(config.welcome, WELCOME_MESSAGE);
    }
}
