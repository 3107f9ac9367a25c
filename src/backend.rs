//! The chat backend capability.
//!
//! A backend turns an ordered list of turns into one reply.  The session never
//! cares how; it only replays the conversation and records what comes back.

use crate::error::{Error, Result};
use crate::types::{Role, Turn};

/// Something that can answer a conversation.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Produce the assistant reply to `messages`, oldest first.
    ///
    /// The last element is the user turn being answered.
    async fn reply(&self, messages: &[Turn]) -> Result<String>;

    /// A short human-readable description, used in the welcome line and logs.
    fn describe(&self) -> String {
        "chat backend".to_string()
    }
}

#[async_trait::async_trait]
impl<B: ChatBackend + ?Sized> ChatBackend for Box<B> {
    async fn reply(&self, messages: &[Turn]) -> Result<String> {
        (**self).reply(messages).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Offline backend that echoes the last user message.
///
/// Useful for trying the command surface without credentials.
#[derive(Debug, Clone, Default)]
pub struct MockBackend;

impl MockBackend {
    /// Create a mock backend.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ChatBackend for MockBackend {
    async fn reply(&self, messages: &[Turn]) -> Result<String> {
        let last = messages
            .iter()
            .rev()
            .find(|turn| turn.role() == Role::User)
            .ok_or_else(|| {
                Error::validation("no user message to answer", Some("messages".to_string()))
            })?;
        Ok(format!("This is a mock response to: {}", last.content()))
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
