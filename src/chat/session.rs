//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which manages conversation
//! state and forwards it to a [`ChatBackend`].

use std::time::Instant;

use crate::backend::ChatBackend;
use crate::chat::context::ConversationContext;
use crate::error::{Error, Result};
use crate::observability::{CHAT_FAILURES, CHAT_TURN_DURATION, CHAT_TURNS};
use crate::types::Turn;

/// A conversation with one backend.
///
/// The session owns its history exclusively.  An exchange is recorded only
/// after the backend answered, so a failed call leaves the history untouched.
pub struct ChatSession<B: ChatBackend> {
    backend: B,
    context: ConversationContext,
}

impl<B: ChatBackend> ChatSession<B> {
    /// Creates a new chat session talking to `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            context: ConversationContext::new(),
        }
    }

    /// The backend this session talks to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Sends a user message and returns the assistant's reply.
    ///
    /// The backend sees the full history followed by `message`.  On success the
    /// history grows by exactly two turns: `message`, then the reply.
    ///
    /// # Errors
    ///
    /// Any backend failure is returned as [`Error::Connection`] wrapping the
    /// original error; the history is left as it was.  A blank `message` is
    /// rejected as a validation error without contacting the backend.
    pub async fn send(&mut self, message: &str) -> Result<String> {
        let user = Turn::user(message)?;
        let outbound = self.context.with_pending(&user);

        let start = Instant::now();
        let result = self.backend.reply(&outbound).await;
        CHAT_TURN_DURATION.add(start.elapsed().as_secs_f64());

        let reply = result.and_then(Turn::assistant).map_err(|err| {
            CHAT_FAILURES.click();
            tracing::warn!(error = %err, "chat backend call failed");
            Error::connection(
                format!("Failed to send message: {err}"),
                Some(Box::new(err)),
            )
        })?;

        CHAT_TURNS.click();
        let text = reply.content().to_string();
        self.context.record_exchange(user, reply);
        Ok(text)
    }

    /// The conversation so far, oldest first.
    pub fn context(&self) -> &[Turn] {
        self.context.turns()
    }

    /// Forgets the conversation; later sends start afresh.
    pub fn clear_context(&mut self) {
        self.context.clear();
    }

    /// Returns the number of turns in the conversation.
    pub fn message_count(&self) -> usize {
        self.context.len()
    }
}
