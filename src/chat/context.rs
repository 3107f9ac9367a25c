//! Conversation history.

use crate::types::Turn;

/// Ordered, append-only history of one conversation.
///
/// Insertion order is conversation order and is replayed verbatim to the chat
/// backend.  Turns are only ever appended as a complete user/assistant
/// exchange, so a failed exchange leaves no trace.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversationContext {
    turns: Vec<Turn>,
}

impl ConversationContext {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// The turns so far, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns recorded.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when no turns have been recorded.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The outbound message list for `next`: history plus the new user turn.
    pub fn with_pending(&self, next: &Turn) -> Vec<Turn> {
        let mut messages = Vec::with_capacity(self.turns.len() + 1);
        messages.extend_from_slice(&self.turns);
        messages.push(next.clone());
        messages
    }

    /// Append a completed exchange.
    pub fn record_exchange(&mut self, user: Turn, assistant: Turn) {
        self.turns.reserve(2);
        self.turns.push(user);
        self.turns.push(assistant);
    }

    /// Forget every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
