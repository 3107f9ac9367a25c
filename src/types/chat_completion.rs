use serde::{Deserialize, Serialize};

use crate::types::Turn;

/// Request body for an OpenAI-compatible `chat/completions` call.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    /// Model identifier.
    pub model: &'a str,

    /// The full conversation, oldest first.
    pub messages: &'a [Turn],

    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens in the reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Response body of a `chat/completions` call.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated alternatives; only the first is used.
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

/// One alternative of a completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    /// The generated message.
    pub message: ChatCompletionMessage,
}

/// The generated assistant message.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionMessage {
    /// Role reported by the server.
    #[serde(default)]
    pub role: Option<String>,

    /// Reply text; some providers send `null` for tool-only replies.
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// The text of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}
