use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Role of the party that produced a turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing at the terminal.
    User,

    /// The chat backend.
    Assistant,
}

impl Role {
    /// The wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged message of a conversation.
///
/// A turn never holds empty (or whitespace-only) content and cannot be changed
/// once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    /// Create a turn, rejecting blank content.
    pub fn new(role: Role, content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(Error::validation(
                format!("{role} turn must not be empty"),
                Some("content".to_string()),
            ));
        }
        Ok(Self { role, content })
    }

    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Result<Self> {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Result<Self> {
        Self::new(Role::Assistant, content)
    }

    /// The role that produced this turn.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The text of this turn.
    pub fn content(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_content_rejected() {
        assert!(Turn::user("").is_err());
        assert!(Turn::assistant("  \n\t").is_err());
        let err = Turn::user(" ").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn content_kept_verbatim() {
        let turn = Turn::user("  hello  ").unwrap();
        assert_eq!(turn.role(), Role::User);
        assert_eq!(turn.content(), "  hello  ");
    }

    #[test]
    fn serializes_with_lowercase_role() {
        let turn = Turn::assistant("hi").unwrap();
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
