//! The conversation session and command router.
//!
//! This module provides the interactive loop of the agent.  A line beginning
//! with `/` is a command; anything else is a chat message for the backend.
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`context`]: the ordered turn history replayed to the backend
//! - [`registry`]: the in-memory table of named tool servers
//! - [`commands`]: slash command parsing
//! - [`router`]: command execution against the registry
//! - [`session`]: the send path with its all-or-nothing history update
//! - [`repl`]: the read/dispatch loop tying everything together

pub mod commands;
pub mod context;
pub mod registry;
pub mod repl;
pub mod router;
pub mod session;

pub use commands::{
    COMMAND_MARKER, Command, SERVER_USAGE, ServerCommand, Verb, help_text, parse_command,
    parse_command_body,
};
pub use context::ConversationContext;
pub use registry::ServerRegistry;
pub use repl::{DEFAULT_PROMPT, MAX_CONSECUTIVE_INPUT_ERRORS, SessionLoop, SessionState};
pub use router::{CommandRouter, DEFAULT_WELCOME, GOODBYE, HELP_HINT, Outcome};
pub use session::ChatSession;
