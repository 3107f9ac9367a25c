// Public modules
pub mod backend;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod observability;
pub mod render;
pub mod types;

// Re-exports
pub use backend::{ChatBackend, MockBackend};
pub use client::OpenAiCompatible;
pub use config::{AgentArgs, AgentConfig};
pub use error::{Error, Result};
pub use input::{InputEvent, LineReader, RustylineReader, ScriptedReader};
pub use render::{CaptureRenderer, PlainTextRenderer, Renderer};
pub use types::*;
