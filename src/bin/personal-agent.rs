//! Interactive command-line agent.
//!
//! # Usage
//!
//! ```bash
//! # Use config/config.yaml if present, defaults otherwise
//! personal-agent
//!
//! # Try the command surface without credentials
//! personal-agent --mock
//!
//! # Pick a config file and model
//! personal-agent --config ~/agent.yaml --model qwen-max
//!
//! # Disable colors (useful for piping output)
//! personal-agent --no-color
//! ```
//!
//! # Commands
//!
//! - `/help` - Show available commands
//! - `/clear` - Clear the screen
//! - `/reset` - Forget the conversation
//! - `/server add|list|remove|info|edit` - Manage tool servers
//! - `/exit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;

use personal_agent::chat::{ChatSession, CommandRouter, ServerRegistry, SessionLoop};
use personal_agent::{AgentArgs, AgentConfig, PlainTextRenderer, RustylineReader, logging};

/// Main entry point for the personal-agent application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = AgentArgs::from_command_line_relaxed("personal-agent [OPTIONS]");
    if !free.is_empty() {
        eprintln!("unexpected arguments: {}", free.join(" "));
        std::process::exit(2);
    }

    let config = AgentConfig::load(&args)?;
    logging::init(&config.app.log_level, config.app.log_file.as_deref())?;
    tracing::info!(
        name = %config.app.name,
        version = %config.app.version,
        environment = %config.app.environment,
        "starting"
    );

    let backend = config.build_backend()?;
    let reader = RustylineReader::new()?;
    let renderer = PlainTextRenderer::with_color(config.cli.color);

    // Ctrl-C outside the prompt is deferred until the in-flight call finishes.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    let router =
        CommandRouter::new(ServerRegistry::new()).with_welcome(config.cli.welcome_message.clone());
    let mut session = SessionLoop::new(
        ChatSession::new(backend),
        router,
        Box::new(reader),
        Box::new(renderer),
    )
    .with_prompt(config.cli.prompt.clone())
    .with_interrupt_flag(interrupted);

    session.start().await;
    Ok(())
}
