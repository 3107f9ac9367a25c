//! Command execution.
//!
//! The router owns the server registry and turns parsed commands into output
//! and registry mutations.  Anything that concerns the session as a whole
//! (stopping, forgetting the conversation) is handed back as an [`Outcome`].

use crate::chat::commands::{Command, SERVER_USAGE, ServerCommand, help_text, parse_command_body};
use crate::chat::registry::ServerRegistry;
use crate::observability::{COMMANDS_DISPATCHED, COMMANDS_UNKNOWN};
use crate::render::Renderer;

/// Default first line of the welcome banner.
pub const DEFAULT_WELCOME: &str = "Welcome to Personal Agent CLI!";

/// Second line of the welcome banner.
pub const HELP_HINT: &str = "Type /help for available commands";

/// Line printed when the session ends.
pub const GOODBYE: &str = "Goodbye!";

/// What the session must do after a command ran.
#[must_use]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading input.
    Continue,
    /// Stop the session.
    Exit,
    /// Forget the conversation history, then keep reading.
    ResetConversation,
}

/// Dispatches marker-stripped command lines.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    registry: ServerRegistry,
    welcome: String,
}

impl CommandRouter {
    /// Creates a router managing `registry`.
    pub fn new(registry: ServerRegistry) -> Self {
        Self {
            registry,
            welcome: DEFAULT_WELCOME.to_string(),
        }
    }

    /// Replace the first line of the welcome banner.
    pub fn with_welcome(mut self, welcome: impl Into<String>) -> Self {
        self.welcome = welcome.into();
        self
    }

    /// The registry this router manages.
    pub fn registry(&self) -> &ServerRegistry {
        &self.registry
    }

    /// Print the welcome banner and the help hint.
    pub fn show_welcome(&self, renderer: &mut dyn Renderer) {
        renderer.print_line(&self.welcome);
        renderer.print_line(HELP_HINT);
    }

    /// Print every command and the server usage lines.
    pub fn show_help(&self, renderer: &mut dyn Renderer) {
        for line in help_text().lines() {
            renderer.print_line(line);
        }
    }

    /// Run one command; `line` has the marker already stripped.
    ///
    /// Never fails: malformed input is answered with usage text.
    pub fn dispatch(&mut self, line: &str, renderer: &mut dyn Renderer) -> Outcome {
        COMMANDS_DISPATCHED.click();
        let command = parse_command_body(line);
        tracing::debug!(?command, "dispatching command");
        self.execute(command, renderer)
    }

    /// Run an already-parsed command.
    pub fn execute(&mut self, command: Command, renderer: &mut dyn Renderer) -> Outcome {
        match command {
            Command::Empty => {
                renderer.print_line("No command entered.");
            }
            Command::Help => self.show_help(renderer),
            Command::Exit => {
                renderer.print_line(GOODBYE);
                return Outcome::Exit;
            }
            Command::Clear => {
                renderer.clear_screen();
                self.show_welcome(renderer);
            }
            Command::Reset => {
                renderer.print_info("Conversation cleared.");
                return Outcome::ResetConversation;
            }
            Command::Server(server) => self.execute_server(server, renderer),
            Command::Unknown(verb) => {
                COMMANDS_UNKNOWN.click();
                renderer.print_line(&format!("Unknown command: {verb}"));
                renderer.print_line("Available commands:");
                self.show_help(renderer);
            }
        }
        Outcome::Continue
    }

    fn execute_server(&mut self, command: ServerCommand, renderer: &mut dyn Renderer) {
        match command {
            ServerCommand::Add { name, url } => {
                if self.registry.add(&name, url) {
                    renderer.print_info(&format!("服务器 {name} 添加成功"));
                } else {
                    renderer.print_info("名称重复，添加失败");
                }
            }
            ServerCommand::List => {
                let servers = self.registry.list();
                if servers.is_empty() {
                    renderer.print_info("没有服务器可用");
                } else {
                    renderer.print_info("服务器列表：");
                    for server in servers {
                        renderer.print_line(&format!("- {}: {}", server.name, server.url));
                    }
                }
            }
            ServerCommand::Remove { name } => {
                if self.registry.remove(&name) {
                    renderer.print_info(&format!("服务器 {name} 已删除"));
                } else {
                    renderer.print_info("没有这样的服务器");
                }
            }
            ServerCommand::Info { name } => match self.registry.get(&name) {
                Some(server) => {
                    renderer.print_line(&format!("服务器名称: {}", server.name));
                    renderer.print_line(&format!("服务器地址: {}", server.url));
                }
                None => renderer.print_info("没有这样的服务器"),
            },
            ServerCommand::Edit { name, url } => {
                if self.registry.edit(&name, url) {
                    renderer.print_info(&format!("服务器 {name} 地址已更新"));
                } else {
                    renderer.print_info("没有这样的服务器");
                }
            }
            ServerCommand::Usage(usage) => renderer.print_line(usage),
            ServerCommand::InvalidUrl(url) => {
                renderer.print_line(&format!("Invalid URL: {url}"));
                renderer.print_line("URLs must be absolute, e.g. http://localhost:8000");
            }
            ServerCommand::Missing => renderer.print_line(SERVER_USAGE),
            ServerCommand::UnknownSubcommand(subverb) => {
                renderer.print_line(&format!("未知子命令: {subverb}"));
                renderer.print_line(SERVER_USAGE);
            }
        }
    }
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::new(ServerRegistry::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CaptureRenderer;

    fn run(router: &mut CommandRouter, line: &str) -> (Outcome, CaptureRenderer) {
        let mut renderer = CaptureRenderer::new();
        let outcome = router.dispatch(line, &mut renderer);
        (outcome, renderer)
    }

    #[test]
    fn help_is_case_insensitive() {
        let mut router = CommandRouter::default();
        let (_, lower) = run(&mut router, "help");
        let (_, upper) = run(&mut router, "HELP");
        assert_eq!(lower.lines(), upper.lines());
        assert!(lower.contains("Available CLI commands:"));
        assert!(lower.contains("/help"));
        assert!(lower.contains("/exit"));
        assert!(lower.contains("/clear"));
        assert!(lower.contains("/server"));
    }

    #[test]
    fn exit_says_goodbye() {
        let mut router = CommandRouter::default();
        let (outcome, out) = run(&mut router, "exit");
        assert_eq!(outcome, Outcome::Exit);
        assert_eq!(out.lines(), vec![GOODBYE.to_string()]);
    }

    #[test]
    fn clear_reemits_banner() {
        let mut router = CommandRouter::default().with_welcome("Hi there");
        let (outcome, out) = run(&mut router, "clear");
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(
            out.lines(),
            vec![
                CaptureRenderer::CLEAR_MARKER.to_string(),
                "Hi there".to_string(),
                HELP_HINT.to_string(),
            ]
        );
    }

    #[test]
    fn reset_requests_conversation_reset() {
        let mut router = CommandRouter::default();
        let (outcome, out) = run(&mut router, "reset");
        assert_eq!(outcome, Outcome::ResetConversation);
        assert!(out.contains("Conversation cleared."));
    }

    #[test]
    fn unknown_command_lists_help() {
        let mut router = CommandRouter::default();
        let (outcome, out) = run(&mut router, "frobnicate");
        assert_eq!(outcome, Outcome::Continue);
        let lines = out.lines();
        assert_eq!(lines[0], "Unknown command: frobnicate");
        assert_eq!(lines[1], "Available commands:");
        assert_eq!(lines[2], "Available CLI commands:");
    }

    #[test]
    fn empty_command() {
        let mut router = CommandRouter::default();
        let (outcome, out) = run(&mut router, "   ");
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(out.lines(), vec!["No command entered.".to_string()]);
    }

    #[test]
    fn server_lifecycle() {
        let mut router = CommandRouter::default();

        let (_, out) = run(&mut router, "server list");
        assert!(out.contains("没有服务器可用"));

        let (_, out) = run(&mut router, "server add test http://localhost:8000");
        assert!(out.contains("test"));
        assert!(out.contains("添加成功"));

        let (_, out) = run(&mut router, "server add test http://localhost:9000");
        assert!(out.contains("名称重复，添加失败"));
        assert_eq!(
            router.registry().get("test").unwrap().url.as_str(),
            "http://localhost:8000"
        );

        let (_, out) = run(&mut router, "server list");
        assert!(out.contains("- test: http://localhost:8000"));

        let (_, out) = run(&mut router, "server edit test http://localhost:9000");
        assert!(out.contains("地址已更新"));

        let (_, out) = run(&mut router, "server info test");
        assert!(out.contains("服务器名称: test"));
        assert!(out.contains("服务器地址: http://localhost:9000"));

        let (_, out) = run(&mut router, "server remove test");
        assert!(out.contains("已删除"));
        assert!(router.registry().is_empty());
    }

    #[test]
    fn server_not_found_messages() {
        let mut router = CommandRouter::default();
        for line in [
            "server remove ghost",
            "server info ghost",
            "server edit ghost http://localhost:1",
        ] {
            let (_, out) = run(&mut router, line);
            assert!(out.contains("没有这样的服务器"), "{line}");
        }
        assert!(router.registry().is_empty());
    }

    #[test]
    fn server_usage_without_mutation() {
        let mut router = CommandRouter::default();
        let (_, out) = run(&mut router, "server add lonely");
        assert!(out.contains("Usage: /server add <name> <url>"));
        let (_, out) = run(&mut router, "server add bad not-a-url");
        assert!(out.contains("Invalid URL: not-a-url"));
        let (_, out) = run(&mut router, "server");
        assert!(out.contains(SERVER_USAGE));
        let (_, out) = run(&mut router, "server Launch");
        assert!(out.contains("未知子命令: Launch"));
        assert!(out.contains(SERVER_USAGE));
        assert!(router.registry().is_empty());
    }

    #[test]
    fn server_subverb_case_insensitive() {
        let mut router = CommandRouter::default();
        let (_, out) = run(&mut router, "Server ADD s1 https://tools.example.com");
        assert!(out.contains("添加成功"));
        assert!(router.registry().get("s1").is_some());
    }
}
