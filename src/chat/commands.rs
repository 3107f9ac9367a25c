//! Slash command parsing for the chat application.
//!
//! This module turns the text after the `/` marker into a [`Command`].  It never
//! executes anything; see [`crate::chat::CommandRouter`] for that.

use std::str::FromStr;

use crate::types::ServerUrl;

/// The character that marks a line as a command rather than a chat message.
pub const COMMAND_MARKER: char = '/';

/// Usage line for the `server` command family.
pub const SERVER_USAGE: &str = "Usage: /server <add|list|remove|info|edit> ...";

/// A top-level command verb.
///
/// Lookup is case-insensitive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Print the command listing.
    Help,
    /// End the session.
    Exit,
    /// Clear the terminal viewport.
    Clear,
    /// Forget the conversation history.
    Reset,
    /// Manage tool servers.
    Server,
}

impl Verb {
    /// Every verb, in help order.
    pub const ALL: [Verb; 5] = [
        Verb::Help,
        Verb::Exit,
        Verb::Clear,
        Verb::Reset,
        Verb::Server,
    ];

    /// The verb as typed after the marker.
    pub fn name(&self) -> &'static str {
        match self {
            Verb::Help => "help",
            Verb::Exit => "exit",
            Verb::Clear => "clear",
            Verb::Reset => "reset",
            Verb::Server => "server",
        }
    }
}

impl FromStr for Verb {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "help" => Ok(Verb::Help),
            "exit" => Ok(Verb::Exit),
            "clear" => Ok(Verb::Clear),
            "reset" => Ok(Verb::Reset),
            "server" => Ok(Verb::Server),
            _ => Err(()),
        }
    }
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// The marker with nothing after it.
    Empty,
    /// Display help information.
    Help,
    /// Exit the chat application.
    Exit,
    /// Clear the terminal and show the welcome banner again.
    Clear,
    /// Clear the conversation history.
    Reset,
    /// A `server` sub-command.
    Server(ServerCommand),
    /// An unrecognised verb, as typed.
    Unknown(String),
}

/// A parsed `server` sub-command.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerCommand {
    /// Register a server.
    Add {
        /// Server name.
        name: String,
        /// Server address.
        url: ServerUrl,
    },
    /// List all servers.
    List,
    /// Delete a server.
    Remove {
        /// Server name.
        name: String,
    },
    /// Show one server.
    Info {
        /// Server name.
        name: String,
    },
    /// Change the URL of a server.
    Edit {
        /// Server name.
        name: String,
        /// New server address.
        url: ServerUrl,
    },
    /// Too few arguments; carries the usage line to print.
    Usage(&'static str),
    /// The URL argument did not parse as an absolute URL.
    InvalidUrl(String),
    /// No sub-verb was given.
    Missing,
    /// The sub-verb was not recognised, as typed.
    UnknownSubcommand(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(Command)` if the input starts with the command marker,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use personal_agent::chat::{parse_command, Command};
/// assert_eq!(parse_command("/exit"), Some(Command::Exit));
/// assert_eq!(parse_command("/HELP"), Some(Command::Help));
/// assert!(parse_command("Hello!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<Command> {
    let input = input.trim();
    let rest = input.strip_prefix(COMMAND_MARKER)?;
    Some(parse_command_body(rest))
}

/// Parses the text after the command marker.
pub fn parse_command_body(body: &str) -> Command {
    let mut parts = body.split_whitespace();
    let Some(verb) = parts.next() else {
        return Command::Empty;
    };
    let args: Vec<&str> = parts.collect();

    match verb.parse::<Verb>() {
        Ok(Verb::Help) => Command::Help,
        Ok(Verb::Exit) => Command::Exit,
        Ok(Verb::Clear) => Command::Clear,
        Ok(Verb::Reset) => Command::Reset,
        Ok(Verb::Server) => Command::Server(parse_server_command(&args)),
        Err(()) => Command::Unknown(verb.to_string()),
    }
}

fn parse_server_command(args: &[&str]) -> ServerCommand {
    let Some((subverb, rest)) = args.split_first() else {
        return ServerCommand::Missing;
    };

    match subverb.to_lowercase().as_str() {
        "add" => match rest {
            [name, url, ..] => match ServerUrl::parse(url) {
                Ok(url) => ServerCommand::Add {
                    name: name.to_string(),
                    url,
                },
                Err(_) => ServerCommand::InvalidUrl(url.to_string()),
            },
            _ => ServerCommand::Usage("Usage: /server add <name> <url>"),
        },
        "list" => ServerCommand::List,
        "remove" => match rest {
            [name, ..] => ServerCommand::Remove {
                name: name.to_string(),
            },
            _ => ServerCommand::Usage("Usage: /server remove <name>"),
        },
        "info" => match rest {
            [name, ..] => ServerCommand::Info {
                name: name.to_string(),
            },
            _ => ServerCommand::Usage("Usage: /server info <name>"),
        },
        "edit" => match rest {
            [name, url, ..] => match ServerUrl::parse(url) {
                Ok(url) => ServerCommand::Edit {
                    name: name.to_string(),
                    url,
                },
                Err(_) => ServerCommand::InvalidUrl(url.to_string()),
            },
            _ => ServerCommand::Usage("Usage: /server edit <name> <url>"),
        },
        _ => ServerCommand::UnknownSubcommand(subverb.to_string()),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> String {
    let mut text = String::from("Available CLI commands:\n");
    for verb in Verb::ALL {
        text.push(COMMAND_MARKER);
        text.push_str(verb.name());
        text.push('\n');
    }
    text.push_str(
        r#"
Server management:
  /server add <name> <url>     添加服务器
  /server list                 列出所有服务器
  /server remove <name>        删除服务器
  /server info <name>          查看服务器详情
  /server edit <name> <url>    编辑服务器"#,
    );
    text
}
