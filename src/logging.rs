//! Logging initialisation via tracing-subscriber.
//!
//! Logs never go to stdout: the REPL owns that stream.  They go to stderr or to
//! an append-mode file.

use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::error::{Error, Result};

/// Level used when neither the configuration nor `RUST_LOG` says otherwise.
pub const DEFAULT_LEVEL: &str = "warn";

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; `level` is the fallback.  Calling this twice
/// returns an error instead of panicking.
pub fn init(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| {
            Error::config(
                format!("invalid log level '{level}': {e}"),
                Some("app.log_level".to_string()),
            )
        })?;

    let writer = if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                Error::io(
                    format!("failed to open log file '{}'", path.display()),
                    e,
                )
            })?;
        BoxMakeWriter::new(file)
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(log_file.is_none())
        .try_init()
        .map_err(|e| Error::unknown(format!("failed to set subscriber: {e}")))?;

    Ok(())
}

/// Parse a log level string into a [`LevelFilter`], rejecting unknown values.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    if level.is_empty() {
        return Err(Error::config(
            "log level must not be empty",
            Some("app.log_level".to_string()),
        ));
    }
    level.parse::<LevelFilter>().map_err(|_| {
        Error::config(
            format!("unrecognised log level: '{level}'"),
            Some("app.log_level".to_string()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_levels_parse() {
        for l in &["error", "warn", "info", "debug", "trace", "off"] {
            assert!(parse_level(l).is_ok(), "expected '{l}' to be valid");
        }
        assert_eq!(parse_level(DEFAULT_LEVEL).unwrap(), LevelFilter::WARN);
    }

    #[test]
    fn invalid_level_errors() {
        assert!(parse_level("verbose").is_err());
        assert!(parse_level("").is_err());
        assert!(parse_level("INFO_LEVEL").is_err());
    }

    #[test]
    fn second_init_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.log");
        // Another test may have installed a subscriber already; either way the
        // following call must fail without panicking.
        let _ = init("info", Some(&path));
        match init("info", Some(&path)) {
            Err(Error::Unknown { message }) => assert!(message.contains("set subscriber")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
