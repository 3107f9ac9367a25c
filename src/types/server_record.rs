use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{Error, Result};

/// An absolute URL of a remote tool server.
///
/// The text is kept exactly as the user typed it; parsing only checks that a
/// scheme and a network location are present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerUrl {
    text: String,
}

impl ServerUrl {
    /// Validate `text` as an absolute URL with a host.
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = Url::parse(text)?;
        if !parsed.has_host() {
            return Err(Error::url(
                format!("URL has no network location: {text}"),
                None,
            ));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    /// The URL as originally written.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for ServerUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ServerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A named reference to a remote tool server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerRecord {
    /// Unique name of the server within a registry.
    pub name: String,

    /// Where the server lives.
    pub url: ServerUrl,
}

impl ServerRecord {
    /// Create a new record.
    pub fn new(name: impl Into<String>, url: ServerUrl) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}
