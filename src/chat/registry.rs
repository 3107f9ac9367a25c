//! In-memory registry of named tool-server endpoints.
//!
//! Names are unique and case-sensitive.  Duplicate and missing names are normal
//! outcomes reported through `bool`/`Option` returns, never as errors.

use crate::types::{ServerRecord, ServerUrl};

/// Process-lifetime store of [`ServerRecord`]s keyed by name.
///
/// Listing order is insertion order.
#[derive(Debug, Default, Clone)]
pub struct ServerRegistry {
    servers: Vec<ServerRecord>,
}

impl ServerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new server.
    ///
    /// Returns `false`, leaving the registry untouched, if `name` is taken.
    pub fn add(&mut self, name: &str, url: ServerUrl) -> bool {
        if self.position(name).is_some() {
            return false;
        }
        self.servers.push(ServerRecord::new(name, url));
        tracing::info!(server = name, "server added");
        true
    }

    /// Delete a server by name; `false` if absent.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.servers.remove(index);
                tracing::info!(server = name, "server removed");
                true
            }
            None => false,
        }
    }

    /// Replace the URL of an existing server; `false` if absent.
    pub fn edit(&mut self, name: &str, url: ServerUrl) -> bool {
        match self.position(name) {
            Some(index) => {
                self.servers[index].url = url;
                tracing::info!(server = name, "server updated");
                true
            }
            None => false,
        }
    }

    /// Look up a server by name.
    pub fn get(&self, name: &str) -> Option<&ServerRecord> {
        self.position(name).map(|index| &self.servers[index])
    }

    /// A snapshot of every registered server.
    pub fn list(&self) -> Vec<ServerRecord> {
        self.servers.clone()
    }

    /// Number of registered servers.
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// True when no servers are registered.
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.servers.iter().position(|server| server.name == name)
    }
}
