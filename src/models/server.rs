//! Candidate server data model

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A candidate speed-test endpoint from the server directory.
///
/// Servers are read-only once constructed; latency measured during
/// selection lives in a separate [`ServerLatency`] pairing rather than a
/// mutable field on the server itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Directory-assigned identifier
    pub id: String,

    /// Endpoint address in `host:port` form
    pub host: String,

    /// Display name (usually the city)
    pub name: String,

    /// Operator of the server
    pub sponsor: String,

    /// Country the server is located in
    pub country: String,
}

impl Server {
    /// Create a server with only the fields the test path needs
    pub fn new<S: Into<String>>(id: S, host: S) -> Self {
        Self {
            id: id.into(),
            host: host.into(),
            name: String::new(),
            sponsor: String::new(),
            country: String::new(),
        }
    }

    /// One-line description for display
    pub fn describe(&self) -> String {
        if self.name.is_empty() && self.sponsor.is_empty() {
            format!("#{} ({})", self.id, self.host)
        } else {
            format!("#{} {} — {} ({})", self.id, self.name, self.sponsor, self.host)
        }
    }
}

/// An immutable (server, latency) measurement produced during selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerLatency {
    /// The measured server
    pub server: Server,

    /// Mean round-trip time over the configured probe count
    pub latency: Duration,
}

impl ServerLatency {
    pub fn new(server: Server, latency: Duration) -> Self {
        Self { server, latency }
    }

    /// Latency in fractional milliseconds for display
    pub fn latency_ms(&self) -> f64 {
        self.latency.as_secs_f64() * 1000.0
    }
}
