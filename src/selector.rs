//! Best-server selection by round-trip latency

use crate::error::{AppError, Result};
use crate::models::{Config, Server, ServerLatency};
use crate::observer::TestObserver;
use crate::probe;
use crate::protocol::Connector;

/// Parameters for a selection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Round-trip probes issued per candidate
    pub probe_count: u32,

    /// Skip candidates that cannot be connected or probed instead of
    /// failing the whole selection
    pub skip_unreachable: bool,
}

impl SelectorConfig {
    pub fn new(probe_count: u32, skip_unreachable: bool) -> Self {
        Self {
            probe_count,
            skip_unreachable,
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            probe_count: crate::defaults::DEFAULT_PROBE_COUNT,
            skip_unreachable: true,
        }
    }
}

impl From<&Config> for SelectorConfig {
    fn from(config: &Config) -> Self {
        Self {
            probe_count: config.probe_count,
            skip_unreachable: config.skip_unreachable,
        }
    }
}

/// Result of a selection pass: the winner plus every measurement taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The lowest-latency candidate
    pub best: ServerLatency,

    /// All successful measurements, in candidate order
    pub measured: Vec<ServerLatency>,

    /// Candidates that could not be measured
    pub skipped: Vec<Server>,
}

/// Pick the candidate with the lowest mean round-trip latency.
///
/// Candidates are probed in input order. Comparison is strict less-than,
/// so a later candidate tying the current minimum does not replace it and
/// the first server at the minimum wins. Latency lands in an immutable
/// (server, latency) pairing; the input servers are never mutated.
///
/// An unreachable candidate is skipped (and reported via the observer)
/// when `skip_unreachable` is set, otherwise its error aborts the whole
/// selection. Selection fails when no candidate could be measured.
pub async fn select_best_server(
    servers: &[Server],
    connector: &dyn Connector,
    config: &SelectorConfig,
    observer: &dyn TestObserver,
) -> Result<Selection> {
    if servers.is_empty() {
        return Err(AppError::selection("No candidate servers to probe"));
    }

    let mut measured: Vec<ServerLatency> = Vec::with_capacity(servers.len());
    let mut skipped: Vec<Server> = Vec::new();
    let mut best: Option<ServerLatency> = None;

    for server in servers {
        let latency = match probe_one(server, connector, config.probe_count).await {
            Ok(latency) => latency,
            Err(err) if config.skip_unreachable => {
                observer.on_server_skipped(server, &err);
                skipped.push(server.clone());
                continue;
            }
            Err(err) => return Err(err),
        };

        observer.on_server_measured(server, latency);
        let pair = ServerLatency::new(server.clone(), latency);
        measured.push(pair.clone());

        let replace = match &best {
            Some(current) => latency < current.latency,
            None => true,
        };
        if replace {
            best = Some(pair);
        }
    }

    match best {
        Some(best) => Ok(Selection {
            best,
            measured,
            skipped,
        }),
        None => Err(AppError::selection(format!(
            "None of the {} candidate servers could be measured",
            servers.len()
        ))),
    }
}

async fn probe_one(
    server: &Server,
    connector: &dyn Connector,
    probe_count: u32,
) -> Result<std::time::Duration> {
    let mut conn = connector.connect(&server.host).await?;
    probe::measure_rtt(conn.as_mut(), probe_count).await
}
