//! Structured event hooks for test progress
//!
//! The measurement components never log on their own. Callers that want
//! progress output pass an observer; every method has a no-op default so
//! implementations only override the events they care about.

use crate::error::AppError;
use crate::models::Server;
use crate::types::Direction;
use std::time::Duration;

/// Receiver for structured measurement events
pub trait TestObserver: Send + Sync {
    /// A candidate server's mean latency was measured
    fn on_server_measured(&self, server: &Server, latency: Duration) {
        let _ = (server, latency);
    }

    /// A candidate server was skipped because it could not be measured
    fn on_server_skipped(&self, server: &Server, error: &AppError) {
        let _ = (server, error);
    }

    /// One throughput sample completed
    fn on_sample(&self, direction: Direction, bytes: u64, elapsed: Duration, mbps: f64) {
        let _ = (direction, bytes, elapsed, mbps);
    }

    /// A sample was excluded from the mean because its elapsed interval
    /// was degenerate (zero or negative)
    fn on_sample_excluded(&self, direction: Direction, bytes: u64, error: &AppError) {
        let _ = (direction, bytes, error);
    }

    /// A sampling run finished
    fn on_run_complete(&self, direction: Direction, samples: u32, mean_mbps: f64) {
        let _ = (direction, samples, mean_mbps);
    }
}

/// Observer that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl TestObserver for NullObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_observer_accepts_all_events() {
        let observer = NullObserver;
        let server = Server::new("1", "h:1");

        observer.on_server_measured(&server, Duration::from_millis(10));
        observer.on_server_skipped(&server, &AppError::connection("refused"));
        observer.on_sample(Direction::Download, 1000, Duration::from_millis(5), 1.6);
        observer.on_sample_excluded(Direction::Upload, 1000, &AppError::timing("zero"));
        observer.on_run_complete(Direction::Download, 3, 10.0);
    }
}
