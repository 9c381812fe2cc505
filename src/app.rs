//! Main test orchestration
//!
//! Composes the collaborators top-down: directory lookup, best-server
//! selection, then one connection to the winner for the download and
//! upload sampling runs. Components run sequentially; nothing here is
//! shared across concurrent callers.

use crate::{
    directory::{HttpServerDirectory, ServerDirectory},
    error::{AppError, Result},
    models::{Config, Server, ServerLatency},
    observer::{NullObserver, TestObserver},
    protocol::{Connector, TcpConnector},
    sampler::{self, SamplerConfig, ThroughputSummary},
    selector::{self, SelectorConfig},
    types::Direction,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete outcome of one speed test run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedTestReport {
    /// The server the throughput tests ran against
    pub server: Server,

    /// Mean round-trip latency measured during selection
    pub latency: Duration,

    /// Download sampling summary, absent in ping-only runs
    pub download: Option<ThroughputSummary>,

    /// Upload sampling summary, absent in ping-only runs
    pub upload: Option<ThroughputSummary>,

    /// Every per-server latency measurement taken during selection
    pub measurements: Vec<ServerLatency>,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run completed
    pub completed_at: DateTime<Utc>,
}

impl SpeedTestReport {
    /// Latency in fractional milliseconds for display
    pub fn latency_ms(&self) -> f64 {
        self.latency.as_secs_f64() * 1000.0
    }
}

/// Coordinates one full speed test
pub struct SpeedTest {
    config: Config,
    directory: Box<dyn ServerDirectory>,
    connector: Box<dyn Connector>,
    observer: Box<dyn TestObserver>,
}

impl SpeedTest {
    /// Create a speed test with the production collaborators
    pub fn new(config: Config) -> Self {
        let directory = Box::new(HttpServerDirectory::from_config(&config));
        Self::with_collaborators(config, directory, Box::new(TcpConnector::new()), Box::new(NullObserver))
    }

    /// Create a speed test with explicit collaborators
    pub fn with_collaborators(
        config: Config,
        directory: Box<dyn ServerDirectory>,
        connector: Box<dyn Connector>,
        observer: Box<dyn TestObserver>,
    ) -> Self {
        Self {
            config,
            directory,
            connector,
            observer,
        }
    }

    /// Run the full test: select the best server, then sample download
    /// and upload throughput over a single connection to it.
    pub async fn run(&self) -> Result<SpeedTestReport> {
        let started_at = Utc::now();
        self.config.validate()?;

        let candidates = self.candidates().await?;
        let selection = selector::select_best_server(
            &candidates,
            self.connector.as_ref(),
            &SelectorConfig::from(&self.config),
            self.observer.as_ref(),
        )
        .await?;
        let best = selection.best;

        let (download, upload) = if self.config.ping_only {
            (None, None)
        } else {
            let mut conn = self.connector.connect(&best.server.host).await?;
            let sampler_config = SamplerConfig::from(&self.config);

            let download = sampler::run(
                conn.as_mut(),
                Direction::Download,
                &sampler_config,
                self.observer.as_ref(),
            )
            .await?;
            let upload = sampler::run(
                conn.as_mut(),
                Direction::Upload,
                &sampler_config,
                self.observer.as_ref(),
            )
            .await?;
            (Some(download), Some(upload))
        };

        Ok(SpeedTestReport {
            server: best.server,
            latency: best.latency,
            download,
            upload,
            measurements: selection.measured,
            started_at,
            completed_at: Utc::now(),
        })
    }

    /// Resolve the candidate set: either the pinned server or the first
    /// `max_servers` entries of the directory listing.
    async fn candidates(&self) -> Result<Vec<Server>> {
        let servers = self.directory.get_all_servers().await?;

        if let Some(ref id) = self.config.server_id {
            let pinned = servers
                .into_iter()
                .find(|s| &s.id == id)
                .ok_or_else(|| {
                    AppError::selection(format!("Server {} not present in the directory listing", id))
                })?;
            return Ok(vec![pinned]);
        }

        Ok(servers
            .into_iter()
            .take(self.config.max_servers)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransferResult;
    use crate::protocol::TestConnection;
    use async_trait::async_trait;

    struct StaticDirectory {
        servers: Vec<Server>,
    }

    #[async_trait]
    impl ServerDirectory for StaticDirectory {
        async fn get_all_servers(&self) -> Result<Vec<Server>> {
            Ok(self.servers.clone())
        }
    }

    struct FailingDirectory;

    #[async_trait]
    impl ServerDirectory for FailingDirectory {
        async fn get_all_servers(&self) -> Result<Vec<Server>> {
            Err(AppError::directory("listing unavailable"))
        }
    }

    /// Connection simulating a fixed transfer rate and fixed latency
    struct SimulatedConnection {
        latency: Duration,
        bytes_per_second: u64,
    }

    impl SimulatedConnection {
        fn transfer(&self, bytes: u64) -> TransferResult {
            let start = Utc::now();
            let secs = bytes as f64 / self.bytes_per_second as f64;
            let finish = start + chrono::Duration::nanoseconds((secs * 1e9) as i64);
            TransferResult::new(start, finish, bytes)
        }
    }

    #[async_trait]
    impl TestConnection for SimulatedConnection {
        async fn ping(&mut self) -> Result<Duration> {
            Ok(self.latency)
        }

        async fn download(&mut self, bytes: u64) -> Result<TransferResult> {
            Ok(self.transfer(bytes))
        }

        async fn upload(&mut self, bytes: u64) -> Result<TransferResult> {
            Ok(self.transfer(bytes))
        }
    }

    struct SimulatedConnector {
        latency: Duration,
        bytes_per_second: u64,
    }

    #[async_trait]
    impl Connector for SimulatedConnector {
        async fn connect(&self, _host: &str) -> Result<Box<dyn TestConnection>> {
            Ok(Box::new(SimulatedConnection {
                latency: self.latency,
                bytes_per_second: self.bytes_per_second,
            }))
        }
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.seed_bytes = 125_000;
        config.sustain_seconds = 1;
        config
    }

    fn speed_test(config: Config, servers: Vec<Server>) -> SpeedTest {
        SpeedTest::with_collaborators(
            config,
            Box::new(StaticDirectory { servers }),
            Box::new(SimulatedConnector {
                latency: Duration::from_millis(10),
                // 2,000,000 B/s is exactly 16 Mbps
                bytes_per_second: 2_000_000,
            }),
            Box::new(NullObserver),
        )
    }

    #[tokio::test]
    async fn test_full_run_reports_simulated_rate() {
        let servers = vec![Server::new("1", "one:1"), Server::new("2", "two:1")];
        let report = speed_test(test_config(), servers).run().await.unwrap();

        let download = report.download.unwrap();
        let upload = report.upload.unwrap();
        // Every sample runs at the simulated rate, so the mean matches it
        assert!((download.mean_mbps - 16.0).abs() < 1e-6);
        assert!((upload.mean_mbps - 16.0).abs() < 1e-6);
        assert_eq!(report.latency, Duration::from_millis(10));
        assert!(report.completed_at >= report.started_at);
    }

    #[tokio::test]
    async fn test_ping_only_skips_throughput() {
        let mut config = test_config();
        config.ping_only = true;
        let report = speed_test(config, vec![Server::new("1", "one:1")])
            .run()
            .await
            .unwrap();

        assert!(report.download.is_none());
        assert!(report.upload.is_none());
        assert_eq!(report.latency, Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_pinned_server_bypasses_other_candidates() {
        let mut config = test_config();
        config.server_id = Some("2".to_string());
        let servers = vec![Server::new("1", "one:1"), Server::new("2", "two:1")];
        let report = speed_test(config, servers).run().await.unwrap();

        assert_eq!(report.server.id, "2");
        assert_eq!(report.measurements.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_pinned_server_rejected() {
        let mut config = test_config();
        config.server_id = Some("99".to_string());
        let err = speed_test(config, vec![Server::new("1", "one:1")])
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Selection(_)));
    }

    #[tokio::test]
    async fn test_max_servers_caps_candidates() {
        let mut config = test_config();
        config.max_servers = 2;
        let servers = vec![
            Server::new("1", "one:1"),
            Server::new("2", "two:1"),
            Server::new("3", "three:1"),
        ];
        let report = speed_test(config, servers).run().await.unwrap();
        assert_eq!(report.measurements.len(), 2);
    }

    #[tokio::test]
    async fn test_directory_failure_surfaces_as_error() {
        let speed_test = SpeedTest::with_collaborators(
            test_config(),
            Box::new(FailingDirectory),
            Box::new(SimulatedConnector {
                latency: Duration::from_millis(10),
                bytes_per_second: 2_000_000,
            }),
            Box::new(NullObserver),
        );
        let err = speed_test.run().await.unwrap_err();
        assert!(matches!(err, AppError::Directory(_)));
    }
}
