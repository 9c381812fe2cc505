//! Speedmeter
//!
//! A sustained network throughput and latency tester. It picks the
//! lowest-latency server from a public server directory, then measures
//! download and upload bandwidth with an adaptive sampling loop that grows
//! the transfer size until a single transfer sustains past a target
//! duration.

pub mod app;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod observer;
pub mod output;
pub mod probe;
pub mod protocol;
pub mod sampler;
pub mod selector;
pub mod types;
pub mod units;

// Re-export commonly used types
pub use app::{SpeedTest, SpeedTestReport};
pub use directory::{HttpServerDirectory, ServerDirectory};
pub use error::{AppError, Result};
pub use models::{Config, Server, ServerLatency, TransferResult};
pub use observer::{NullObserver, TestObserver};
pub use protocol::{Connector, TcpConnector, TestConnection};
pub use sampler::{SamplerConfig, ThroughputSummary};
pub use selector::{Selection, SelectorConfig};
pub use types::Direction;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    /// Round-trip probes issued per candidate server during selection.
    pub const DEFAULT_PROBE_COUNT: u32 = 3;

    /// Initial transfer size for the adaptive sampler, in bytes.
    pub const DEFAULT_SEED_BYTES: u64 = 50_000;

    /// Wall-clock duration a single transfer must exceed before the
    /// sampler stops growing, in whole seconds.
    pub const DEFAULT_SUSTAIN_SECONDS: u64 = 3;

    /// Additive growth factor: each step adds `growth × seed` bytes.
    pub const DEFAULT_GROWTH_MULTIPLIER: u64 = 7;

    /// Public server directory listing.
    pub const DEFAULT_LIST_URL: &str = "http://c.speedtest.net/speedtest-servers-static.php";

    /// How many directory candidates to probe during selection.
    pub const DEFAULT_MAX_SERVERS: usize = 5;

    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
