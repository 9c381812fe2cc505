//! Command-line interface

use clap::Parser;

/// Speedmeter - sustained network throughput and latency tester
#[derive(Parser, Debug, Clone)]
#[command(name = "spm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Round-trip probes per candidate server during selection
    #[arg(short, long, default_value_t = crate::defaults::DEFAULT_PROBE_COUNT)]
    pub probes: u32,

    /// Initial transfer size in bytes for the adaptive sampler
    #[arg(short = 'b', long, default_value_t = crate::defaults::DEFAULT_SEED_BYTES)]
    pub seed_bytes: u64,

    /// Seconds a single transfer must exceed before sampling stops
    #[arg(short = 't', long, default_value_t = crate::defaults::DEFAULT_SUSTAIN_SECONDS)]
    pub seconds: u64,

    /// Additive growth factor (each step adds growth × seed bytes)
    #[arg(short, long, default_value_t = crate::defaults::DEFAULT_GROWTH_MULTIPLIER)]
    pub growth: u64,

    /// How many directory candidates to probe during selection
    #[arg(short = 'n', long, default_value_t = crate::defaults::DEFAULT_MAX_SERVERS)]
    pub max_servers: usize,

    /// Test against a specific server ID instead of the probed best
    #[arg(short, long)]
    pub server: Option<String>,

    /// Server directory listing URL
    #[arg(long)]
    pub list_url: Option<String>,

    /// Abort selection when any candidate is unreachable
    #[arg(long)]
    pub no_skip: bool,

    /// Only measure latency, skip the throughput tests
    #[arg(long)]
    pub ping_only: bool,

    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.json && self.verbose {
            return Err("--json produces machine output and conflicts with --verbose".to_string());
        }

        if let Some(ref server) = self.server {
            if server.trim().is_empty() {
                return Err("--server requires a non-empty server ID".to_string());
            }
        }

        Ok(())
    }
}
