//! Configuration loading from CLI arguments and environment variables

use crate::{cli::Cli, error::Result, models::Config};

/// Configuration parser that layers CLI arguments over environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // Start with default configuration
        let mut config = Config::default();

        // Load .env file if present, then merge environment variables
        self.load_env_file();
        config.merge_from_env()?;

        // Override with CLI arguments
        self.apply_cli_overrides(&mut config)?;

        // Validate the final configuration
        config.validate()?;

        Ok(config)
    }

    fn load_env_file(&self) {
        match dotenv::dotenv() {
            Ok(path) => {
                if self.cli.debug {
                    println!("Loaded environment from {}", path.display());
                }
            }
            Err(_) => {
                // No .env file is the normal case
            }
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(ref list_url) = self.cli.list_url {
            config.list_url = list_url.clone();
        }

        if self.cli.probes != crate::defaults::DEFAULT_PROBE_COUNT {
            config.probe_count = self.cli.probes;
        }

        if self.cli.seed_bytes != crate::defaults::DEFAULT_SEED_BYTES {
            config.seed_bytes = self.cli.seed_bytes;
        }

        if self.cli.seconds != crate::defaults::DEFAULT_SUSTAIN_SECONDS {
            config.sustain_seconds = self.cli.seconds;
        }

        if self.cli.growth != crate::defaults::DEFAULT_GROWTH_MULTIPLIER {
            config.growth_multiplier = self.cli.growth;
        }

        if self.cli.max_servers != crate::defaults::DEFAULT_MAX_SERVERS {
            config.max_servers = self.cli.max_servers;
        }

        if let Some(ref server_id) = self.cli.server {
            config.server_id = Some(server_id.clone());
        }

        if self.cli.no_skip {
            config.skip_unreachable = false;
        }

        config.ping_only = self.cli.ping_only;

        if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        Ok(())
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Server list URL: {}", config.list_url));
    summary.push(format!("Probe count: {}", config.probe_count));
    summary.push(format!("Seed size: {} bytes", config.seed_bytes));
    summary.push(format!("Sustain duration: {}s", config.sustain_seconds));
    summary.push(format!("Growth multiplier: {}", config.growth_multiplier));
    summary.push(format!("Max servers: {}", config.max_servers));
    if let Some(ref id) = config.server_id {
        summary.push(format!("Pinned server: {}", id));
    }
    summary.push(format!("Skip unreachable: {}", config.skip_unreachable));
    summary.push(format!("Color output: {}", config.enable_color));

    summary.join("\n")
}
