//! Configuration data model and validation

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server directory listing URL
    #[serde(default = "default_list_url")]
    pub list_url: String,

    /// Round-trip probes per candidate server during selection
    #[serde(default = "default_probe_count")]
    pub probe_count: u32,

    /// Initial transfer size in bytes for the adaptive sampler
    #[serde(default = "default_seed_bytes")]
    pub seed_bytes: u64,

    /// Whole seconds a single transfer must exceed before sampling stops
    #[serde(default = "default_sustain_seconds")]
    pub sustain_seconds: u64,

    /// Additive growth factor: each step adds `growth × seed` bytes
    #[serde(default = "default_growth_multiplier")]
    pub growth_multiplier: u64,

    /// How many directory candidates to probe during selection
    #[serde(default = "default_max_servers")]
    pub max_servers: usize,

    /// Pin selection to a specific server ID instead of probing
    #[serde(default)]
    pub server_id: Option<String>,

    /// Skip unreachable servers during selection instead of aborting
    #[serde(default = "default_skip_unreachable")]
    pub skip_unreachable: bool,

    /// Only measure latency, skip the throughput tests
    #[serde(default)]
    pub ping_only: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            list_url: default_list_url(),
            probe_count: default_probe_count(),
            seed_bytes: default_seed_bytes(),
            sustain_seconds: default_sustain_seconds(),
            growth_multiplier: default_growth_multiplier(),
            max_servers: default_max_servers(),
            server_id: None,
            skip_unreachable: default_skip_unreachable(),
            ping_only: false,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the sustain threshold as a Duration
    pub fn sustain_threshold(&self) -> Duration {
        Duration::from_secs(self.sustain_seconds)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.list_url.is_empty() {
            return Err(AppError::config("Server list URL cannot be empty"));
        }

        if let Err(e) = url::Url::parse(&self.list_url) {
            return Err(AppError::config(format!(
                "Invalid server list URL '{}': {}",
                self.list_url, e
            )));
        }

        if self.probe_count == 0 {
            return Err(AppError::config("Probe count must be greater than 0"));
        }

        if self.probe_count > 100 {
            return Err(AppError::config("Probe count cannot exceed 100"));
        }

        if self.seed_bytes == 0 {
            return Err(AppError::config("Seed size must be greater than 0 bytes"));
        }

        if self.growth_multiplier == 0 {
            return Err(AppError::config("Growth multiplier must be greater than 0"));
        }

        if self.max_servers == 0 {
            return Err(AppError::config("Max servers must be greater than 0"));
        }

        if self.sustain_seconds > 300 {
            return Err(AppError::config("Sustain duration cannot exceed 300 seconds"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_vars(|name| std::env::var(name).ok())
    }

    /// Merge variables from an arbitrary lookup. `merge_from_env` passes
    /// the process environment; tests pass a fixed map.
    fn merge_from_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(list_url) = var("SPEEDMETER_LIST_URL") {
            if !list_url.trim().is_empty() {
                self.list_url = list_url.trim().to_string();
            }
        }

        if let Some(probe_count) = var("SPEEDMETER_PROBE_COUNT") {
            self.probe_count = parse_var("SPEEDMETER_PROBE_COUNT", &probe_count)?;
        }

        if let Some(seed_bytes) = var("SPEEDMETER_SEED_BYTES") {
            self.seed_bytes = parse_var("SPEEDMETER_SEED_BYTES", &seed_bytes)?;
        }

        if let Some(sustain) = var("SPEEDMETER_SUSTAIN_SECONDS") {
            self.sustain_seconds = parse_var("SPEEDMETER_SUSTAIN_SECONDS", &sustain)?;
        }

        if let Some(growth) = var("SPEEDMETER_GROWTH_MULTIPLIER") {
            self.growth_multiplier = parse_var("SPEEDMETER_GROWTH_MULTIPLIER", &growth)?;
        }

        if let Some(max_servers) = var("SPEEDMETER_MAX_SERVERS") {
            self.max_servers = parse_var("SPEEDMETER_MAX_SERVERS", &max_servers)?;
        }

        if let Some(skip) = var("SPEEDMETER_SKIP_UNREACHABLE") {
            self.skip_unreachable = parse_var("SPEEDMETER_SKIP_UNREACHABLE", &skip)?;
        }

        if let Some(enable_color) = var("SPEEDMETER_COLOR") {
            self.enable_color = parse_var("SPEEDMETER_COLOR", &enable_color)?;
        }

        Ok(())
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", name, value, e)))
}

// Default value functions for serde
fn default_list_url() -> String {
    crate::defaults::DEFAULT_LIST_URL.to_string()
}

fn default_probe_count() -> u32 {
    crate::defaults::DEFAULT_PROBE_COUNT
}

fn default_seed_bytes() -> u64 {
    crate::defaults::DEFAULT_SEED_BYTES
}

fn default_sustain_seconds() -> u64 {
    crate::defaults::DEFAULT_SUSTAIN_SECONDS
}

fn default_growth_multiplier() -> u64 {
    crate::defaults::DEFAULT_GROWTH_MULTIPLIER
}

fn default_max_servers() -> usize {
    crate::defaults::DEFAULT_MAX_SERVERS
}

fn default_skip_unreachable() -> bool {
    true
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
