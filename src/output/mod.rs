//! Output formatting and display
//!
//! Formats a finished report for the terminal (colored or plain) or as
//! JSON, and provides the console observer that narrates progress events
//! in verbose mode.

use crate::{
    app::SpeedTestReport,
    error::{AppError, Result},
    models::Server,
    observer::TestObserver,
    sampler::ThroughputSummary,
    types::Direction,
};
use colored::Colorize;
use std::time::Duration;

/// Renders a finished report for display
pub trait ReportFormatter: Send + Sync {
    fn format_report(&self, report: &SpeedTestReport) -> Result<String>;
}

/// Plain text formatter for scripts and logs
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl ReportFormatter for PlainFormatter {
    fn format_report(&self, report: &SpeedTestReport) -> Result<String> {
        let mut out = String::new();
        out.push_str(&format!("Server:   {}\n", report.server.describe()));
        out.push_str(&format!("Latency:  {:.2} ms\n", report.latency_ms()));
        if let Some(download) = &report.download {
            out.push_str(&format!("Download: {}\n", format_summary(download)));
        }
        if let Some(upload) = &report.upload {
            out.push_str(&format!("Upload:   {}\n", format_summary(upload)));
        }
        Ok(out)
    }
}

/// Colored terminal formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct ColoredFormatter;

impl ReportFormatter for ColoredFormatter {
    fn format_report(&self, report: &SpeedTestReport) -> Result<String> {
        let mut out = String::new();
        out.push_str(&format!(
            "{}   {}\n",
            "Server:".bold(),
            report.server.describe()
        ));
        out.push_str(&format!(
            "{}  {}\n",
            "Latency:".bold(),
            format!("{:.2} ms", report.latency_ms()).cyan()
        ));
        if let Some(download) = &report.download {
            out.push_str(&format!(
                "{} {}\n",
                "Download:".bold(),
                format_summary(download).green()
            ));
        }
        if let Some(upload) = &report.upload {
            out.push_str(&format!(
                "{}   {}\n",
                "Upload:".bold(),
                format_summary(upload).yellow()
            ));
        }
        Ok(out)
    }
}

/// JSON formatter for machine consumption
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, report: &SpeedTestReport) -> Result<String> {
        serde_json::to_string_pretty(report)
            .map_err(|e| AppError::internal(format!("Failed to serialize report: {}", e)))
    }
}

fn format_summary(summary: &ThroughputSummary) -> String {
    format!(
        "{:.2} Mbps ({} samples)",
        summary.mean_mbps, summary.samples
    )
}

/// Create a formatter matching the output preferences
pub fn create_formatter(enable_color: bool, json: bool) -> Box<dyn ReportFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else if enable_color {
        Box::new(ColoredFormatter)
    } else {
        Box::new(PlainFormatter)
    }
}

/// Observer that narrates progress events on the console
#[derive(Debug, Clone, Copy)]
pub struct ConsoleObserver {
    verbose: bool,
    enable_color: bool,
}

impl ConsoleObserver {
    pub fn new(verbose: bool, enable_color: bool) -> Self {
        Self {
            verbose,
            enable_color,
        }
    }

    fn paint_warn(&self, text: String) -> String {
        if self.enable_color {
            text.yellow().to_string()
        } else {
            text
        }
    }
}

impl TestObserver for ConsoleObserver {
    fn on_server_measured(&self, server: &Server, latency: Duration) {
        if self.verbose {
            println!(
                "  probed {} at {:.2} ms",
                server.describe(),
                latency.as_secs_f64() * 1000.0
            );
        }
    }

    fn on_server_skipped(&self, server: &Server, error: &AppError) {
        println!(
            "{}",
            self.paint_warn(format!("  skipping {}: {}", server.describe(), error))
        );
    }

    fn on_sample(&self, direction: Direction, bytes: u64, elapsed: Duration, mbps: f64) {
        if self.verbose {
            println!(
                "  {} sample: {} bytes in {:.3}s ({:.2} Mbps)",
                direction,
                bytes,
                elapsed.as_secs_f64(),
                mbps
            );
        }
    }

    fn on_sample_excluded(&self, direction: Direction, bytes: u64, error: &AppError) {
        println!(
            "{}",
            self.paint_warn(format!(
                "  excluded degenerate {} sample of {} bytes: {}",
                direction, bytes, error
            ))
        );
    }

    fn on_run_complete(&self, direction: Direction, samples: u32, mean_mbps: f64) {
        if self.verbose {
            println!(
                "  {} complete: {:.2} Mbps mean over {} samples",
                direction, mean_mbps, samples
            );
        }
    }
}
