//! Speedmeter - Main CLI Application
//!
//! Thin front end over the measurement library: parse arguments, load
//! configuration, run the speed test, print the report.

use clap::Parser;
use speedmeter::{
    cli::Cli,
    config::{display_config_summary, load_config},
    error::{AppError, Result},
    output::{create_formatter, ConsoleObserver},
    SpeedTest, HttpServerDirectory, TcpConnector, PKG_NAME, VERSION,
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    if let Err(e) = run_application(cli).await {
        eprintln!("Error: {}", e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    let json = cli.json;

    if cli.debug {
        println!("{} v{}", PKG_NAME, VERSION);
        println!("Debug mode enabled");
        println!();
    }

    let config = load_config(cli)?;

    if config.debug {
        println!("Configuration:");
        println!("{}", display_config_summary(&config));
        println!();
    }

    if config.verbose {
        println!("Selecting best server...");
    }

    let observer = ConsoleObserver::new(config.verbose, config.enable_color);
    let speed_test = SpeedTest::with_collaborators(
        config.clone(),
        Box::new(HttpServerDirectory::from_config(&config)),
        Box::new(TcpConnector::new()),
        Box::new(observer),
    );

    let report = speed_test.run().await?;

    let formatter = create_formatter(config.enable_color, json);
    print!("{}", formatter.format_report(&report)?);

    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file and command line flags");
            eprintln!("  - Seed size and growth multiplier must be greater than 0");
        }
        AppError::Directory(_) => {
            eprintln!();
            eprintln!("Directory troubleshooting:");
            eprintln!("  - Check your internet connection");
            eprintln!("  - Try a different listing with --list-url");
        }
        AppError::Connection(_) | AppError::Selection(_) => {
            eprintln!();
            eprintln!("Connection troubleshooting:");
            eprintln!("  - Check your internet connection and firewall settings");
            eprintln!("  - Try more candidates with --max-servers");
            eprintln!("  - Pin a known-good server with --server");
        }
        _ => {}
    }
}
