//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_signals` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use domain_signals::initialization::init_logger_with;
use domain_signals::{run_collection, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_collection(config).await {
        Ok(report) => {
            println!(
                "✅ Resolved {} hostname{} ({} succeeded, {} failed, {} skipped, {} invalid) in {:.1}s",
                report.total_hostnames,
                if report.total_hostnames == 1 { "" } else { "s" },
                report.successful,
                report.failed,
                report.skipped,
                report.invalid,
                report.elapsed_seconds
            );
            println!("Record bags: {}", report.output.bags.display());
            println!("Features:    {}", report.output.features.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("domain_signals error: {:#}", e);
            process::exit(1);
        }
    }
}
