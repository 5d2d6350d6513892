//! DirCrypt CLI - bulk directory encryption
//!
//! Exit status is 0 once the run completes, even when individual files
//! failed; 1 when start-up configuration is invalid.

use clap::Parser;
use dircrypt::config::{passphrase_from_cli, CliArgs, CryptConfig};
use dircrypt::core::CryptEngine;
use dircrypt::error::Result;
use dircrypt::progress::ConsoleReporter;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(args.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    let passphrase = passphrase_from_cli(&args)?;
    let config = CryptConfig::from_cli(&args)?;

    let reporter = if args.progress {
        ConsoleReporter::with_spinner()
    } else {
        ConsoleReporter::new()
    };
    let reporter = Arc::new(reporter.quiet(args.quiet));

    let engine = CryptEngine::new(config, passphrase).with_sink(reporter.clone());
    let summary = engine.execute()?;

    reporter.finish();
    if args.verbose > 0 {
        summary.print_summary();
    }
    println!("Processing complete.");

    Ok(())
}

fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
