//! mediadex CLI entry point
//!
//! Parses arguments, installs the log subscriber, runs one command and exits
//! non-zero on failure. Logs go to stderr so stdout carries only results.

mod args;
mod commands;
mod errors;
mod timing;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = args::Cli::parse();
    init_tracing();

    let stdout = std::io::stdout();
    if let Err(e) = commands::run(cli, &mut stdout.lock()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
