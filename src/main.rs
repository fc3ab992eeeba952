//! pico-setup - Raspberry Pi Pico development environment bootstrapper
//!
//! Entry point for the pico-setup command-line application.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pico_setup::cli::output::{display_error, OutputConfig};
use pico_setup::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Apply output configuration globally
    let output_config = OutputConfig::new(cli.quiet, cli.json, cli.verbose);
    output_config.apply_global();

    // Run the command and handle errors
    if let Err(e) = cli.run() {
        display_error(&e);
        std::process::exit(1);
    }
}
