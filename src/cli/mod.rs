//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::sync::OnceLock;

use anyhow::Result;
use clap::Parser;

use commands::{Commands, ConfigArgs};

fn long_version() -> &'static str {
    static LONG_VERSION: OnceLock<String> = OnceLock::new();
    LONG_VERSION.get_or_init(|| {
        format!(
            "{}\ncommit: {}\ntarget: {}",
            env!("CARGO_PKG_VERSION"),
            option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
            option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown"),
        )
    })
}

/// pico-setup - Raspberry Pi Pico development environment bootstrapper
///
/// Installs the toolchain, fetches the Pico SDK repositories, builds the
/// example programs and the picoprobe, picotool and OpenOCD tools, and
/// configures the host for Pico development. Runs `setup` when no command
/// is given.
#[derive(Parser, Debug)]
#[command(name = "pico-setup")]
#[command(author, version, long_version = long_version(), about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        self.command
            .unwrap_or(Commands::Setup {
                config: ConfigArgs::default(),
                fresh: false,
            })
            .run()
    }
}
