//! Output formatting and progress indicators
//!
//! Global output mode (quiet, JSON, verbosity) plus helpers for spinners and
//! status-prefixed messages.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

static QUIET: AtomicBool = AtomicBool::new(false);
static JSON: AtomicBool = AtomicBool::new(false);
static VERBOSITY: AtomicU8 = AtomicU8::new(0);

/// Output mode selected on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    pub quiet: bool,
    pub json: bool,
    pub verbose: u8,
}

impl OutputConfig {
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Make this configuration visible to the output helpers
    pub fn apply_global(self) {
        QUIET.store(self.quiet, Ordering::Relaxed);
        JSON.store(self.json, Ordering::Relaxed);
        VERBOSITY.store(self.verbose, Ordering::Relaxed);
    }
}

/// Whether only errors should be printed
pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Whether output should be machine-readable
pub fn is_json() -> bool {
    JSON.load(Ordering::Relaxed)
}

/// Number of `-v` flags given
pub fn verbosity() -> u8 {
    VERBOSITY.load(Ordering::Relaxed)
}

fn human_output() -> bool {
    !is_quiet() && !is_json()
}

pub fn print_info(message: &str) {
    if human_output() {
        println!("{} {message}", status::INFO);
    }
}

pub fn print_success(message: &str) {
    if human_output() {
        println!("{} {message}", status::SUCCESS);
    }
}

/// Warnings go to stderr so they survive `--json`
pub fn print_warning(message: &str) {
    if !is_quiet() {
        eprintln!("{} {message}", status::WARNING);
    }
}

/// Indented follow-up line
pub fn print_detail(message: &str) {
    if human_output() {
        println!("    {message}");
    }
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("    caused by: {cause}");
    }
}

/// Create a spinner for operations with unknown duration
///
/// Hidden in JSON mode.
pub fn create_spinner(message: &str) -> ProgressBar {
    if is_json() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";

    /// Skipped step prefix
    pub const SKIPPED: &str = "-";
}
