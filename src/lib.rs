//! pico-setup - Raspberry Pi Pico development environment bootstrapper
//!
//! Provisions a machine for Pico firmware work: installs OS packages, clones
//! the SDK and tool repositories, and drives their native build systems.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Platform detection, planning and the step runner
//! - [`infra`] - Infrastructure layer (filesystem, processes, host probing)
//! - [`config`] - Configuration defaults and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
