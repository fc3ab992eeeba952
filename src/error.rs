//! Error types for pico-setup
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::state::StateError;

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove file
    #[error("Failed to remove file '{path}': {error}")]
    RemoveFile { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: PathBuf, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: PathBuf, error: String },

    /// Invalid value in an environment variable
    #[error("Invalid value '{value}' for {name}: {expected}")]
    InvalidValue {
        name: String,
        value: String,
        expected: String,
    },

    /// No home directory to derive default paths from
    #[error("Could not determine the home directory; pass --profile explicitly")]
    NoHomeDirectory,
}

/// Top-level pico-setup error type
#[derive(Error, Debug)]
pub enum SetupError {
    /// Host cannot be provisioned
    #[error("Unsupported environment ({platform}): {reason}")]
    UnsupportedEnvironment { platform: String, reason: String },

    /// An external command exited unsuccessfully
    #[error("Command failed with {status}: {command}")]
    CommandFailed { command: String, status: String },

    /// An external command could not be started
    #[error("Failed to start '{command}': {error}")]
    CommandSpawn { command: String, error: String },

    /// Failed to append to the shell profile
    #[error("Failed to update shell profile '{path}': {error}")]
    Profile { path: PathBuf, error: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Resume state error
    #[error("State error: {0}")]
    State(#[from] StateError),
}
