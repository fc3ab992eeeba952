//! Infrastructure layer
//!
//! Handles all I/O against the host: probing, processes, the shell profile,
//! and the filesystem.

pub mod dirs;
pub mod filesystem;
pub mod host;
pub mod process;
pub mod profile;
