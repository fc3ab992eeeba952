//! Shell profile updates
//!
//! Lines are only ever appended; the profile is never rewritten.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::SetupError;

/// Append one line to the profile, creating it if needed
pub fn append_line(profile: &Path, line: &str) -> Result<(), SetupError> {
    let to_error = |e: std::io::Error| SetupError::Profile {
        path: profile.to_path_buf(),
        error: e.to_string(),
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(profile)
        .map_err(to_error)?;

    writeln!(file, "{line}").map_err(to_error)
}
