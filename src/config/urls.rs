//! Upstream repository URLs

/// Prefix for every cloned repository
pub const GITHUB_PREFIX: &str = "https://github.com/raspberrypi/";

/// Suffix appended to the repository name
pub const GITHUB_SUFFIX: &str = ".git";
