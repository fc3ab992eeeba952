//! Host introspection
//!
//! Gathers [`HostFacts`] for platform detection. `PICO_SETUP_CPUINFO` points
//! detection at a different CPU information file.

use std::path::PathBuf;

use super::filesystem::read_optional;
use crate::config::defaults::CPUINFO_PATH;
use crate::core::platform::HostFacts;

/// Environment variable overriding the CPU information file
pub const ENV_CPUINFO: &str = "PICO_SETUP_CPUINFO";

/// Shell variant indicator set by MSYS2
pub const ENV_MSYSTEM: &str = "MSYSTEM";

/// Binary whose presence marks an apt-based host
pub const PACKAGE_QUERY: &str = "dpkg-query";

/// Probe the running host
pub fn probe_host() -> HostFacts {
    let cpuinfo_path = std::env::var_os(ENV_CPUINFO)
        .map_or_else(|| PathBuf::from(CPUINFO_PATH), PathBuf::from);

    let facts = HostFacts {
        os: std::env::consts::OS.to_string(),
        msystem: std::env::var(ENV_MSYSTEM).ok(),
        cpuinfo: read_optional(&cpuinfo_path),
        has_package_query: which::which(PACKAGE_QUERY).is_ok(),
    };

    tracing::debug!(
        os = %facts.os,
        msystem = ?facts.msystem,
        cpuinfo = %cpuinfo_path.display(),
        has_package_query = facts.has_package_query,
        "Probed host"
    );
    facts
}
