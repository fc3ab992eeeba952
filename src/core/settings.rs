//! Setup configuration
//!
//! Resolves the explicit [`SetupConfig`] handed to the planner. Layers, lowest
//! to highest precedence:
//!
//! 1. Built-in defaults ([`crate::config::defaults`])
//! 2. `config.toml` in the config directory
//! 3. Environment variables (`SKIP_OPENOCD`, `SKIP_VSCODE`, `SKIP_UART`,
//!    `PICO_SETUP_NINJA`, `PICO_SETUP_JOBS`)
//! 4. Command-line flags

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::defaults::{
    DEFAULT_BUILD_JOBS, DEFAULT_OUTPUT_DIR, DEFAULT_PROFILE, DEFAULT_SDK_BRANCH, STATE_DIR,
    STATE_FILE,
};
use crate::config::urls::GITHUB_PREFIX;
use crate::error::ConfigError;

/// Environment variable skipping the OpenOCD build
pub const ENV_SKIP_OPENOCD: &str = "SKIP_OPENOCD";
/// Environment variable skipping the VS Code install
pub const ENV_SKIP_VSCODE: &str = "SKIP_VSCODE";
/// Environment variable skipping UART reconfiguration
pub const ENV_SKIP_UART: &str = "SKIP_UART";
/// Environment variable selecting the Ninja build tool
pub const ENV_NINJA: &str = "PICO_SETUP_NINJA";
/// Environment variable setting the build job count
pub const ENV_JOBS: &str = "PICO_SETUP_JOBS";

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Filesystem locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Build options
    #[serde(default)]
    pub build: BuildConfig,

    /// Optional steps to skip
    #[serde(default)]
    pub skip: SkipConfig,

    /// Repository sources
    #[serde(default)]
    pub repos: ReposConfig,

    /// OpenOCD options
    #[serde(default)]
    pub openocd: OpenOcdConfig,
}

/// Filesystem locations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Output directory, relative paths resolve against the working directory
    pub output_dir: Option<PathBuf>,

    /// Shell profile receiving the exports
    pub profile: Option<PathBuf>,
}

/// Build options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Parallel jobs for make (0 = all CPUs)
    pub jobs: Option<usize>,

    /// Use Ninja instead of make
    pub ninja: Option<bool>,
}

/// Optional steps to skip
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipConfig {
    pub openocd: Option<bool>,
    pub vscode: Option<bool>,
    pub uart: Option<bool>,
}

/// Repository sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReposConfig {
    /// URL prefix the repository name is appended to
    pub github_prefix: Option<String>,

    /// Branch for the SDK repositories
    pub sdk_branch: Option<String>,
}

/// OpenOCD options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOcdConfig {
    /// Build the picoprobe-enabled branch
    pub picoprobe: Option<bool>,
}

impl ConfigFile {
    /// Load configuration from a specific path
    ///
    /// A missing file yields the default configuration; an unreadable or
    /// malformed one is an error.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }
}

/// Values read from the process environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub skip_openocd: Option<bool>,
    pub skip_vscode: Option<bool>,
    pub skip_uart: Option<bool>,
    pub ninja: Option<bool>,
    pub jobs: Option<usize>,
}

impl EnvOverrides {
    /// Read overrides through a lookup function
    ///
    /// Takes a closure so callers can pass `std::env::var` or a fixed map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |name: &str| parse_flag(name, lookup(name).as_deref());

        let jobs = match lookup(ENV_JOBS).as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(value.parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_JOBS.to_string(),
                value: value.to_string(),
                expected: "a non-negative integer".to_string(),
            })?),
        };

        Ok(Self {
            skip_openocd: flag(ENV_SKIP_OPENOCD)?,
            skip_vscode: flag(ENV_SKIP_VSCODE)?,
            skip_uart: flag(ENV_SKIP_UART)?,
            ninja: flag(ENV_NINJA)?,
            jobs,
        })
    }

    /// Read overrides from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Parse a boolean environment flag; empty or unset means "not given"
pub fn parse_flag(name: &str, value: Option<&str>) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw.to_string(),
            expected: "1/true/yes or 0/false/no".to_string(),
        }),
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub profile: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub ninja: bool,
    pub skip_openocd: bool,
    pub skip_vscode: bool,
    pub skip_uart: bool,
    pub no_picoprobe: bool,
    pub branch: Option<String>,
}

/// Optional steps the user asked to skip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipFlags {
    pub openocd: bool,
    pub vscode: bool,
    pub uart: bool,
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupConfig {
    /// Directory all repositories are cloned into
    pub output_dir: PathBuf,
    /// Shell profile receiving `export` lines
    pub profile: PathBuf,
    /// Parallel make jobs
    pub jobs: usize,
    /// Prefer Ninja over make
    pub ninja: bool,
    /// Requested skips, before platform forcing
    pub skip: SkipFlags,
    /// Repository URL prefix
    pub github_prefix: String,
    /// Branch for the SDK repositories
    pub sdk_branch: String,
    /// Build OpenOCD with picoprobe support
    pub picoprobe: bool,
}

impl SetupConfig {
    /// Merge all configuration layers
    ///
    /// `cwd` anchors the default and relative output directory; `home` anchors
    /// the default shell profile.
    pub fn resolve(
        file: &ConfigFile,
        env: &EnvOverrides,
        cli: &CliOverrides,
        cwd: &Path,
        home: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let output_dir = cli
            .output_dir
            .clone()
            .or_else(|| file.paths.output_dir.clone())
            .map_or_else(|| cwd.join(DEFAULT_OUTPUT_DIR), |dir| cwd.join(dir));

        let profile = match cli.profile.clone().or_else(|| file.paths.profile.clone()) {
            Some(profile) => profile,
            None => home
                .map(|h| h.join(DEFAULT_PROFILE))
                .ok_or(ConfigError::NoHomeDirectory)?,
        };

        let jobs = match cli.jobs.or(env.jobs).or(file.build.jobs) {
            Some(0) => num_cpus::get(),
            Some(n) => n,
            None => DEFAULT_BUILD_JOBS,
        };

        let layered = |cli_flag: bool, env_flag: Option<bool>, file_flag: Option<bool>| {
            cli_flag || env_flag.or(file_flag).unwrap_or(false)
        };

        Ok(Self {
            output_dir,
            profile,
            jobs,
            ninja: layered(cli.ninja, env.ninja, file.build.ninja),
            skip: SkipFlags {
                openocd: layered(cli.skip_openocd, env.skip_openocd, file.skip.openocd),
                vscode: layered(cli.skip_vscode, env.skip_vscode, file.skip.vscode),
                uart: layered(cli.skip_uart, env.skip_uart, file.skip.uart),
            },
            github_prefix: file
                .repos
                .github_prefix
                .clone()
                .unwrap_or_else(|| GITHUB_PREFIX.to_string()),
            sdk_branch: cli
                .branch
                .clone()
                .or_else(|| file.repos.sdk_branch.clone())
                .unwrap_or_else(|| DEFAULT_SDK_BRANCH.to_string()),
            picoprobe: !cli.no_picoprobe && file.openocd.picoprobe.unwrap_or(true),
        })
    }

    /// Location of the resume state file
    pub fn state_path(&self) -> PathBuf {
        self.output_dir.join(STATE_DIR).join(STATE_FILE)
    }
}
