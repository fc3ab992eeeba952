//! Build tool selection
//!
//! Ninja when configured (always on MinGW64), parallel make otherwise.

use serde::Serialize;
use std::fmt;
use std::path::Path;

use super::command::CommandSpec;
use super::platform::Platform;
use super::settings::SetupConfig;

/// Native build tool driving the CMake-generated builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "tool", rename_all = "lowercase")]
pub enum BuildTool {
    /// `ninja`, parallelism left to ninja itself
    Ninja,
    /// `make -j<jobs>`
    Make { jobs: usize },
}

impl BuildTool {
    /// Pick the build tool for a platform and configuration
    pub fn select(platform: Platform, config: &SetupConfig) -> Self {
        if config.ninja || platform == Platform::WindowsMingw64 {
            Self::Ninja
        } else {
            Self::Make {
                jobs: config.jobs.max(1),
            }
        }
    }

    /// Arguments selecting the matching CMake generator
    pub fn cmake_generator_args(self) -> Vec<String> {
        match self {
            Self::Ninja => vec!["-G".to_string(), "Ninja".to_string()],
            Self::Make { .. } => Vec::new(),
        }
    }

    /// CMake configure command for a build directory
    pub fn configure_command(self, build_dir: &Path, extra: &[&str]) -> CommandSpec {
        CommandSpec::new("cmake")
            .arg("..")
            .args(self.cmake_generator_args())
            .args(extra.iter().copied())
            .current_dir(build_dir)
    }

    /// Command building one target, or everything when `target` is `None`
    ///
    /// `target` names a subdirectory of the build tree, which may hold
    /// several executables (`hello_world` has `serial` and `usb`). Make runs
    /// inside that subdirectory; ninja builds its `<dir>/all` phony target
    /// from the build root.
    pub fn build_command(self, build_dir: &Path, target: Option<&str>) -> CommandSpec {
        match (self, target) {
            (Self::Ninja, Some(target)) => CommandSpec::new("ninja")
                .arg(format!("{target}/all"))
                .current_dir(build_dir),
            (Self::Ninja, None) => CommandSpec::new("ninja").current_dir(build_dir),
            (Self::Make { jobs }, Some(target)) => CommandSpec::new("make")
                .arg(format!("-j{jobs}"))
                .current_dir(&build_dir.join(target)),
            (Self::Make { jobs }, None) => CommandSpec::new("make")
                .arg(format!("-j{jobs}"))
                .current_dir(build_dir),
        }
    }
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ninja => f.write_str("ninja"),
            Self::Make { jobs } => write!(f, "make -j{jobs}"),
        }
    }
}
