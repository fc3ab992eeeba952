//! Repository list
//!
//! The fixed set of upstream repositories, their clone URLs, destinations,
//! and the environment variables exported for the SDK checkouts.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::command::CommandSpec;
use super::settings::SetupConfig;
use crate::config::urls::GITHUB_SUFFIX;

/// SDK repositories, cloned as `pico-<name>` and exported as `PICO_<NAME>_PATH`
pub const SDK_REPOS: &[&str] = &["sdk", "examples", "extras", "playground"];

/// Tool repositories built after the examples
pub const TOOL_REPOS: &[&str] = &["picoprobe", "picotool"];

/// Repository name of OpenOCD
pub const OPENOCD_REPO: &str = "openocd";

/// A repository to clone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Upstream repository name, e.g. `pico-sdk`
    pub name: String,
    /// Clone URL
    pub url: String,
    /// Checkout destination
    pub dest: PathBuf,
    /// Branch to check out, remote default when `None`
    pub branch: Option<String>,
    /// Initialise submodules after cloning
    pub submodules: bool,
    /// Environment variable pointing at `dest`
    pub export: Option<String>,
}

impl Repository {
    /// Commands cloning the repository (and its submodules)
    pub fn clone_commands(&self, parent: &Path) -> Vec<CommandSpec> {
        let mut clone = CommandSpec::new("git").arg("clone");
        if let Some(branch) = &self.branch {
            clone = clone.args(["-b", branch.as_str()]);
        }
        let clone = clone
            .arg(self.url.as_str())
            .arg(self.dest.display().to_string())
            .current_dir(parent);

        let mut commands = vec![clone];
        if self.submodules {
            commands.push(
                CommandSpec::new("git")
                    .args(["submodule", "update", "--init"])
                    .current_dir(&self.dest),
            );
        }
        commands
    }
}

/// Clone URL for a repository name
pub fn clone_url(prefix: &str, name: &str) -> String {
    format!("{prefix}{name}{GITHUB_SUFFIX}")
}

/// Environment variable exported for an SDK repository
///
/// `sdk` becomes `PICO_SDK_PATH`.
pub fn env_var_name(short_name: &str) -> String {
    format!("PICO_{}_PATH", short_name.to_uppercase().replace('-', "_"))
}

/// Shell profile line exporting a variable
pub fn export_line(name: &str, value: &Path) -> String {
    format!("export {name}={}", value.display())
}

/// The SDK repositories, in clone order
pub fn sdk_repositories(config: &SetupConfig) -> Vec<Repository> {
    SDK_REPOS
        .iter()
        .map(|short| {
            let name = format!("pico-{short}");
            Repository {
                url: clone_url(&config.github_prefix, &name),
                dest: config.output_dir.join(&name),
                branch: Some(config.sdk_branch.clone()),
                submodules: true,
                export: Some(env_var_name(short)),
                name,
            }
        })
        .collect()
}

/// The tool repositories, in build order
pub fn tool_repositories(config: &SetupConfig) -> Vec<Repository> {
    TOOL_REPOS
        .iter()
        .map(|name| Repository {
            name: (*name).to_string(),
            url: clone_url(&config.github_prefix, name),
            dest: config.output_dir.join(name),
            branch: None,
            submodules: false,
            export: None,
        })
        .collect()
}

/// Variables every build command sees, one per SDK checkout
pub fn sdk_environment(config: &SetupConfig) -> Vec<(String, String)> {
    sdk_repositories(config)
        .into_iter()
        .filter_map(|repo| {
            repo.export
                .map(|var| (var, repo.dest.display().to_string()))
        })
        .collect()
}
