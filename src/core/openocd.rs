//! OpenOCD source build

use std::path::PathBuf;

use super::build_tool::BuildTool;
use super::command::CommandSpec;
use super::platform::Platform;
use super::repos::{clone_url, OPENOCD_REPO};
use super::settings::SetupConfig;
use crate::config::defaults::{OPENOCD_BRANCH, OPENOCD_PICOPROBE_BRANCH};

/// How OpenOCD is fetched and configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOcdBuild {
    pub url: String,
    pub branch: String,
    pub dest: PathBuf,
    pub configure_args: Vec<String>,
    pub jobs: usize,
    pub sudo: bool,
}

impl OpenOcdBuild {
    pub fn new(config: &SetupConfig, platform: Platform) -> Self {
        let mut configure_args = vec!["--enable-ftdi".to_string()];
        if platform != Platform::WindowsMingw64 {
            configure_args.push("--enable-sysfsgpio".to_string());
            configure_args.push("--enable-bcm2835gpio".to_string());
        }
        if config.picoprobe {
            configure_args.push("--enable-picoprobe".to_string());
        }

        let branch = if config.picoprobe {
            OPENOCD_PICOPROBE_BRANCH
        } else {
            OPENOCD_BRANCH
        };

        Self {
            url: clone_url(&config.github_prefix, OPENOCD_REPO),
            branch: branch.to_string(),
            dest: config.output_dir.join(OPENOCD_REPO),
            configure_args,
            jobs: config.jobs.max(1),
            sudo: platform.uses_sudo(),
        }
    }

    /// Clone, bootstrap, configure, build, install
    ///
    /// Always uses make: OpenOCD is an autotools project.
    pub fn commands(&self, parent: &std::path::Path) -> Vec<CommandSpec> {
        let make = BuildTool::Make { jobs: self.jobs };
        vec![
            CommandSpec::new("git")
                .args(["clone", self.url.as_str(), "-b", self.branch.as_str(), "--depth=1"])
                .arg(self.dest.display().to_string())
                .current_dir(parent),
            CommandSpec::new("sh").arg("./bootstrap").current_dir(&self.dest),
            CommandSpec::new("sh")
                .arg("./configure")
                .args(self.configure_args.iter().cloned())
                .current_dir(&self.dest),
            make.build_command(&self.dest, None),
            CommandSpec::privileged("make", self.sudo)
                .arg("install")
                .current_dir(&self.dest),
        ]
    }
}
