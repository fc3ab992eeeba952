//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod doctor;
pub mod plan;
pub mod reset;
pub mod setup;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::core::plan::{build_plan, Plan};
use crate::core::platform::{detect, Detection, Platform};
use crate::core::settings::{CliOverrides, ConfigFile, EnvOverrides, SetupConfig};
use crate::infra::dirs::SetupDirs;
use crate::infra::host::probe_host;

use super::output::print_warning;

/// Environment variable naming the config file
pub const ENV_CONFIG_FILE: &str = "PICO_SETUP_CONFIG";

/// Configuration flags shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Config file (default: <config dir>/config.toml)
    #[arg(long, env = ENV_CONFIG_FILE, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory the repositories are cloned into (default: ./pico)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Shell profile receiving the PICO_*_PATH exports (default: ~/.bashrc)
    #[arg(long, value_name = "FILE")]
    pub profile: Option<PathBuf>,

    /// Parallel build jobs, 0 for one per CPU
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Build with Ninja instead of make
    #[arg(long)]
    pub ninja: bool,

    /// Do not build OpenOCD
    #[arg(long)]
    pub skip_openocd: bool,

    /// Do not install VS Code and its extensions
    #[arg(long)]
    pub skip_vscode: bool,

    /// Do not enable the UART serial console
    #[arg(long)]
    pub skip_uart: bool,

    /// Build OpenOCD from the rp2040 branch without picoprobe support
    #[arg(long)]
    pub no_picoprobe: bool,

    /// Branch to clone the SDK repositories from
    #[arg(long)]
    pub branch: Option<String>,
}

impl ConfigArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            output_dir: self.output_dir.clone(),
            profile: self.profile.clone(),
            jobs: self.jobs,
            ninja: self.ninja,
            skip_openocd: self.skip_openocd,
            skip_vscode: self.skip_vscode,
            skip_uart: self.skip_uart,
            no_picoprobe: self.no_picoprobe,
            branch: self.branch.clone(),
        }
    }

    /// Merge the config file, environment and these flags
    pub fn resolve(&self) -> Result<SetupConfig> {
        let config_path = self
            .config
            .clone()
            .or_else(|| std::env::var_os(ENV_CONFIG_FILE).map(PathBuf::from))
            .unwrap_or_else(|| SetupDirs::new().config_path());
        let file = ConfigFile::load_from_path(&config_path)?;
        let env = EnvOverrides::from_env()?;
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        let home = SetupDirs::home_dir();

        let config = SetupConfig::resolve(&file, &env, &self.overrides(), &cwd, home.as_deref())?;
        tracing::debug!(?config, config_file = %config_path.display(), "Resolved configuration");
        Ok(config)
    }
}

/// Everything a command needs to reason about the host
pub struct Session {
    pub config: SetupConfig,
    pub detection: Detection,
    pub plan: Plan,
}

impl Session {
    /// Resolve configuration, detect the platform and build the plan
    pub fn load(args: &ConfigArgs) -> Result<Self> {
        let config = args.resolve()?;
        let detection = detect(&probe_host())?;

        match detection.platform {
            Platform::RaspberryPi => {
                if let Some(model) = &detection.model {
                    tracing::info!(%model, "Detected Raspberry Pi");
                }
            }
            Platform::OtherLinux => {
                print_warning("Not running on a Raspberry Pi. This is untested, use at your own risk");
            }
            Platform::WindowsMingw64 | Platform::WindowsMsysUnsupported => {}
        }

        let plan = build_plan(&config, &detection);
        Ok(Self {
            config,
            detection,
            plan,
        })
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install dependencies, fetch the Pico repositories and build the tools
    Setup {
        #[command(flatten)]
        config: ConfigArgs,

        /// Forget completed steps and start over
        #[arg(long)]
        fresh: bool,
    },

    /// Show the steps setup would run without executing anything
    Plan {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Check host tools and SDK paths
    Doctor {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Delete the resume state so the next setup starts over
    Reset {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

impl Commands {
    /// Execute the command
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Setup { config, fresh } => setup::execute(&config, fresh),
            Commands::Plan { config } => plan::execute(&config),
            Commands::Doctor { config } => doctor::execute(&config),
            Commands::Reset { config } => reset::execute(&config),
        }
    }
}
