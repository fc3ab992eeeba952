//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use pico_setup::core::plan::{build_plan, Action, Plan};
use pico_setup::core::platform::{Detection, Platform};
use pico_setup::core::runner::Executor;
use pico_setup::core::settings::{CliOverrides, ConfigFile, EnvOverrides, SetupConfig};
use pico_setup::error::SetupError;

/// Variables that would leak host configuration into a test run
const SCRUBBED_ENV: &[&str] = &[
    "SKIP_OPENOCD",
    "SKIP_VSCODE",
    "SKIP_UART",
    "PICO_SETUP_NINJA",
    "PICO_SETUP_JOBS",
    "PICO_SETUP_CONFIG",
    "PICO_SETUP_CPUINFO",
    "RUST_LOG",
];

/// Test project context
///
/// A temporary working directory with its own config directory, output
/// directory and shell profile.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Output directory used by the project
    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("pico")
    }

    /// Shell profile used by the project
    pub fn profile(&self) -> PathBuf {
        self.dir.path().join(".bashrc")
    }

    /// Config directory used by the project
    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Resolved configuration pointing at this project
    pub fn config(&self, cli: CliOverrides) -> SetupConfig {
        let cli = CliOverrides {
            output_dir: Some(self.output_dir()),
            profile: Some(self.profile()),
            ..cli
        };
        SetupConfig::resolve(
            &ConfigFile::default(),
            &EnvOverrides::default(),
            &cli,
            self.dir.path(),
            None,
        )
        .expect("Failed to resolve configuration")
    }

    /// Plan for this project on `platform`
    pub fn plan(&self, platform: Platform, cli: CliOverrides) -> Plan {
        build_plan(
            &self.config(cli),
            &Detection {
                platform,
                model: None,
            },
        )
    }

    /// Command running the binary inside this project with a clean environment
    ///
    /// Defaults to the MinGW64 shell so detection does not depend on the host.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_pico-setup"));
        cmd.current_dir(self.dir.path());
        for name in SCRUBBED_ENV {
            cmd.env_remove(name);
        }
        cmd.env("MSYSTEM", "MINGW64");
        cmd.env("PICO_SETUP_CONFIG_DIR", self.config_dir());
        cmd.args(args);
        cmd
    }

    /// Run the binary with the project's output directory and profile
    pub fn run(&self, args: &[&str]) -> Output {
        let output_dir = self.output_dir();
        let profile = self.profile();
        let mut cmd = self.command(args);
        cmd.arg("--output-dir").arg(&output_dir);
        cmd.arg("--profile").arg(&profile);
        cmd.output().expect("Failed to execute pico-setup")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Executor that records actions instead of touching the host
///
/// Directory and export actions are applied for real so guards and the
/// profile can be inspected afterwards. `clone` commands create their
/// destination directory.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    /// Rendered actions in execution order
    pub actions: Vec<String>,
    /// Fail the first command whose rendering contains this text
    pub fail_on: Option<String>,
    /// Environment seen by the last command
    pub last_env: Vec<(String, String)>,
}

impl RecordingExecutor {
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            ..Self::default()
        }
    }

    /// Recorded commands containing `needle`
    pub fn matching(&self, needle: &str) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|a| a.contains(needle))
            .map(String::as_str)
            .collect()
    }
}

impl Executor for RecordingExecutor {
    fn execute(&mut self, action: &Action, env: &[(String, String)]) -> Result<(), SetupError> {
        let rendered = action.to_string();
        if let Some(needle) = &self.fail_on {
            if rendered.contains(needle.as_str()) {
                return Err(SetupError::CommandFailed {
                    command: rendered,
                    status: "exit status: 1".to_string(),
                });
            }
        }

        match action {
            Action::Run(spec) => {
                self.last_env = env.to_vec();
                if spec.program == "git" && spec.args.first().map(String::as_str) == Some("clone") {
                    if let Some(dest) = spec.args.last() {
                        std::fs::create_dir_all(dest).expect("Failed to create clone destination");
                    }
                }
            }
            Action::CreateDir { path } => {
                std::fs::create_dir_all(path).expect("Failed to create directory");
            }
            Action::Export {
                name,
                value,
                profile,
            } => append(profile, &format!("export {name}={}\n", value.display())),
            Action::Notice { .. } => {}
        }

        self.actions.push(rendered);
        Ok(())
    }
}

fn append(path: &Path, line: &str) {
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .expect("Failed to open profile");
    file.write_all(line.as_bytes()).expect("Failed to write profile");
}
