//! Process execution
//!
//! [`SystemExecutor`] performs plan actions against the real host.

use std::process::{Command, Stdio};

use super::{filesystem, profile};
use crate::core::command::CommandSpec;
use crate::core::plan::Action;
use crate::core::repos::export_line;
use crate::core::runner::Executor;
use crate::error::SetupError;

/// Executes actions on the host
///
/// With `capture` set, child output is collected instead of streamed to the
/// terminal; the output of the most recent command is kept for replay.
#[derive(Debug, Default)]
pub struct SystemExecutor {
    capture: bool,
    captured: String,
}

impl SystemExecutor {
    /// Executor streaming child output to the terminal
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor capturing child output
    pub fn capturing() -> Self {
        Self {
            capture: true,
            captured: String::new(),
        }
    }

    /// Output of the last captured command
    pub fn captured_output(&self) -> &str {
        &self.captured
    }

    fn run_command(&mut self, spec: &CommandSpec, env: &[(String, String)]) -> Result<(), SetupError> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }

        tracing::debug!(command = %spec, "Spawning");

        let spawn_error = |e: std::io::Error| SetupError::CommandSpawn {
            command: spec.to_string(),
            error: e.to_string(),
        };

        let status = if self.capture {
            let output = command
                .stdin(Stdio::null())
                .output()
                .map_err(spawn_error)?;
            self.captured = format!(
                "{}{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
            output.status
        } else {
            command.status().map_err(spawn_error)?
        };

        if status.success() {
            Ok(())
        } else {
            Err(SetupError::CommandFailed {
                command: spec.to_string(),
                status: status.to_string(),
            })
        }
    }
}

impl Executor for SystemExecutor {
    fn execute(&mut self, action: &Action, env: &[(String, String)]) -> Result<(), SetupError> {
        match action {
            Action::Run(spec) => self.run_command(spec, env),
            Action::CreateDir { path } => Ok(filesystem::create_dir_all(path)?),
            Action::Export {
                name,
                value,
                profile: path,
            } => {
                tracing::info!(variable = %name, profile = %path.display(), "Adding export");
                profile::append_line(path, &export_line(name, value))
            }
            Action::Notice { .. } => Ok(()),
        }
    }
}
