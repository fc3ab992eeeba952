//! External command descriptions
//!
//! A [`CommandSpec`] is data only; [`crate::infra::process`] spawns it.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A single external command invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,
    /// Arguments in order
    pub args: Vec<String>,
    /// Working directory (inherits the caller's when `None`)
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a command with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Create a command, prefixed with `sudo` when requested
    pub fn privileged(program: impl Into<String>, sudo: bool) -> Self {
        if sudo {
            Self::new("sudo").arg(program)
        } else {
            Self::new(program)
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory
    #[must_use]
    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Program and arguments joined with spaces
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cwd {
            Some(dir) => write!(f, "(cd {} && {})", dir.display(), self.command_line()),
            None => f.write_str(&self.command_line()),
        }
    }
}
