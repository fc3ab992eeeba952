//! Resume state
//!
//! Records which steps completed, keyed by name, together with the step
//! fingerprint at the time. A re-run skips a step only if both still match.
//! The step that failed is kept with the number of actions it finished, so a
//! checkout left behind by a half-done clone can be picked up again.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Current state file format
pub const STATE_VERSION: u32 = 1;

/// State file errors
#[derive(Error, Debug)]
pub enum StateError {
    /// Failed to read state file
    #[error("Failed to read state file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse state file
    #[error("Failed to parse state file '{path}': {error}. Run 'pico-setup reset' to start over")]
    ParseError { path: String, error: String },

    /// Failed to write state file
    #[error("Failed to write state file '{path}': {error}")]
    WriteError { path: String, error: String },

    /// Written by an incompatible version
    #[error("State file '{path}' has unsupported version {version}. Run 'pico-setup reset' to start over")]
    UnsupportedVersion { path: String, version: u32 },
}

/// A completed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedStep {
    /// Fingerprint of the step when it completed
    pub fingerprint: String,
    /// Completion time, seconds since the Unix epoch
    pub completed_at: u64,
}

/// A step that failed after some of its actions succeeded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptedStep {
    pub name: String,
    /// Fingerprint of the step when it failed
    pub fingerprint: String,
    /// Leading actions that finished before the failure
    pub actions_done: usize,
}

/// Persisted progress of previous runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupState {
    pub version: u32,
    #[serde(default)]
    pub completed: BTreeMap<String, CompletedStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupted: Option<InterruptedStep>,
}

impl Default for SetupState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            completed: BTreeMap::new(),
            interrupted: None,
        }
    }
}

impl SetupState {
    /// Load state, returning an empty state if the file does not exist
    pub fn load(path: &Path) -> Result<Self, StateError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| StateError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        let state: Self = serde_json::from_str(&content).map_err(|e| StateError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        if state.version != STATE_VERSION {
            return Err(StateError::UnsupportedVersion {
                path: path.display().to_string(),
                version: state.version,
            });
        }

        Ok(state)
    }

    /// Write state, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        let write_err = |error: String| StateError::WriteError {
            path: path.display().to_string(),
            error,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| write_err(e.to_string()))?;
        fs::write(path, content).map_err(|e| write_err(e.to_string()))
    }

    /// Whether `name` completed with this exact fingerprint
    pub fn is_done(&self, name: &str, fingerprint: &str) -> bool {
        self.completed
            .get(name)
            .is_some_and(|step| step.fingerprint == fingerprint)
    }

    /// Actions already finished by an earlier failed attempt at `name`
    ///
    /// `None` unless the failure was recorded with this exact fingerprint.
    pub fn resume_point(&self, name: &str, fingerprint: &str) -> Option<usize> {
        self.interrupted
            .as_ref()
            .filter(|step| step.name == name && step.fingerprint == fingerprint)
            .map(|step| step.actions_done)
    }

    /// Record that `name` failed after finishing `actions_done` actions
    pub fn mark_interrupted(&mut self, name: &str, fingerprint: &str, actions_done: usize) {
        self.interrupted = Some(InterruptedStep {
            name: name.to_string(),
            fingerprint: fingerprint.to_string(),
            actions_done,
        });
    }

    /// Record a completed step
    pub fn mark_done(&mut self, name: &str, fingerprint: &str) {
        if self.interrupted.as_ref().is_some_and(|step| step.name == name) {
            self.interrupted = None;
        }
        let completed_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.completed.insert(
            name.to_string(),
            CompletedStep {
                fingerprint: fingerprint.to_string(),
                completed_at,
            },
        );
    }
}
