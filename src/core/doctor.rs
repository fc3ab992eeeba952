//! Host readiness checks
//!
//! Splits the tools a plan depends on into prerequisites, which must exist
//! before `setup` can run, and tools `setup` installs itself. Each SDK
//! variable the build steps export is checked against the filesystem.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::build_tool::BuildTool;
use super::plan::Plan;
use super::platform::Platform;

/// Where a checked tool is expected to come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOrigin {
    /// Needed before `setup` can run
    Prerequisite,
    /// Installed or built by `setup`
    InstalledBySetup,
}

/// A tool found on PATH
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolLocation {
    pub path: PathBuf,
    /// First version number printed by `--version`
    pub version: Option<String>,
}

/// One host tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolCheck {
    pub label: String,
    /// Binary looked up on PATH
    pub command: String,
    pub origin: ToolOrigin,
    pub found: Option<ToolLocation>,
    /// What to do when the tool is missing
    pub hint: String,
}

impl ToolCheck {
    pub fn is_missing(&self) -> bool {
        self.found.is_none()
    }
}

/// One `PICO_*_PATH` variable and its checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SdkPathCheck {
    pub variable: String,
    pub path: PathBuf,
    pub present: bool,
}

/// Overall readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Everything is installed and checked out
    Ready,
    /// Prerequisites are present; `setup` will fill in the rest
    NeedsSetup,
    /// A prerequisite is missing, so `setup` cannot run
    Blocked,
}

/// Everything `doctor` found
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub platform: Platform,
    pub tools: Vec<ToolCheck>,
    pub sdk_paths: Vec<SdkPathCheck>,
}

impl DoctorReport {
    /// Tools of one origin, in check order
    pub fn tools_from(&self, origin: ToolOrigin) -> impl Iterator<Item = &ToolCheck> {
        self.tools.iter().filter(move |tool| tool.origin == origin)
    }

    /// Prerequisites not found on PATH
    pub fn missing_prerequisites(&self) -> Vec<&ToolCheck> {
        self.tools_from(ToolOrigin::Prerequisite)
            .filter(|tool| tool.is_missing())
            .collect()
    }

    pub fn verdict(&self) -> Verdict {
        if !self.missing_prerequisites().is_empty() {
            Verdict::Blocked
        } else if self.tools.iter().any(ToolCheck::is_missing)
            || self.sdk_paths.iter().any(|sdk| !sdk.present)
        {
            Verdict::NeedsSetup
        } else {
            Verdict::Ready
        }
    }
}

/// Find `command` on PATH and ask it for its version
pub fn locate(command: &str) -> Option<ToolLocation> {
    let path = which::which(command).ok()?;
    let version = std::process::Command::new(&path)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            parse_version(&format!("{stdout}{stderr}"))
        });
    Some(ToolLocation { path, version })
}

// `--version` banners put the number on the first line that has one.
fn parse_version(banner: &str) -> Option<String> {
    let number = regex::Regex::new(r"\b(\d+\.\d+(?:\.\d+)?)").ok()?;
    banner
        .lines()
        .find_map(|line| number.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn tool(label: &str, command: &str, origin: ToolOrigin, hint: &str) -> ToolCheck {
    ToolCheck {
        label: label.to_string(),
        command: command.to_string(),
        origin,
        found: locate(command),
        hint: hint.to_string(),
    }
}

/// The SDK variables a plan exports, checked against the filesystem
pub fn check_sdk_paths(environment: &[(String, String)]) -> Vec<SdkPathCheck> {
    environment
        .iter()
        .map(|(variable, path)| SdkPathCheck {
            variable: variable.clone(),
            path: PathBuf::from(path),
            present: Path::new(path).is_dir(),
        })
        .collect()
}

/// Check the host against a plan
pub fn run_doctor(plan: &Plan) -> DoctorReport {
    use ToolOrigin::{InstalledBySetup, Prerequisite};

    let mut tools = vec![tool(
        "Package manager",
        plan.dependencies.manager.program(),
        Prerequisite,
        "pico-setup needs apt (Raspberry Pi OS, Debian, Ubuntu) or MSYS2 pacman",
    )];
    if plan.platform.uses_sudo() {
        tools.push(tool(
            "sudo",
            "sudo",
            Prerequisite,
            "Install sudo and add your user to the sudo group",
        ));
    }
    if plan.platform == Platform::RaspberryPi && !plan.skips.uart {
        tools.push(tool(
            "raspi-config",
            "raspi-config",
            Prerequisite,
            "Install raspi-config or re-run with --skip-uart",
        ));
    }

    let installs = "installed by 'pico-setup'";
    let build_tool = match plan.build_tool {
        BuildTool::Ninja => "ninja",
        BuildTool::Make { .. } => "make",
    };
    tools.push(tool("Git", "git", InstalledBySetup, installs));
    tools.push(tool("CMake", "cmake", InstalledBySetup, installs));
    tools.push(tool("Build tool", build_tool, InstalledBySetup, installs));
    tools.push(tool("Arm GCC", "arm-none-eabi-gcc", InstalledBySetup, installs));
    tools.push(tool("picotool", "picotool", InstalledBySetup, "built and installed by 'pico-setup'"));
    if !plan.skips.openocd {
        tools.push(tool("OpenOCD", "openocd", InstalledBySetup, "built by 'pico-setup'"));
    }
    if !plan.skips.vscode {
        tools.push(tool("VS Code", "code", InstalledBySetup, installs));
    }

    DoctorReport {
        platform: plan.platform,
        tools,
        sdk_paths: check_sdk_paths(&plan.environment),
    }
}
