//! Host platform classification
//!
//! Detection is a pure function of [`HostFacts`], which the infra layer
//! gathers from the running system (see [`crate::infra::host`]).

use serde::Serialize;
use std::fmt;

use crate::config::defaults::{LINUX_INSTALL_DIR, MINGW64_INSTALL_DIR};
use crate::error::SetupError;

/// Shell variant that can be provisioned on Windows
const SUPPORTED_MSYSTEM: &str = "MINGW64";

/// Raw facts about the host, gathered before any side effect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    /// `std::env::consts::OS` of the running binary
    pub os: String,
    /// Value of `MSYSTEM`, set by MSYS2 shells
    pub msystem: Option<String>,
    /// Contents of the CPU information file, if readable
    pub cpuinfo: Option<String>,
    /// Whether `dpkg-query` is on PATH
    pub has_package_query: bool,
}

/// Host classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// Raspberry Pi running an apt-based OS
    RaspberryPi,
    /// MSYS2 MinGW64 shell on Windows
    WindowsMingw64,
    /// Any other Windows shell variant
    WindowsMsysUnsupported,
    /// Untested generic Linux
    OtherLinux,
}

impl Platform {
    /// Stable identifier used in logs and JSON output
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RaspberryPi => "raspberry-pi",
            Self::WindowsMingw64 => "windows-mingw64",
            Self::WindowsMsysUnsupported => "windows-msys-unsupported",
            Self::OtherLinux => "other-linux",
        }
    }

    /// Whether system-wide changes must go through `sudo`
    pub fn uses_sudo(self) -> bool {
        !matches!(self, Self::WindowsMingw64)
    }

    /// Executable suffix for binaries built on this platform
    pub fn exe_suffix(self) -> &'static str {
        match self {
            Self::WindowsMingw64 | Self::WindowsMsysUnsupported => ".exe",
            Self::RaspberryPi | Self::OtherLinux => "",
        }
    }

    /// Directory picotool is installed into
    pub fn install_dir(self) -> &'static str {
        match self {
            Self::WindowsMingw64 | Self::WindowsMsysUnsupported => MINGW64_INSTALL_DIR,
            Self::RaspberryPi | Self::OtherLinux => LINUX_INSTALL_DIR,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    /// Supported platform
    pub platform: Platform,
    /// Board model reported by the CPU information file
    pub model: Option<String>,
}

/// Classify the host without judging whether it is supported
pub fn classify(facts: &HostFacts) -> Platform {
    if let Some(msystem) = facts.msystem.as_deref().filter(|m| !m.is_empty()) {
        return if msystem.eq_ignore_ascii_case(SUPPORTED_MSYSTEM) {
            Platform::WindowsMingw64
        } else {
            Platform::WindowsMsysUnsupported
        };
    }

    if facts.os == "windows" {
        return Platform::WindowsMsysUnsupported;
    }

    if facts
        .cpuinfo
        .as_deref()
        .is_some_and(|info| info.contains("Raspberry"))
    {
        Platform::RaspberryPi
    } else {
        Platform::OtherLinux
    }
}

/// Detect the host platform, failing on anything that cannot be provisioned
pub fn detect(facts: &HostFacts) -> Result<Detection, SetupError> {
    let platform = classify(facts);

    match platform {
        Platform::WindowsMsysUnsupported => {
            let reason = match facts.msystem.as_deref() {
                Some(m) if !m.is_empty() => {
                    format!("MSYSTEM={m}; run from the MSYS2 MinGW64 shell")
                }
                _ => "native Windows; run from the MSYS2 MinGW64 shell".to_string(),
            };
            Err(SetupError::UnsupportedEnvironment {
                platform: platform.to_string(),
                reason,
            })
        }
        Platform::RaspberryPi | Platform::OtherLinux if !facts.has_package_query => {
            Err(SetupError::UnsupportedEnvironment {
                platform: platform.to_string(),
                reason: "dpkg-query not found; an apt-based distribution is required".to_string(),
            })
        }
        Platform::RaspberryPi => Ok(Detection {
            platform,
            model: facts.cpuinfo.as_deref().and_then(board_model),
        }),
        Platform::WindowsMingw64 | Platform::OtherLinux => Ok(Detection {
            platform,
            model: None,
        }),
    }
}

/// Extract the `Model` line from CPU information
pub fn board_model(cpuinfo: &str) -> Option<String> {
    let re = regex::Regex::new(r"(?m)^Model\s*:\s*(.+?)\s*$").ok()?;
    re.captures(cpuinfo)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
