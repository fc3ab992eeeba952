//! Dependency resolution
//!
//! Builds the OS package list for a platform and the requested skips, and the
//! single package-manager transaction that installs it.

use serde::Serialize;

use super::build_tool::BuildTool;
use super::command::CommandSpec;
use super::platform::Platform;
use super::settings::SkipFlags;

const APT_GIT: &[&str] = &["git"];
const APT_SDK: &[&str] = &[
    "cmake",
    "gcc-arm-none-eabi",
    "libnewlib-arm-none-eabi",
    "gcc",
    "g++",
    "build-essential",
    "pkg-config",
    "libusb-1.0-0-dev",
];
const APT_OPENOCD: &[&str] = &[
    "gdb-multiarch",
    "automake",
    "autoconf",
    "build-essential",
    "texinfo",
    "libtool",
    "libftdi-dev",
    "libusb-1.0-0-dev",
];
// The extra X libraries are needed for `code` to start on Raspberry Pi OS Lite.
const APT_VSCODE: &[&str] = &[
    "code",
    "libx11-xcb1",
    "libxcb-dri3-0",
    "libdrm2",
    "libgbm1",
    "libegl-mesa0",
];
const APT_UART: &[&str] = &["minicom"];
const APT_NINJA: &[&str] = &["ninja-build"];

const PACMAN_GIT: &[&str] = &["git"];
const PACMAN_SDK: &[&str] = &[
    "mingw-w64-x86_64-cmake",
    "mingw-w64-x86_64-arm-none-eabi-gcc",
    "mingw-w64-x86_64-gcc",
    "mingw-w64-x86_64-python",
    "mingw-w64-x86_64-libusb",
    "mingw-w64-x86_64-pkgconf",
];
const PACMAN_OPENOCD: &[&str] = &[
    "autoconf",
    "automake",
    "libtool",
    "texinfo",
    "make",
    "mingw-w64-x86_64-libftdi",
    "mingw-w64-x86_64-libusb",
    "mingw-w64-x86_64-gdb-multiarch",
];
const PACMAN_NINJA: &[&str] = &["mingw-w64-x86_64-ninja"];

/// Package manager driving the dependency transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Apt,
    Pacman,
}

impl PackageManager {
    /// Package manager used on a platform
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::WindowsMingw64 | Platform::WindowsMsysUnsupported => Self::Pacman,
            Platform::RaspberryPi | Platform::OtherLinux => Self::Apt,
        }
    }

    /// Binary name
    pub fn program(self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Pacman => "pacman",
        }
    }

    /// Commands installing `packages` in one transaction
    pub fn install_commands(self, packages: &[String]) -> Vec<CommandSpec> {
        match self {
            Self::Apt => vec![
                CommandSpec::privileged("apt", true).arg("update"),
                CommandSpec::privileged("apt", true)
                    .args(["install", "-y"])
                    .args(packages.iter().cloned()),
            ],
            Self::Pacman => vec![CommandSpec::new("pacman")
                .args(["-S", "--needed", "--noconfirm"])
                .args(packages.iter().cloned())],
        }
    }
}

/// Named group of packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyGroup {
    Git,
    Sdk,
    Ninja,
    OpenOcd,
    VsCode,
    Uart,
}

/// Resolved package list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySet {
    /// Package manager installing the set
    pub manager: PackageManager,
    /// Groups in install order
    pub groups: Vec<(DependencyGroup, Vec<String>)>,
}

impl DependencySet {
    /// All packages, in group order, without duplicates
    pub fn packages(&self) -> Vec<String> {
        let mut packages: Vec<String> = Vec::new();
        for package in self.groups.iter().flat_map(|(_, p)| p) {
            if !packages.contains(package) {
                packages.push(package.clone());
            }
        }
        packages
    }

    /// Whether a group is part of the set
    pub fn contains_group(&self, group: DependencyGroup) -> bool {
        self.groups.iter().any(|(g, _)| *g == group)
    }

    /// The package-manager commands for this set
    pub fn install_commands(&self) -> Vec<CommandSpec> {
        self.manager.install_commands(&self.packages())
    }
}

/// Apply platform restrictions to the requested skips
///
/// UART reconfiguration needs `raspi-config`, so it only runs on a Pi. VS Code
/// is not available from the MinGW64 package repositories.
pub fn effective_skips(platform: Platform, requested: SkipFlags) -> SkipFlags {
    SkipFlags {
        openocd: requested.openocd,
        vscode: requested.vscode || platform == Platform::WindowsMingw64,
        uart: requested.uart || platform != Platform::RaspberryPi,
    }
}

/// Compute the dependency set
///
/// `skips` must already have platform restrictions applied.
pub fn resolve_dependencies(
    platform: Platform,
    skips: SkipFlags,
    build_tool: BuildTool,
) -> DependencySet {
    let manager = PackageManager::for_platform(platform);
    let table = |group: DependencyGroup| -> &'static [&'static str] {
        match (manager, group) {
            (PackageManager::Apt, DependencyGroup::Git) => APT_GIT,
            (PackageManager::Apt, DependencyGroup::Sdk) => APT_SDK,
            (PackageManager::Apt, DependencyGroup::Ninja) => APT_NINJA,
            (PackageManager::Apt, DependencyGroup::OpenOcd) => APT_OPENOCD,
            (PackageManager::Apt, DependencyGroup::VsCode) => APT_VSCODE,
            (PackageManager::Apt, DependencyGroup::Uart) => APT_UART,
            (PackageManager::Pacman, DependencyGroup::Git) => PACMAN_GIT,
            (PackageManager::Pacman, DependencyGroup::Sdk) => PACMAN_SDK,
            (PackageManager::Pacman, DependencyGroup::Ninja) => PACMAN_NINJA,
            (PackageManager::Pacman, DependencyGroup::OpenOcd) => PACMAN_OPENOCD,
            (PackageManager::Pacman, DependencyGroup::VsCode | DependencyGroup::Uart) => &[],
        }
    };

    let wanted = [
        (DependencyGroup::Git, true),
        (DependencyGroup::Sdk, true),
        (DependencyGroup::Ninja, build_tool == BuildTool::Ninja),
        (DependencyGroup::OpenOcd, !skips.openocd),
        (DependencyGroup::VsCode, !skips.vscode),
        (DependencyGroup::Uart, !skips.uart),
    ];

    let groups = wanted
        .into_iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(group, _)| (group, table(group)))
        .filter(|(_, packages)| !packages.is_empty())
        .map(|(group, packages)| (group, packages.iter().map(|p| (*p).to_string()).collect()))
        .collect();

    DependencySet { manager, groups }
}
