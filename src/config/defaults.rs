//! Default configuration values

/// Default number of parallel build jobs
pub const DEFAULT_BUILD_JOBS: usize = 4;

/// Directory created under the working directory for all checkouts
pub const DEFAULT_OUTPUT_DIR: &str = "pico";

/// Shell profile that receives the `PICO_*_PATH` exports
pub const DEFAULT_PROFILE: &str = ".bashrc";

/// Branch checked out for the SDK repositories
pub const DEFAULT_SDK_BRANCH: &str = "master";

/// OpenOCD branch with picoprobe support
pub const OPENOCD_PICOPROBE_BRANCH: &str = "picoprobe";

/// OpenOCD branch without picoprobe support
pub const OPENOCD_BRANCH: &str = "rp2040";

/// Example targets built after configuring pico-examples
pub const EXAMPLE_TARGETS: &[&str] = &["blink", "hello_world"];

/// VS Code extensions installed when the IDE is not skipped
pub const VSCODE_EXTENSIONS: &[&str] = &[
    "marus25.cortex-debug",
    "ms-vscode.cmake-tools",
    "ms-vscode.cpptools",
];

/// Install directory for picotool on Linux hosts
pub const LINUX_INSTALL_DIR: &str = "/usr/local/bin";

/// Install directory for picotool under MSYS2 MinGW64
pub const MINGW64_INSTALL_DIR: &str = "/mingw64/bin";

/// Default location of the CPU information file
pub const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Directory inside the output directory holding resume state
pub const STATE_DIR: &str = ".pico-setup";

/// Resume state file name
pub const STATE_FILE: &str = "state.json";
