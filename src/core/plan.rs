//! Declarative setup plan
//!
//! [`build_plan`] turns a [`SetupConfig`] and a [`Detection`] into an ordered
//! list of [`Step`]s. Nothing here touches the host; guards that depend on the
//! filesystem are evaluated by the runner at execution time.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

use super::build_tool::BuildTool;
use super::command::CommandSpec;
use super::deps::{effective_skips, resolve_dependencies, DependencySet};
use super::openocd::OpenOcdBuild;
use super::platform::{Detection, Platform};
use super::repos::{sdk_environment, sdk_repositories, tool_repositories};
use super::settings::{SetupConfig, SkipFlags, ENV_SKIP_OPENOCD, ENV_SKIP_UART, ENV_SKIP_VSCODE};
use crate::config::defaults::{EXAMPLE_TARGETS, VSCODE_EXTENSIONS};

/// One unit of work inside a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Run an external command
    Run(CommandSpec),
    /// Create a directory and its parents
    CreateDir { path: PathBuf },
    /// Append an `export` line to the shell profile
    Export {
        name: String,
        value: PathBuf,
        profile: PathBuf,
    },
    /// Message for the user once the run finishes
    Notice { message: String },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Run(command) => write!(f, "{command}"),
            Self::CreateDir { path } => write!(f, "mkdir -p {}", path.display()),
            Self::Export {
                name,
                value,
                profile,
            } => write!(
                f,
                "echo 'export {name}={}' >> {}",
                value.display(),
                profile.display()
            ),
            Self::Notice { message } => write!(f, "note: {message}"),
        }
    }
}

/// Condition deciding whether a step runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Guard {
    /// Always run
    Always,
    /// Never run, with the reason shown to the user
    Disabled { reason: String },
    /// Run only when `path` does not exist yet
    UnlessExists { path: PathBuf },
}

/// A named step of the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Unique, stable name used in the resume state
    pub name: String,
    /// Human readable summary
    pub description: String,
    /// Run condition
    pub guard: Guard,
    /// Actions executed in order
    pub actions: Vec<Action>,
}

impl Step {
    fn new(name: impl Into<String>, description: impl Into<String>, guard: Guard) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            guard,
            actions: Vec::new(),
        }
    }

    fn run(mut self, command: CommandSpec) -> Self {
        self.actions.push(Action::Run(command));
        self
    }

    fn run_all(mut self, commands: impl IntoIterator<Item = CommandSpec>) -> Self {
        self.actions.extend(commands.into_iter().map(Action::Run));
        self
    }

    fn then(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// SHA-256 over the rendered actions
    ///
    /// Changes whenever the step would do something different, e.g. a new
    /// package list or job count.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        for action in &self.actions {
            hasher.update(b"\n");
            hasher.update(action.to_string().as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Everything one run will do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub platform: Platform,
    pub model: Option<String>,
    pub build_tool: BuildTool,
    /// Skips after platform restrictions
    pub skips: SkipFlags,
    pub dependencies: DependencySet,
    /// Variables set on every spawned command
    pub environment: Vec<(String, String)>,
    pub steps: Vec<Step>,
}

impl Plan {
    /// Look up a step by name
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }
}

fn optional_guard(
    skipped: bool,
    requested: bool,
    variable: &str,
    platform: Platform,
    otherwise: Guard,
) -> Guard {
    match (skipped, requested) {
        (true, true) => Guard::Disabled {
            reason: format!("skipped by configuration ({variable})"),
        },
        (true, false) => Guard::Disabled {
            reason: format!("not available on {platform}"),
        },
        (false, _) => otherwise,
    }
}

/// Build the ordered step list
pub fn build_plan(config: &SetupConfig, detection: &Detection) -> Plan {
    let platform = detection.platform;
    let build_tool = BuildTool::select(platform, config);
    let skips = effective_skips(platform, config.skip);
    let dependencies = resolve_dependencies(platform, skips, build_tool);
    let out = &config.output_dir;
    let mut steps = Vec::new();

    steps.push(
        Step::new(
            "install-dependencies",
            format!("Install {} packages", dependencies.manager.program()),
            Guard::Always,
        )
        .run_all(dependencies.install_commands()),
    );

    steps.push(
        Step::new("create-output-dir", format!("Create {}", out.display()), Guard::Always)
            .then(Action::CreateDir { path: out.clone() }),
    );

    for repo in sdk_repositories(config) {
        let mut step = Step::new(
            format!("clone-{}", repo.name),
            format!("Clone {}", repo.name),
            Guard::UnlessExists {
                path: repo.dest.clone(),
            },
        )
        .run_all(repo.clone_commands(out));
        if let Some(var) = &repo.export {
            step = step.then(Action::Export {
                name: var.clone(),
                value: repo.dest.clone(),
                profile: config.profile.clone(),
            });
        }
        steps.push(step);
    }

    let examples_build = out.join("pico-examples").join("build");
    steps.push(
        Step::new("configure-examples", "Configure pico-examples", Guard::Always)
            .then(Action::CreateDir {
                path: examples_build.clone(),
            })
            .run(build_tool.configure_command(&examples_build, &["-DCMAKE_BUILD_TYPE=Debug"])),
    );
    for target in EXAMPLE_TARGETS {
        steps.push(
            Step::new(
                format!("build-example-{target}"),
                format!("Build example {target}"),
                Guard::Always,
            )
            .run(build_tool.build_command(&examples_build, Some(*target))),
        );
    }

    for repo in tool_repositories(config) {
        steps.push(
            Step::new(
                format!("clone-{}", repo.name),
                format!("Clone {}", repo.name),
                Guard::UnlessExists {
                    path: repo.dest.clone(),
                },
            )
            .run_all(repo.clone_commands(out)),
        );

        let build_dir = repo.dest.join("build");
        steps.push(
            Step::new(
                format!("build-{}", repo.name),
                format!("Build {}", repo.name),
                Guard::Always,
            )
            .then(Action::CreateDir {
                path: build_dir.clone(),
            })
            .run(build_tool.configure_command(&build_dir, &[]))
            .run(build_tool.build_command(&build_dir, None)),
        );
    }

    let picotool = format!("picotool{}", platform.exe_suffix());
    steps.push(
        Step::new(
            "install-picotool",
            format!("Install picotool to {}", platform.install_dir()),
            Guard::Always,
        )
        .run(
            CommandSpec::privileged("cp", platform.uses_sudo())
                .arg(picotool)
                .arg(format!("{}/", platform.install_dir()))
                .current_dir(&out.join("picotool").join("build")),
        ),
    );

    let openocd = OpenOcdBuild::new(config, platform);
    steps.push(
        Step::new(
            "build-openocd",
            "Build and install OpenOCD",
            optional_guard(
                skips.openocd,
                config.skip.openocd,
                ENV_SKIP_OPENOCD,
                platform,
                Guard::UnlessExists {
                    path: openocd.dest.clone(),
                },
            ),
        )
        .run_all(openocd.commands(out)),
    );

    steps.push(
        Step::new(
            "install-vscode-extensions",
            "Install VS Code extensions",
            optional_guard(
                skips.vscode,
                config.skip.vscode,
                ENV_SKIP_VSCODE,
                platform,
                Guard::Always,
            ),
        )
        .run_all(
            VSCODE_EXTENSIONS
                .iter()
                .map(|ext| CommandSpec::new("code").args(["--install-extension", *ext])),
        ),
    );

    steps.push(
        Step::new(
            "configure-uart",
            "Disable the Linux serial console so the UART is free for the Pico",
            optional_guard(
                skips.uart,
                config.skip.uart,
                ENV_SKIP_UART,
                platform,
                Guard::Always,
            ),
        )
        .run(CommandSpec::privileged("raspi-config", true).args(["nonint", "do_serial", "2"]))
        .then(Action::Notice {
            message: "You must run sudo reboot to finish UART setup".to_string(),
        }),
    );

    Plan {
        platform,
        model: detection.model.clone(),
        build_tool,
        skips,
        dependencies,
        environment: sdk_environment(config),
        steps,
    }
}
