//! Integration tests for `pico-setup setup`
//!
//! Runs the binary in the MinGW64 shell. A state file recording every step
//! as done, plus the checkouts those steps would have created, lets the run
//! complete without touching the host.

mod common;

use common::TestProject;
use pico_setup::core::plan::Guard;
use pico_setup::core::platform::Platform;
use pico_setup::core::settings::CliOverrides;
use pico_setup::core::state::SetupState;
use serde_json::Value;

fn state_path(project: &TestProject) -> std::path::PathBuf {
    project.output_dir().join(".pico-setup").join("state.json")
}

/// Record every step of the MinGW64 plan as completed
fn complete_all_steps(project: &TestProject) {
    let plan = project.plan(Platform::WindowsMingw64, CliOverrides::default());
    let mut state = SetupState::default();
    for step in &plan.steps {
        state.mark_done(&step.name, &step.fingerprint());
        if let Guard::UnlessExists { path } = &step.guard {
            std::fs::create_dir_all(path).unwrap();
        }
    }
    state.save(&state_path(project)).unwrap();
}

#[test]
fn test_completed_state_makes_setup_a_no_op() {
    let project = TestProject::new();
    complete_all_steps(&project);

    let output = project.run(&["setup"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Resuming"));
    assert!(stdout.contains("Setup complete (0 step(s) run)"));
    assert!(!project.file_exists(".bashrc"));
}

#[test]
fn test_default_command_is_setup() {
    let project = TestProject::new();
    complete_all_steps(&project);

    // Defaults resolve to ./pico and $HOME/.bashrc, both inside the project.
    let output = project
        .command(&["--json"])
        .env("HOME", project.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "success");
    assert_eq!(report["platform"], "windows-mingw64");
}

#[test]
fn test_json_report_lists_decisions() {
    let project = TestProject::new();
    complete_all_steps(&project);

    let output = project.run(&["--json", "setup"]);
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps = report["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 17);
    assert_eq!(steps[0]["status"], "done");
    let uart = steps.iter().find(|s| s["name"] == "configure-uart").unwrap();
    assert_eq!(uart["status"], "skipped");
    assert!(report["notices"].as_array().unwrap().is_empty());
}

#[test]
fn test_fresh_discards_state() {
    let project = TestProject::new();
    complete_all_steps(&project);
    project.create_dir("empty-path");

    // With nothing on PATH the first step cannot spawn its package manager,
    // so the run stops right after starting over.
    let output = project
        .command(&["setup", "--fresh", "--quiet"])
        .arg("--output-dir")
        .arg(project.output_dir())
        .arg("--profile")
        .arg(project.profile())
        .env("PATH", project.path().join("empty-path"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Resuming"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("re-run pico-setup to resume"), "stderr: {stderr}");
    assert!(stderr.contains("pacman"), "stderr: {stderr}");

    let state = SetupState::load(&state_path(&project)).unwrap();
    assert!(state.completed.is_empty());
    assert_eq!(
        state.interrupted.map(|step| step.name).as_deref(),
        Some("install-dependencies")
    );
}

#[test]
fn test_deleted_checkout_is_not_hidden_by_state() {
    let project = TestProject::new();
    complete_all_steps(&project);
    std::fs::remove_dir_all(project.output_dir().join("pico-sdk")).unwrap();

    let output = project.run(&["--json", "plan"]);
    assert!(output.status.success());

    let plan: Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps = plan["steps"].as_array().unwrap();
    let clone = steps.iter().find(|s| s["name"] == "clone-pico-sdk").unwrap();
    assert_eq!(clone["decision"]["status"], "run");
    let examples = steps.iter().find(|s| s["name"] == "clone-pico-examples").unwrap();
    assert_eq!(examples["decision"]["status"], "done");
}

#[test]
fn test_corrupt_state_is_reported() {
    let project = TestProject::new();
    project.create_file("pico/.pico-setup/state.json", "{ broken");

    let output = project.run(&["setup"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("pico-setup reset"), "stderr: {stderr}");
}
