//! CLI command for `pico-setup setup`
//!
//! Runs the plan against the host, resuming after the last completed step.

use anyhow::{Context, Result};
use indicatif::ProgressBar;

use super::{ConfigArgs, Session};
use crate::cli::output::{
    create_spinner, is_json, is_quiet, print_detail, print_info, print_success, print_warning,
    status, verbosity,
};
use crate::core::runner::{RunEvent, Runner};
use crate::core::state::SetupState;
use crate::infra::filesystem::remove_file_if_exists;
use crate::infra::process::SystemExecutor;

/// Execute the setup command
pub fn execute(args: &ConfigArgs, fresh: bool) -> Result<()> {
    let session = Session::load(args)?;
    let state_path = session.config.state_path();

    if fresh && remove_file_if_exists(&state_path)? {
        tracing::info!(path = %state_path.display(), "Discarded resume state");
    }
    let state = SetupState::load(&state_path)?;
    if !state.completed.is_empty() {
        print_info(&format!(
            "Resuming: {} step(s) completed by an earlier run",
            state.completed.len()
        ));
    }

    print_info(&format!(
        "Setting up Pico development on {} in {}",
        session.detection.platform,
        session.config.output_dir.display()
    ));

    let capture = is_quiet() || is_json();
    let mut executor = if capture {
        SystemExecutor::capturing()
    } else {
        SystemExecutor::new()
    };

    let mut spinner: Option<ProgressBar> = None;
    let result = Runner::new(&mut executor, state)
        .persist_to(state_path)
        .run(&session.plan, |event| match event {
            RunEvent::Starting(step) => {
                if capture {
                    spinner = Some(create_spinner(&step.description));
                } else {
                    print_info(&step.description);
                }
            }
            RunEvent::Finished(step) => {
                if let Some(pb) = spinner.take() {
                    pb.finish_and_clear();
                }
                print_success(&step.name);
            }
            RunEvent::AlreadyDone(step) => {
                if verbosity() > 0 {
                    print_detail(&format!("{} {} (already done)", status::SKIPPED, step.name));
                }
            }
            RunEvent::Skipped(step, reason) => {
                print_detail(&format!("{} {} ({reason})", status::SKIPPED, step.name));
            }
        });

    if let Some(pb) = spinner.take() {
        pb.abandon();
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            let output = executor.captured_output();
            if !output.is_empty() {
                eprintln!("{output}");
            }
            return Err(e).context("Setup stopped; re-run pico-setup to resume from the failed step");
        }
    };

    if is_json() {
        let json_result = serde_json::json!({
            "status": "success",
            "platform": session.detection.platform,
            "model": session.detection.model,
            "output_dir": session.config.output_dir,
            "steps": report.outcomes,
            "notices": report.notices,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json_result).unwrap_or_default()
        );
        return Ok(());
    }

    println!();
    print_success(&format!(
        "Setup complete ({} step(s) run)",
        report.executed().len()
    ));
    if report.executed().iter().any(|name| name.starts_with("clone-pico-")) {
        print_detail(&format!(
            "Open a new shell or source {} to pick up the PICO_*_PATH variables",
            session.config.profile.display()
        ));
    }
    for notice in &report.notices {
        print_warning(notice);
    }

    Ok(())
}
