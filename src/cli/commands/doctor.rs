//! CLI command for `pico-setup doctor`
//!
//! Reports whether `setup` can run on this host and what it would still
//! have to install or check out.

use anyhow::{bail, Result};

use super::{ConfigArgs, Session};
use crate::cli::output::{is_json, is_quiet, print_detail, print_info, print_success, print_warning, status};
use crate::core::doctor::{run_doctor, DoctorReport, ToolCheck, ToolOrigin, Verdict};

/// Execute the doctor command
pub fn execute(args: &ConfigArgs) -> Result<()> {
    let session = Session::load(args)?;
    let report = run_doctor(&session.plan);

    if is_json() {
        print_json(&report);
    } else if is_quiet() {
        for tool in report.missing_prerequisites() {
            eprintln!("{} {} ({}) not found", status::ERROR, tool.label, tool.command);
        }
    } else {
        print_human(&report);
    }

    if report.verdict() == Verdict::Blocked {
        let missing: Vec<&str> = report
            .missing_prerequisites()
            .iter()
            .map(|tool| tool.command.as_str())
            .collect();
        bail!("pico-setup cannot run here: {} not found", missing.join(", "));
    }
    Ok(())
}

fn print_json(report: &DoctorReport) {
    let tools = |origin| report.tools_from(origin).collect::<Vec<_>>();
    let json_result = serde_json::json!({
        "verdict": report.verdict(),
        "platform": report.platform,
        "prerequisites": tools(ToolOrigin::Prerequisite),
        "installed_by_setup": tools(ToolOrigin::InstalledBySetup),
        "sdk_paths": report
            .sdk_paths
            .iter()
            .map(|sdk| (sdk.variable.clone(), serde_json::json!({
                "path": sdk.path,
                "present": sdk.present,
            })))
            .collect::<serde_json::Map<_, _>>(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&json_result).unwrap_or_default()
    );
}

fn print_tool(tool: &ToolCheck, missing_marker: &str) {
    match &tool.found {
        Some(location) => {
            let version = location
                .version
                .as_ref()
                .map(|v| format!(" {v}"))
                .unwrap_or_default();
            println!(
                "  {} {}{version} ({})",
                status::SUCCESS,
                tool.label,
                location.path.display()
            );
        }
        None => {
            println!("  {missing_marker} {} ({})", tool.label, tool.command);
            print_detail(&tool.hint);
        }
    }
}

fn print_human(report: &DoctorReport) {
    print_info(&format!("Checking {} host", report.platform));

    println!();
    println!("Prerequisites:");
    for tool in report.tools_from(ToolOrigin::Prerequisite) {
        print_tool(tool, status::ERROR);
    }

    println!();
    println!("Installed by pico-setup:");
    for tool in report.tools_from(ToolOrigin::InstalledBySetup) {
        print_tool(tool, status::SKIPPED);
    }

    println!();
    println!("SDK checkouts:");
    for sdk in &report.sdk_paths {
        let marker = if sdk.present { status::SUCCESS } else { status::SKIPPED };
        println!("  {marker} {}={}", sdk.variable, sdk.path.display());
    }

    println!();
    match report.verdict() {
        Verdict::Ready => print_success("Host is ready for Pico development"),
        Verdict::NeedsSetup => {
            print_warning("Prerequisites found; run 'pico-setup' to install the rest");
        }
        Verdict::Blocked => {}
    }
}
