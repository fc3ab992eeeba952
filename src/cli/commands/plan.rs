//! CLI command for `pico-setup plan`
//!
//! Prints what `setup` would do, step by step, without executing anything.

use anyhow::Result;

use super::{ConfigArgs, Session};
use crate::cli::output::{is_json, is_quiet, print_detail, print_info, status};
use crate::core::runner::{preview, Decision};
use crate::core::state::SetupState;

/// Execute the plan command
pub fn execute(args: &ConfigArgs) -> Result<()> {
    let session = Session::load(args)?;
    let plan = &session.plan;
    let state = SetupState::load(&session.config.state_path())?;
    let decisions = preview(plan, &state);

    if is_json() {
        let json_result = serde_json::json!({
            "platform": plan.platform,
            "model": plan.model,
            "output_dir": session.config.output_dir,
            "profile": session.config.profile,
            "build_tool": plan.build_tool,
            "skips": plan.skips,
            "package_manager": plan.dependencies.manager,
            "packages": plan.dependencies.packages(),
            "environment": plan
                .environment
                .iter()
                .map(|(name, value)| (name.clone(), serde_json::Value::from(value.clone())))
                .collect::<serde_json::Map<_, _>>(),
            "steps": decisions.iter().map(|(step, decision)| serde_json::json!({
                "name": step.name,
                "description": step.description,
                "decision": decision,
                "actions": step.actions.iter().map(ToString::to_string).collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json_result).unwrap_or_default()
        );
        return Ok(());
    }

    if is_quiet() {
        return Ok(());
    }

    print_info(&format!(
        "Plan for {} (build tool: {})",
        plan.platform, plan.build_tool
    ));
    if let Some(model) = &plan.model {
        print_detail(&format!("Board: {model}"));
    }
    print_detail(&format!("Output: {}", session.config.output_dir.display()));
    print_detail(&format!("Profile: {}", session.config.profile.display()));
    println!();

    for (step, decision) in &decisions {
        match decision {
            Decision::Run => {
                println!("  {} {}", status::INFO, step.name);
                for action in &step.actions {
                    print_detail(&action.to_string());
                }
            }
            Decision::Resume { from } => {
                println!(
                    "  {} {} (continuing after {from} finished action(s))",
                    status::INFO,
                    step.name
                );
                for action in step.actions.iter().skip(*from) {
                    print_detail(&action.to_string());
                }
            }
            Decision::Done => println!("  {} {} (already done)", status::SUCCESS, step.name),
            Decision::Skipped { reason } => {
                println!("  {} {} ({reason})", status::SKIPPED, step.name);
            }
        }
    }

    let pending = decisions
        .iter()
        .filter(|(_, decision)| decision.executes())
        .count();
    println!();
    print_info(&format!("{pending} of {} step(s) would run", decisions.len()));

    Ok(())
}
