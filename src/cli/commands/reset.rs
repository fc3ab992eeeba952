//! CLI command for `pico-setup reset`
//!
//! Deletes the resume state. Cloned repositories and build output are left
//! alone; steps guarded by an existing directory stay skipped.

use anyhow::Result;

use super::ConfigArgs;
use crate::cli::output::{is_json, print_info, print_success};
use crate::infra::filesystem::remove_file_if_exists;

/// Execute the reset command
pub fn execute(args: &ConfigArgs) -> Result<()> {
    let config = args.resolve()?;
    let state_path = config.state_path();
    let removed = remove_file_if_exists(&state_path)?;

    if is_json() {
        let json_result = serde_json::json!({
            "status": "success",
            "state_file": state_path,
            "removed": removed,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json_result).unwrap_or_default()
        );
    } else if removed {
        print_success(&format!("Removed {}", state_path.display()));
    } else {
        print_info(&format!("No resume state at {}", state_path.display()));
    }

    Ok(())
}
