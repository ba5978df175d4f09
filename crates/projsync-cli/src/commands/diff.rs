//! Dry-run implementation
//!
//! Previews what a sync pass would change without applying it.

use colored::Colorize;
use serde_json::json;
use similar::TextDiff;

use projsync_core::SyncEngine;

use super::sync::print_changes;
use crate::error::Result;

/// Run a pass in dry-run mode
///
/// Prints the planned additions and removals followed by a unified diff of
/// the manifest. Nothing is written, not even a backup.
pub fn run_diff(engine: &SyncEngine, json: bool) -> Result<()> {
    let planned = engine.plan()?;
    let name = engine
        .manifest_path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let diff = unified_diff(&planned.before, &planned.after, &name);

    if json {
        let output = json!({
            "has_changes": planned.pass.mutated,
            "pass": planned.pass,
            "diff": diff,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !planned.pass.mutated {
        println!("{} No changes needed. Manifest is in sync.", "OK".green().bold());
        return Ok(());
    }

    print_changes(&planned.pass, "Would add", "Would remove");
    println!();
    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{}", line);
        }
    }
    println!();
    println!("Run without {} to apply.", "--dry-run".cyan());
    Ok(())
}

fn unified_diff(before: &str, after: &str, name: &str) -> String {
    TextDiff::from_lines(before, after)
        .unified_diff()
        .context_radius(2)
        .header(&format!("a/{}", name), &format!("b/{}", name))
        .to_string()
}
