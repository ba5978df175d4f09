//! Sync command implementation
//!
//! Runs one pass, or polls until the operator stops it.

use colored::Colorize;

use projsync_core::{CancellationToken, Scheduler, SyncEngine, SyncPass};

use crate::cancel;
use crate::error::Result;

/// Run the sync command
///
/// With a polling interval, passes repeat until input arrives on stdin or
/// the process is interrupted. Failed passes are retried; without an
/// interval the first failure is returned.
pub fn run_sync(engine: &SyncEngine, json: bool) -> Result<()> {
    let interval = engine.config().interval();
    let token = CancellationToken::new();

    if let Some(interval) = interval {
        cancel::register_signals(&token)?;
        cancel::watch_stdin(&token);
        if !json {
            println!(
                "{} Watching {} every {}s. Press Enter or Ctrl-C to stop.",
                "=>".blue().bold(),
                engine.manifest_path().display().to_string().cyan(),
                interval.as_secs()
            );
        }
    }

    let mut printed = Ok(());
    let mut scheduler = Scheduler::new(interval);
    let summary = scheduler.run(
        &token,
        || engine.run_pass(),
        |outcome| {
            if let Ok(pass) = outcome
                && printed.is_ok()
            {
                printed = print_pass(pass, json, interval.is_some());
            }
        },
    )?;
    printed?;

    tracing::debug!(passes = summary.passes, failures = summary.failures, "scheduler stopped");
    if interval.is_some() && !json {
        println!(
            "{} Stopped after {} pass(es), {} failed.",
            "=>".blue().bold(),
            summary.passes,
            summary.failures
        );
    }
    Ok(())
}

fn print_pass(pass: &SyncPass, json: bool, polling: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(pass)?);
        return Ok(());
    }

    if polling {
        println!(
            "{}",
            pass.started_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );
    }
    print_changes(pass, "Adding", "Removing");

    if let Some(backup) = &pass.backup {
        println!("   {} {}", "backup".dimmed(), backup.display());
    }
    if pass.mutated {
        println!(
            "{} Manifest updated: {} added, {} removed.",
            "OK".green().bold(),
            pass.added.len(),
            pass.removed.len()
        );
    } else if !polling {
        println!("{} Already synchronized. No changes needed.", "OK".green().bold());
    }
    Ok(())
}

/// Print one line per added or removed entry.
pub(crate) fn print_changes(pass: &SyncPass, add_verb: &str, remove_verb: &str) {
    for change in &pass.added {
        println!("{} {}: {}", add_verb.green(), change.category, change.path);
    }
    for change in &pass.removed {
        println!("{} {}: {}", remove_verb.red(), change.element, change.path);
    }
    for path in &pass.missing {
        println!("{} no entry left to remove: {}", "warning".yellow().bold(), path);
    }
    for path in &pass.skipped {
        println!("{} name cannot be listed, skipped: {}", "warning".yellow().bold(), path);
    }
}
