//! projsync CLI
//!
//! Keeps a project manifest in step with the files under its root.

mod cancel;
mod cli;
mod commands;
mod error;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use projsync_core::{SyncConfig, SyncEngine};

use cli::Cli;
use error::{CliError, Result};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // help and version exit 0; usage errors share the generic failure code
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
    tracing::debug!("Verbose mode enabled");
}

fn run(cli: &Cli) -> Result<()> {
    let root = resolve_root(cli.root.clone())?;

    let mut config = SyncConfig::resolve(&root, cli.config.as_deref())?;
    cli.apply(&mut config);
    tracing::debug!(root = %root.display(), ?config, "resolved settings");

    let engine = SyncEngine::new(&root, config)?;
    if cli.dry_run {
        commands::run_diff(&engine, cli.json)
    } else {
        commands::run_sync(&engine, cli.json)
    }
}

/// Canonical project root, defaulting to the working directory.
fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let root = match root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let canonical = dunce::canonicalize(&root).map_err(|e| {
        CliError::user(format!("project root {} is not accessible: {}", root.display(), e))
    })?;
    if !canonical.is_dir() {
        return Err(CliError::user(format!(
            "project root {} is not a directory",
            canonical.display()
        )));
    }
    Ok(canonical)
}
