//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use projsync_core::{SyncConfig, parse_pipe_list};
use projsync_manifest::Category;

/// projsync - Keep a project manifest in sync with the files on disk
///
/// Adds manifest entries for new files and removes entries for files that
/// no longer exist. Pattern lists take `|`-separated regexes matched against
/// `\`-separated relative paths.
#[derive(Parser, Debug)]
#[command(name = "projsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root holding the manifest (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// Config file (toml, json or yaml); defaults to projsync.toml in the root
    #[arg(short, long, env = "PROJSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Patterns of files never added
    #[arg(long, env = "PROJSYNC_EXCLUDE", value_name = "PATTERNS")]
    pub exclude: Option<String>,

    /// Patterns of files added as Compile
    #[arg(long, env = "PROJSYNC_COMPILE", value_name = "PATTERNS")]
    pub compile: Option<String>,

    /// Patterns of files added as Content
    #[arg(long, env = "PROJSYNC_CONTENT", value_name = "PATTERNS")]
    pub content: Option<String>,

    /// Patterns of files added as None
    #[arg(long, env = "PROJSYNC_NONE", value_name = "PATTERNS")]
    pub none: Option<String>,

    /// Seconds between passes; 0 runs once
    #[arg(short, long, env = "PROJSYNC_INTERVAL", value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Category for files no pattern matches
    #[arg(long, env = "PROJSYNC_DEFAULT_CATEGORY")]
    pub default_category: Option<Category>,

    /// Do not write a .bak copy before changing the manifest
    #[arg(long, env = "PROJSYNC_NO_BACKUP")]
    pub no_backup: bool,

    /// Add entries to the item group reserved for their category
    #[arg(long, env = "PROJSYNC_AUTO_ORGANIZE")]
    pub auto_organize: bool,

    /// Manifest file extension
    #[arg(long, env = "PROJSYNC_EXTENSION")]
    pub extension: Option<String>,

    /// Show the changes a pass would make without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Print each pass as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layer command-line settings over `config`.
    pub fn apply(&self, config: &mut SyncConfig) {
        if let Some(list) = &self.exclude {
            config.filters.exclude = parse_pipe_list(list);
        }
        if let Some(list) = &self.compile {
            config.filters.compile = parse_pipe_list(list);
        }
        if let Some(list) = &self.content {
            config.filters.content = parse_pipe_list(list);
        }
        if let Some(list) = &self.none {
            config.filters.none = parse_pipe_list(list);
        }
        if let Some(interval) = self.interval {
            config.polling_interval = interval;
        }
        if let Some(category) = self.default_category {
            config.default_category = category;
        }
        if self.no_backup {
            config.write_backup = false;
        }
        if self.auto_organize {
            config.auto_organize = true;
        }
        if let Some(extension) = &self.extension {
            config.manifest_extension = extension.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_defaults() {
        let cli = Cli::try_parse_from(["projsync"]).unwrap();
        assert!(cli.root.is_none());
        assert!(!cli.dry_run);

        let mut config = SyncConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn parse_overrides() {
        let cli = Cli::try_parse_from([
            "projsync",
            "web",
            "--exclude",
            r"^bin\\|\.log$",
            "--interval",
            "30",
            "--default-category",
            "none",
            "--no-backup",
            "--auto-organize",
            "--extension",
            "vbproj",
        ])
        .unwrap();

        let mut config = SyncConfig::default();
        cli.apply(&mut config);

        assert_eq!(cli.root, Some(PathBuf::from("web")));
        assert_eq!(config.filters.exclude, vec![r"^bin\\", r"\.log$"]);
        assert_eq!(config.polling_interval, 30);
        assert_eq!(config.default_category, Category::None);
        assert!(!config.write_backup);
        assert!(config.auto_organize);
        assert_eq!(config.manifest_extension, "vbproj");
    }

    #[test]
    fn parse_rejects_unknown_category() {
        let result = Cli::try_parse_from(["projsync", "--default-category", "Banana"]);
        assert!(result.is_err());
    }
}
