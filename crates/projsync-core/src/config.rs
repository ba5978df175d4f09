//! Synchronization settings
//!
//! Settings come from built-in defaults, optionally overridden by a
//! `projsync.toml` (or `.json`/`.yaml`) file in the project root. The CLI
//! layers its own flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use projsync_fs::ConfigStore;
use projsync_manifest::{Category, Placement};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Config file looked up in the project root when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "projsync.toml";

/// Pattern lists per rule set.
///
/// Each pattern is a case-insensitive regex searched (unanchored) in the
/// `\`-separated relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Paths never added to the manifest
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    #[serde(default = "default_compile")]
    pub compile: Vec<String>,
    #[serde(default)]
    pub content: Vec<String>,
    #[serde(default = "default_none")]
    pub none: Vec<String>,
}

fn default_exclude() -> Vec<String> {
    [
        r"^config\.rb$",
        r"^bin\\",
        r"^.sass-cache\\",
        r"^obj\\",
        r"\.orig$",
        r"\\_compiler\\",
        r"\.bat$",
        r"\.user$",
        r"\.csproj$",
        r"\.zip$",
        r"\.bak$",
        r"\.mdf$",
        r"\.log$",
        r"\.exe$",
        r"^projsync\.(toml|json|ya?ml)$",
    ]
    .map(String::from)
    .to_vec()
}

fn default_compile() -> Vec<String> {
    [
        r"\.cs$",
        r"\.cshtml$",
        r"\.aspx$",
        r"\.config$",
        r"\.asax$",
        r"\.ascx$",
        r"\.ashx$",
    ]
    .map(String::from)
    .to_vec()
}

fn default_none() -> Vec<String> {
    [r"\.scss$", r"\.pubxml$", r"\\_GUIDES\\"]
        .map(String::from)
        .to_vec()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            compile: default_compile(),
            content: Vec::new(),
            none: default_none(),
        }
    }
}

/// Settings for a synchronization run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SyncConfig {
    #[serde(default)]
    pub filters: FilterConfig,
    /// Category for files no rule matches
    #[serde(default = "default_category")]
    pub default_category: Category,
    /// Seconds between passes; `0` runs a single pass
    #[serde(default)]
    pub polling_interval: u64,
    /// Copy the manifest to a timestamped `.bak` before changing it
    #[serde(default = "default_true")]
    pub write_backup: bool,
    /// Append new entries to the group reserved for their category
    #[serde(default)]
    pub auto_organize: bool,
    /// Manifest file extension, without the dot
    #[serde(default = "default_extension")]
    pub manifest_extension: String,
}

fn default_category() -> Category {
    Category::Content
}

fn default_true() -> bool {
    true
}

fn default_extension() -> String {
    "csproj".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            filters: FilterConfig::default(),
            default_category: default_category(),
            polling_interval: 0,
            write_backup: true,
            auto_organize: false,
            manifest_extension: default_extension(),
        }
    }
}

impl SyncConfig {
    /// Load settings from a config file.
    ///
    /// Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let config: SyncConfig = ConfigStore::new()
            .load(path)
            .map_err(|e| Error::configuration(e.to_string()))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Resolve the config file for `root`.
    ///
    /// An explicit path must exist. Otherwise `projsync.toml` in the root is
    /// used when present, and the defaults when not.
    pub fn resolve(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path: PathBuf = match explicit {
            Some(path) if !path.is_file() => {
                return Err(Error::configuration(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = root.join(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };
        Self::load(&path)
    }

    /// Check settings that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !self.default_category.is_file_backed() {
            return Err(Error::configuration(format!(
                "default category must be Compile, Content or None, not {}",
                self.default_category
            )));
        }

        let extension = self.manifest_extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(Error::configuration(format!(
                "invalid manifest extension '{}'",
                self.manifest_extension
            )));
        }
        Ok(())
    }

    /// Manifest extension without a leading dot.
    pub fn extension(&self) -> &str {
        self.manifest_extension.trim_start_matches('.')
    }

    /// Time between pass starts, or `None` for a single pass.
    pub fn interval(&self) -> Option<Duration> {
        (self.polling_interval > 0).then(|| Duration::from_secs(self.polling_interval))
    }

    pub fn placement(&self) -> Placement {
        if self.auto_organize {
            Placement::Canonical
        } else {
            Placement::LastGroup
        }
    }
}

/// Split a `|`-delimited pattern list, dropping empty items.
pub fn parse_pipe_list(list: &str) -> Vec<String> {
    list.split('|')
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
