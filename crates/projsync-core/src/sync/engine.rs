//! SyncEngine implementation
//!
//! One pass reconciles the manifest with the files under the project root:
//! files that disappeared lose their entries and new files gain one in the
//! category the filter rules pick.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use projsync_fs::{RelativePath, list_files};
use projsync_manifest::{Category, ManifestEntry};
use serde::Serialize;

use crate::config::SyncConfig;
use crate::declared::DeclaredSet;
use crate::diff::FileSetDiffer;
use crate::filter::PathFilterSet;
use crate::store::{ManifestStore, backup_path};
use crate::{Error, Result};

/// One added or removed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassChange {
    pub path: RelativePath,
    pub category: Category,
    /// Element local name, e.g. `Compile` or `Content`
    pub element: String,
}

impl PassChange {
    fn from_entry(entry: &ManifestEntry) -> Option<Self> {
        Some(Self {
            path: entry.path.clone()?,
            category: entry.category,
            element: entry.element.clone(),
        })
    }
}

/// Summary of one synchronization pass
#[derive(Debug, Clone, Serialize)]
pub struct SyncPass {
    /// Local time the pass started
    pub started_at: DateTime<Local>,
    pub manifest: PathBuf,
    pub added: Vec<PassChange>,
    pub removed: Vec<PassChange>,
    /// Removal targets with no entry left to delete
    pub missing: Vec<RelativePath>,
    /// New files whose names cannot be written as an `Include` value
    pub skipped: Vec<RelativePath>,
    /// Whether the manifest was (or, for a plan, would be) rewritten
    pub mutated: bool,
    /// Backup written before saving
    pub backup: Option<PathBuf>,
}

/// A pass computed without saving, with the manifest text before and after.
#[derive(Debug, Clone)]
pub struct PlannedPass {
    pub pass: SyncPass,
    pub before: String,
    pub after: String,
}

/// Engine for synchronizing a manifest with its project root
///
/// Filter rules are compiled and the manifest located once, at
/// construction. The manifest itself is re-read on every pass.
#[derive(Debug)]
pub struct SyncEngine {
    root: PathBuf,
    manifest: PathBuf,
    config: SyncConfig,
    filters: PathFilterSet,
}

impl SyncEngine {
    /// Create a new SyncEngine
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoot`] if `root` is not a directory,
    /// [`Error::Configuration`] for invalid settings and
    /// [`Error::ManifestNotFound`] unless the root holds exactly one
    /// manifest.
    pub fn new(root: impl Into<PathBuf>, config: SyncConfig) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::InvalidRoot { path: root });
        }

        config.validate()?;
        let filters = PathFilterSet::from_config(&config)?;
        let manifest = ManifestStore::discover(&root, config.extension())?;
        tracing::debug!(manifest = %manifest.display(), "located manifest");

        Ok(Self {
            root,
            manifest,
            config,
            filters,
        })
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run one pass and save the manifest if it changed.
    pub fn run_pass(&self) -> Result<SyncPass> {
        let started_at = Local::now();
        let mut store = ManifestStore::open_file(&self.manifest)?;

        // the store unlocks on drop if staging fails
        let mut pass = self.stage(&mut store, started_at)?;
        if pass.mutated {
            let backup = self
                .config
                .write_backup
                .then(|| backup_path(&self.root, self.config.extension(), started_at));
            pass.mutated = store.save(backup.as_deref())?;
            pass.backup = backup.filter(|_| pass.mutated);
        }
        store.close()?;

        tracing::info!(
            added = pass.added.len(),
            removed = pass.removed.len(),
            mutated = pass.mutated,
            "sync pass finished"
        );
        Ok(pass)
    }

    /// Compute a pass without writing anything.
    pub fn plan(&self) -> Result<PlannedPass> {
        let mut store = ManifestStore::open_file(&self.manifest)?;
        let pass = self.stage(&mut store, Local::now())?;
        let before = store.document().source().to_string();
        let after = store.document().render();
        store.close()?;

        Ok(PlannedPass {
            pass,
            before,
            after,
        })
    }

    /// Apply additions and removals to the open store.
    fn stage(&self, store: &mut ManifestStore, started_at: DateTime<Local>) -> Result<SyncPass> {
        let declared = store.document().tracked_paths();
        let covered = DeclaredSet::from_document(store.document());
        let manifest_path = RelativePath::from_path(&self.root, &self.manifest);
        let actual = list_files(&self.root)?;
        let diff = FileSetDiffer::diff_filtered(declared, actual, &self.filters);

        let mut skipped = Vec::new();
        let mut additions: Vec<(RelativePath, Category)> = Vec::new();
        for path in diff.added {
            if Some(&path) == manifest_path.as_ref() || covered.covers(&path) {
                continue;
            }
            if !path.is_plain_include() {
                tracing::warn!(path = %path, "file name cannot be listed in the manifest, skipping");
                skipped.push(path);
                continue;
            }
            let category = self.filters.category_for(&path);
            additions.push((path, category));
        }
        let added: Vec<PassChange> = store
            .add_entries(additions, self.config.placement())?
            .iter()
            .filter_map(PassChange::from_entry)
            .collect();
        for change in &added {
            tracing::info!(path = %change.path, category = %change.category, "adding entry");
        }

        let removal = store.remove_entries(&diff.removed)?;
        let removed: Vec<PassChange> = removal
            .removed
            .iter()
            .filter_map(PassChange::from_entry)
            .collect();
        for change in &removed {
            tracing::info!(path = %change.path, element = %change.element, "removing entry");
        }

        Ok(SyncPass {
            started_at,
            manifest: self.manifest.clone(),
            added,
            removed,
            missing: removal.missing,
            skipped,
            mutated: store.is_modified(),
            backup: None,
        })
    }
}
