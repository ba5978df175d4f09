//! Locked read-modify-write access to the manifest file
//!
//! A [`ManifestStore`] holds an exclusive advisory lock on the manifest from
//! the moment it is opened until it is closed or dropped. The backup and
//! the replacement are both written while that lock is held.

mod backup;

pub use backup::backup_path;

use std::fs;
use std::path::{Path, PathBuf};

use projsync_fs::{LockedFile, RelativePath, io};
use projsync_manifest::{Category, ManifestDocument, ManifestEntry, Placement};

use crate::{Error, Result};

/// Result of [`ManifestStore::remove_entries`].
#[derive(Debug, Default)]
pub struct Removal {
    /// Every entry deleted, duplicates included
    pub removed: Vec<ManifestEntry>,
    /// Paths with no tracked entry to delete
    pub missing: Vec<RelativePath>,
}

/// The manifest of one pass, held under an exclusive lock.
#[derive(Debug)]
pub struct ManifestStore {
    lock: LockedFile,
    original: Vec<u8>,
    document: ManifestDocument,
}

impl ManifestStore {
    /// Find the single manifest directly under `root`.
    ///
    /// The extension is compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestNotFound`] unless exactly one file matches.
    pub fn discover(root: &Path, extension: &str) -> Result<PathBuf> {
        let mut found = Vec::new();
        for entry in fs::read_dir(root).map_err(|e| projsync_fs::Error::io(root, e))? {
            let entry = entry.map_err(|e| projsync_fs::Error::io(root, e))?;
            let path = entry.path();
            let matches = path
                .extension()
                .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(extension));
            if matches && path.is_file() {
                found.push(path);
            }
        }

        if found.len() != 1 {
            return Err(Error::ManifestNotFound {
                root: root.to_path_buf(),
                extension: extension.to_string(),
                found: found.len(),
            });
        }
        Ok(found.remove(0))
    }

    /// Discover and open the manifest under `root`.
    pub fn open(root: &Path, extension: &str) -> Result<Self> {
        let path = Self::discover(root, extension)?;
        Self::open_file(path)
    }

    /// Lock and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestLocked`] if another handle holds the lock and
    /// [`Error::ManifestUnreadable`] if the content is not a manifest. The
    /// lock is released before either is returned.
    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut lock = LockedFile::try_open(&path).map_err(|e| match e {
            projsync_fs::Error::LockContended { path } => Error::ManifestLocked { path },
            other => Error::Fs(other),
        })?;

        let original = lock.read_all()?;
        let document = match ManifestDocument::from_bytes(original.clone()) {
            Ok(document) => document,
            Err(e) => {
                lock.unlock()?;
                return Err(Error::ManifestUnreadable {
                    path,
                    message: e.to_string(),
                });
            }
        };

        tracing::debug!(
            path = %path.display(),
            entries = document.entries().len(),
            "opened manifest"
        );
        Ok(Self {
            lock,
            original,
            document,
        })
    }

    pub fn path(&self) -> &Path {
        self.lock.path()
    }

    pub fn document(&self) -> &ManifestDocument {
        &self.document
    }

    pub fn is_modified(&self) -> bool {
        self.document.is_modified()
    }

    /// Append one entry per addition, in order.
    pub fn add_entries<I>(&mut self, additions: I, placement: Placement) -> Result<Vec<ManifestEntry>>
    where
        I: IntoIterator<Item = (RelativePath, Category)>,
    {
        additions
            .into_iter()
            .map(|(path, category)| {
                let entry = self.document.add_entry(category, &path, placement)?;
                tracing::debug!(path = %path, category = %category, group = entry.group, "staged addition");
                Ok(entry.clone())
            })
            .collect()
    }

    /// Delete every tracked entry for each path.
    ///
    /// Paths without an entry are logged and collected in
    /// [`Removal::missing`]; the rest are still removed.
    pub fn remove_entries<'a, I>(&mut self, paths: I) -> Result<Removal>
    where
        I: IntoIterator<Item = &'a RelativePath>,
    {
        let mut removal = Removal::default();
        for path in paths {
            match self.document.remove_entries(path) {
                Ok(entries) => removal.removed.extend(entries),
                Err(projsync_manifest::Error::EntryNotFound { .. }) => {
                    tracing::warn!(path = %path, "no manifest entry to remove");
                    removal.missing.push(path.clone());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(removal)
    }

    /// Persist pending changes.
    ///
    /// Returns `false` without touching the disk when nothing changed. When
    /// `backup` is given, the bytes read under the lock are written there
    /// first; an existing file at that path is replaced.
    pub fn save(&mut self, backup: Option<&Path>) -> Result<bool> {
        if !self.document.is_modified() {
            return Ok(false);
        }

        let rendered = self.document.render();
        if let Some(backup) = backup {
            io::write_atomic(backup, &self.original)?;
            tracing::info!(path = %backup.display(), "wrote manifest backup");
        }
        self.lock.replace(rendered.as_bytes())?;
        tracing::debug!(path = %self.path().display(), bytes = rendered.len(), "saved manifest");

        self.document = ManifestDocument::parse(rendered.clone())?;
        self.original = rendered.into_bytes();
        Ok(true)
    }

    /// Release the lock.
    pub fn close(self) -> Result<()> {
        self.lock.unlock()?;
        Ok(())
    }
}
