//! Atomic I/O operations with file locking

use std::fs::{self, File, OpenOptions, Permissions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Write content atomically to a file.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes. The
/// temp file lives in the same directory so the rename stays on one
/// filesystem, and it is removed again if any step fails. An existing
/// file keeps its permissions.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let permissions = fs::metadata(path).ok().map(|m| m.permissions());
    let temp_path = temp_path_for(path);
    let staged = stage(&temp_path, content, permissions).and_then(|_| {
        fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))
    });

    if staged.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    staged
}

fn temp_path_for(path: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    path.with_file_name(temp_name)
}

/// Write `content` to a fresh file at `temp_path` and return its handle.
fn stage(temp_path: &Path, content: &[u8], permissions: Option<Permissions>) -> Result<File> {
    let mut temp_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    if let Some(permissions) = permissions {
        temp_file
            .set_permissions(permissions)
            .map_err(|e| Error::io(temp_path, e))?;
    }

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    Ok(temp_file)
}

fn lock(file: &File, path: &Path) -> Result<()> {
    file.try_lock_exclusive().map_err(|e| {
        if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
            Error::LockContended {
                path: path.to_path_buf(),
            }
        } else {
            Error::LockFailed {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// A file held under an exclusive advisory lock.
///
/// The lock is taken without blocking when the file is opened and is
/// released by [`LockedFile::unlock`] or when the value is dropped. It
/// follows the content across [`LockedFile::replace`].
#[derive(Debug)]
pub struct LockedFile {
    path: PathBuf,
    /// `path` with symlinks resolved; replacements are written here.
    target: PathBuf,
    file: File,
}

impl LockedFile {
    /// Open `path` for reading and writing and lock it exclusively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockContended`] if any other handle holds a lock on
    /// the file, including handles owned by this process.
    pub fn try_open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let target = dunce::canonicalize(&path).map_err(|e| Error::io(&path, e))?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&target)
            .map_err(|e| Error::io(&path, e))?;
        lock(&file, &path)?;

        tracing::debug!(path = %path.display(), "acquired exclusive lock");
        Ok(Self { path, target, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the entire file through the locked handle.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut content = Vec::new();
        self.file
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.file.read_to_end(&mut content))
            .map_err(|e| Error::io(&self.path, e))?;
        Ok(content)
    }

    /// Replace the file's content while the lock is held.
    ///
    /// The content is staged in a sibling temp file with the same
    /// permissions, locked, and renamed into place, so readers see either
    /// the old or the new bytes and the lock keeps covering the live file.
    #[cfg(not(windows))]
    pub fn replace(&mut self, content: &[u8]) -> Result<()> {
        let permissions = self
            .file
            .metadata()
            .map_err(|e| Error::io(&self.path, e))?
            .permissions();
        let temp_path = temp_path_for(&self.target);

        let staged = stage(&temp_path, content, Some(permissions)).and_then(|file| {
            lock(&file, &temp_path)?;
            fs::rename(&temp_path, &self.target).map_err(|e| Error::io(&self.path, e))?;
            Ok(file)
        });

        match staged {
            Ok(file) => {
                let previous = std::mem::replace(&mut self.file, file);
                let _ = FileExt::unlock(&previous);
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                Err(e)
            }
        }
    }

    /// Replace the file's content while the lock is held.
    ///
    /// Windows refuses to rename over a locked file, so the content is
    /// rewritten in place through the locked handle instead.
    #[cfg(windows)]
    pub fn replace(&mut self, content: &[u8]) -> Result<()> {
        let file = &mut self.file;
        file.seek(SeekFrom::Start(0))
            .and_then(|_| file.write_all(content))
            .and_then(|()| file.set_len(content.len() as u64))
            .and_then(|()| file.sync_all())
            .map_err(|e| Error::io(&self.target, e))
    }

    /// Release the lock and close the file.
    pub fn unlock(self) -> Result<()> {
        FileExt::unlock(&self.file).map_err(|e| Error::LockFailed {
            path: self.path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %self.path.display(), "released exclusive lock");
        Ok(())
    }
}
