//! Error types for projsync-core

use std::path::PathBuf;

/// Result type for projsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in projsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid pattern, category or config file
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Not exactly one manifest file directly under the root
    #[error("Expected exactly one *.{extension} file in {root}, found {found}")]
    ManifestNotFound {
        root: PathBuf,
        extension: String,
        found: usize,
    },

    /// Another process holds the manifest lock
    #[error("Manifest {path} is locked by another process")]
    ManifestLocked { path: PathBuf },

    #[error("Cannot read manifest {path}: {message}")]
    ManifestUnreadable { path: PathBuf, message: String },

    #[error("Project root {path} is not a directory")]
    InvalidRoot { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from projsync-fs
    #[error(transparent)]
    Fs(#[from] projsync_fs::Error),

    /// Manifest error from projsync-manifest
    #[error(transparent)]
    Manifest(#[from] projsync_manifest::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
