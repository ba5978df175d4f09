//! Filesystem primitives for projsync
//!
//! Provides project-relative path identity, locked and atomic file I/O,
//! recursive file listing, and format-agnostic configuration loading.

pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use io::LockedFile;
pub use path::RelativePath;
pub use walk::list_files;
