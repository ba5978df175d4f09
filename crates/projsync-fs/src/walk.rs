//! Recursive file listing below a project root

use std::path::Path;

use walkdir::WalkDir;

use crate::{Error, RelativePath, Result};

/// List every file below `root`, relative to it.
///
/// Directories are not reported. Symlinks to files are reported, symlinked
/// directories are not descended into. The result is sorted by the
/// case-folded path.
pub fn list_files(root: &Path) -> Result<Vec<RelativePath>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::io(path, std::io::Error::from(e))
        })?;

        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        if let Some(relative) = RelativePath::from_path(root, entry.path()) {
            files.push(relative);
        }
    }

    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "listed project files");
    Ok(files)
}
