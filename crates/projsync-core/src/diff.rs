//! Declared versus actual path sets

use std::collections::BTreeSet;

use projsync_fs::RelativePath;
use serde::Serialize;

use crate::filter::PathFilterSet;

/// Paths to remove from and add to the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileSetDiff {
    /// Declared but not on disk
    pub removed: Vec<RelativePath>,
    /// On disk but not declared
    pub added: Vec<RelativePath>,
}

impl FileSetDiff {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Computes [`FileSetDiff`]s.
///
/// Both outputs are deduplicated and sorted by the case-folded path.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSetDiffer;

impl FileSetDiffer {
    /// Plain set difference in both directions.
    pub fn diff<D, A>(declared: D, actual: A) -> FileSetDiff
    where
        D: IntoIterator<Item = RelativePath>,
        A: IntoIterator<Item = RelativePath>,
    {
        let declared: BTreeSet<_> = declared.into_iter().collect();
        let actual: BTreeSet<_> = actual.into_iter().collect();

        FileSetDiff {
            removed: declared.difference(&actual).cloned().collect(),
            added: actual.difference(&declared).cloned().collect(),
        }
    }

    /// Difference with exclude rules applied to the additions only.
    ///
    /// A declared file that still exists is kept even when it is now
    /// excluded; an excluded file is never added.
    pub fn diff_filtered<D, A>(declared: D, actual: A, filters: &PathFilterSet) -> FileSetDiff
    where
        D: IntoIterator<Item = RelativePath>,
        A: IntoIterator<Item = RelativePath>,
    {
        let mut diff = Self::diff(declared, actual);
        diff.added.retain(|path| {
            let excluded = filters.is_excluded(path);
            if excluded {
                tracing::trace!(path = %path, "excluded");
            }
            !excluded
        });
        diff
    }
}
