//! Project-relative paths with manifest-style separators

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

use serde::{Serialize, Serializer};

/// Separator used inside manifests and matched by filter patterns.
pub const SEPARATOR: char = '\\';
const SEPARATOR_STR: &str = "\\";

/// A file path relative to the project root.
///
/// The spelling is normalized to `\` separators (the manifest convention),
/// with empty and `.` segments dropped. Identity is case-insensitive: two
/// paths are equal when their case-folded forms match, while the original
/// spelling is kept for display and for writing into the manifest.
#[derive(Debug, Clone)]
pub struct RelativePath {
    inner: String,
    key: String,
}

impl RelativePath {
    /// Normalize a relative path string.
    ///
    /// Both `/` and `\` are accepted as separators.
    pub fn new(path: impl AsRef<str>) -> Self {
        let segments: Vec<&str> = path
            .as_ref()
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        let inner = segments.join(SEPARATOR_STR);
        let key = inner.to_lowercase();
        Self { inner, key }
    }

    /// Interpret a manifest `Include` value.
    ///
    /// Returns `None` for values that do not name a single file under the
    /// project root: absolute paths, paths climbing out through `..`,
    /// wildcards, item lists joined with `;`, and MSBuild property or item
    /// expansions.
    pub fn from_include(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.starts_with(['/', '\\'])
            || trimmed.contains(['*', '?', ';'])
            || trimmed.contains("$(")
            || trimmed.contains("@(")
            || trimmed.contains("%(")
        {
            return None;
        }

        let bytes = trimmed.as_bytes();
        if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
            return None;
        }

        if trimmed.split(['/', '\\']).any(|s| s == "..") {
            return None;
        }

        let path = Self::new(trimmed);
        if path.inner.is_empty() { None } else { Some(path) }
    }

    /// Whether writing this path as an `Include` value reads back as the
    /// same path, spelling included.
    ///
    /// Fails for names with surrounding whitespace, wildcard characters,
    /// `;` or expansion syntax such as `$(`.
    pub fn is_plain_include(&self) -> bool {
        Self::from_include(&self.inner).is_some_and(|p| p.inner == self.inner)
    }

    /// Express `path` relative to `root`.
    ///
    /// Returns `None` if `path` is not under `root` or names the root itself.
    pub fn from_path(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(s) => segments.push(s.to_string_lossy()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if segments.is_empty() {
            return None;
        }
        Some(Self::new(segments.join(SEPARATOR_STR)))
    }

    /// The normalized spelling, `\`-separated.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Resolve against `root` into a platform-native path.
    pub fn to_native(&self, root: &Path) -> PathBuf {
        let mut native = root.to_path_buf();
        for segment in self.inner.split(SEPARATOR) {
            native.push(segment);
        }
        native
    }

    /// Get the file name component.
    pub fn file_name(&self) -> &str {
        self.inner.rsplit(SEPARATOR).next().unwrap_or(&self.inner)
    }
}

impl PartialEq for RelativePath {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for RelativePath {}

impl Hash for RelativePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for RelativePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RelativePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl Serialize for RelativePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.inner)
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
