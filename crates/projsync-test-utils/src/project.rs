//! [`TestProject`] builder for sync scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Classic MSBuild namespace used by generated manifests.
pub const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

/// Render a classic manifest with one `ItemGroup` holding `items`.
///
/// Each item is `(element, include)`. With no items the group is still
/// written, empty.
pub fn manifest_with_items(items: &[(&str, &str)]) -> String {
    let mut manifest = format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Project ToolsVersion=\"12.0\" xmlns=\"{}\">\n  <ItemGroup>\n",
        MSBUILD_NAMESPACE
    );
    for (element, include) in items {
        manifest.push_str(&format!("    <{} Include=\"{}\" />\n", element, include));
    }
    manifest.push_str("  </ItemGroup>\n</Project>\n");
    manifest
}

/// A temporary project root with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use projsync_test_utils::TestProject;
///
/// let project = TestProject::new()
///     .with_manifest(&[("Compile", "Program.cs")])
///     .with_file("Program.cs", "class Program {}");
/// project.assert_manifest_contains("<Compile Include=\"Program.cs\" />");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
    manifest_name: String,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary project root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
            manifest_name: "App.csproj".to_string(),
        }
    }

    /// Return the project root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Use a different manifest file name for later `with_manifest*` calls.
    pub fn named(mut self, manifest_name: &str) -> Self {
        self.manifest_name = manifest_name.to_string();
        self
    }

    /// Write a classic manifest declaring `items`.
    pub fn with_manifest(self, items: &[(&str, &str)]) -> Self {
        let text = manifest_with_items(items);
        self.with_manifest_text(&text)
    }

    /// Write the manifest verbatim.
    pub fn with_manifest_text(self, text: &str) -> Self {
        fs::write(self.manifest_path(), text).unwrap();
        self
    }

    /// Write a file, creating parent directories. `path` may use `/` or `\`.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.write_file(path, content);
        self
    }

    pub fn write_file(&self, path: &str, content: &str) {
        let full_path = self.path(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }

    pub fn remove_file(&self, path: &str) {
        fs::remove_file(self.path(path)).unwrap();
    }

    /// Native path for a project-relative `path`.
    pub fn path(&self, path: &str) -> PathBuf {
        path.split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .fold(self.root().to_path_buf(), |acc, segment| acc.join(segment))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root().join(&self.manifest_name)
    }

    pub fn read_manifest(&self) -> String {
        fs::read_to_string(self.manifest_path()).unwrap()
    }

    /// Files in the root whose name ends with `.bak`.
    pub fn backups(&self) -> Vec<PathBuf> {
        let mut backups: Vec<PathBuf> = fs::read_dir(self.root())
            .unwrap()
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.to_string_lossy().ends_with(".bak"))
            .collect();
        backups.sort();
        backups
    }

    /// Assert that the manifest contains `content`.
    ///
    /// # Panics
    /// Panics if the manifest cannot be read or does not contain `content`.
    pub fn assert_manifest_contains(&self, content: &str) {
        let manifest = self.read_manifest();
        assert!(
            manifest.contains(content),
            "Manifest does not contain expected content.\nExpected: {}\nActual: {}",
            content,
            manifest
        );
    }

    /// Assert that the manifest does **not** contain `content`.
    ///
    /// # Panics
    /// Panics if the manifest contains `content`.
    pub fn assert_manifest_lacks(&self, content: &str) {
        let manifest = self.read_manifest();
        assert!(
            !manifest.contains(content),
            "Manifest unexpectedly contains: {}\nActual: {}",
            content,
            manifest
        );
    }
}
