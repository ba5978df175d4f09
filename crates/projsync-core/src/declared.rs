//! Every file a manifest already names, tracked or not

use std::collections::BTreeSet;

use projsync_fs::RelativePath;
use projsync_manifest::{Category, ManifestDocument};
use regex::{Regex, RegexBuilder};

/// Paths and wildcard includes declared by any item except references.
///
/// Only tracked entries are ever removed, but nothing covered here is ever
/// added: a file listed as `EmbeddedResource`, or matched by
/// `Generated\*.cs`, already belongs to the project.
#[derive(Debug, Default)]
pub struct DeclaredSet {
    paths: BTreeSet<RelativePath>,
    wildcards: Vec<Regex>,
}

impl DeclaredSet {
    pub fn from_document(document: &ManifestDocument) -> Self {
        let mut declared = Self::default();
        let includes = document
            .entries()
            .iter()
            .filter(|e| e.category != Category::Reference)
            .filter_map(|e| e.include.as_deref());

        for include in includes {
            for part in include.split(';') {
                if let Some(path) = RelativePath::from_include(part) {
                    declared.paths.insert(path);
                } else if let Some(wildcard) = wildcard(part) {
                    declared.wildcards.push(wildcard);
                }
            }
        }

        tracing::debug!(
            paths = declared.paths.len(),
            wildcards = declared.wildcards.len(),
            "collected declared includes"
        );
        declared
    }

    /// Whether `path` is named by some item, directly or through a wildcard.
    pub fn covers(&self, path: &RelativePath) -> bool {
        self.paths.contains(path) || self.wildcards.iter().any(|w| w.is_match(path.as_str()))
    }
}

/// Compile a root-relative MSBuild wildcard include.
///
/// `**` spans any number of directories, `*` and `?` stay within one
/// segment. Includes with expansions or leaving the root give `None`.
fn wildcard(include: &str) -> Option<Regex> {
    let trimmed = include.trim();
    if !trimmed.contains(['*', '?'])
        || trimmed.starts_with(['/', '\\'])
        || trimmed.contains("$(")
        || trimmed.contains("@(")
        || trimmed.contains("%(")
        || trimmed.split(['/', '\\']).any(|s| s == "..")
    {
        return None;
    }
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' {
        return None;
    }

    let normalized = RelativePath::new(trimmed);
    let segments: Vec<&str> = normalized.as_str().split('\\').collect();
    let mut pattern = String::from("^");
    for (index, segment) in segments.iter().enumerate() {
        let last = index + 1 == segments.len();
        if *segment == "**" {
            pattern.push_str(if last { ".*" } else { r"(?:[^\\]+\\)*" });
            continue;
        }
        for c in segment.chars() {
            match c {
                '*' => pattern.push_str(r"[^\\]*"),
                '?' => pattern.push_str(r"[^\\]"),
                c => pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }
        if !last {
            pattern.push_str(r"\\");
        }
    }
    pattern.push('$');

    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| tracing::debug!(include = trimmed, error = %e, "unusable wildcard include"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn declared(items: &str) -> DeclaredSet {
        let source = format!("<Project>\n  <ItemGroup>\n{}  </ItemGroup>\n</Project>\n", items);
        DeclaredSet::from_document(&ManifestDocument::parse(source).unwrap())
    }

    #[rstest]
    #[case("Generated\\*.cs", "Generated\\Proxy.cs", true)]
    #[case("Generated\\*.cs", "generated\\PROXY.CS", true)]
    #[case("Generated\\*.cs", "Generated\\Sub\\Proxy.cs", false)]
    #[case("Generated\\**\\*.cs", "Generated\\Sub\\Deep\\Proxy.cs", true)]
    #[case("Generated\\**\\*.cs", "Generated\\Proxy.cs", true)]
    #[case("**", "any\\thing.txt", true)]
    #[case("Scripts/app?.js", "Scripts\\app1.js", true)]
    #[case("Scripts/app?.js", "Scripts\\app12.js", false)]
    #[case("a+b\\*.txt", "a+b\\c.txt", true)]
    #[case("..\\Shared\\*.cs", "Shared\\x.cs", false)]
    #[case("$(Dir)\\*.cs", "x.cs", false)]
    fn test_wildcard_coverage(#[case] include: &str, #[case] path: &str, #[case] covered: bool) {
        let set = declared(&format!("    <Compile Include=\"{}\" />\n", include));
        assert_eq!(set.covers(&RelativePath::new(path)), covered);
    }

    #[test]
    fn test_other_items_are_declared() {
        let set = declared("    <EmbeddedResource Include=\"Strings.resx\" />\n");
        assert!(set.covers(&RelativePath::new("strings.RESX")));
    }

    #[test]
    fn test_references_are_not_declared() {
        let set = declared("    <Reference Include=\"System.Web\" />\n");
        assert!(!set.covers(&RelativePath::new("System.Web")));
    }

    #[test]
    fn test_item_lists_are_split() {
        let set = declared("    <Content Include=\"a.txt;docs\\*.md\" />\n");
        assert!(set.covers(&RelativePath::new("a.txt")));
        assert!(set.covers(&RelativePath::new("docs\\readme.md")));
        assert!(!set.covers(&RelativePath::new("b.txt")));
    }
}
