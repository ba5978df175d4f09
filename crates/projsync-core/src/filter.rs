//! Rule-based path classification

use projsync_fs::RelativePath;
use projsync_manifest::Category;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::config::{FilterConfig, SyncConfig};
use crate::{Error, Result};

/// Outcome of classifying one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    Excluded,
    Category(Category),
}

#[derive(Debug, Clone)]
struct RuleSet {
    patterns: Vec<Regex>,
}

impl RuleSet {
    fn compile(name: &'static str, patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        Error::configuration(format!("invalid {} pattern '{}': {}", name, p, e))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(path))
    }
}

/// Ordered pattern rules deciding whether and how a file is tracked.
///
/// Exclude rules win over everything. Otherwise compile, content and none
/// rules are tried in that order and the first matching set picks the
/// category; unmatched paths get the default category.
#[derive(Debug, Clone)]
pub struct PathFilterSet {
    exclude: RuleSet,
    categories: Vec<(Category, RuleSet)>,
    default_category: Category,
}

impl PathFilterSet {
    /// Compile every rule set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the rule set and pattern when
    /// a pattern is not a valid regex.
    pub fn new(filters: &FilterConfig, default_category: Category) -> Result<Self> {
        let set = Self {
            exclude: RuleSet::compile("exclude", &filters.exclude)?,
            categories: vec![
                (Category::Compile, RuleSet::compile("compile", &filters.compile)?),
                (Category::Content, RuleSet::compile("content", &filters.content)?),
                (Category::None, RuleSet::compile("none", &filters.none)?),
            ],
            default_category,
        };

        tracing::debug!(
            exclude = set.exclude.patterns.len(),
            compile = set.categories[0].1.patterns.len(),
            content = set.categories[1].1.patterns.len(),
            none = set.categories[2].1.patterns.len(),
            "compiled filter rules"
        );
        Ok(set)
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        Self::new(&config.filters, config.default_category)
    }

    pub fn classify(&self, path: &RelativePath) -> Classification {
        if self.is_excluded(path) {
            Classification::Excluded
        } else {
            Classification::Category(self.category_for(path))
        }
    }

    pub fn is_excluded(&self, path: &RelativePath) -> bool {
        self.exclude.matches(path.as_str())
    }

    /// Category `path` is added as, ignoring exclude rules.
    pub fn category_for(&self, path: &RelativePath) -> Category {
        self.categories
            .iter()
            .find(|(_, rules)| rules.matches(path.as_str()))
            .map(|(category, _)| *category)
            .unwrap_or(self.default_category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn defaults() -> PathFilterSet {
        PathFilterSet::from_config(&SyncConfig::default()).unwrap()
    }

    #[rstest]
    #[case("Program.cs", Classification::Category(Category::Compile))]
    #[case("Views\\Home\\Index.cshtml", Classification::Category(Category::Compile))]
    #[case("Web.config", Classification::Category(Category::Compile))]
    #[case("Styles\\site.scss", Classification::Category(Category::None))]
    #[case("Docs\\_GUIDES\\intro.md", Classification::Category(Category::None))]
    #[case("Scripts\\app.js", Classification::Category(Category::Content))]
    #[case("bin\\output.dll", Classification::Excluded)]
    #[case("BIN\\Debug\\app.pdb", Classification::Excluded)]
    #[case("obj\\project.assets.json", Classification::Excluded)]
    #[case("App.csproj", Classification::Excluded)]
    #[case("build.bat", Classification::Excluded)]
    #[case("config.rb", Classification::Excluded)]
    #[case("sub\\config.rb", Classification::Category(Category::Content))]
    fn test_default_rules(#[case] path: &str, #[case] expected: Classification) {
        assert_eq!(defaults().classify(&RelativePath::new(path)), expected);
    }

    #[test]
    fn test_exclude_wins_over_compile() {
        let filters = FilterConfig {
            exclude: vec![r"^generated\\".into()],
            ..FilterConfig::default()
        };
        let set = PathFilterSet::new(&filters, Category::Content).unwrap();
        let path = RelativePath::new("generated/Model.cs");

        assert_eq!(set.classify(&path), Classification::Excluded);
        assert!(set.is_excluded(&path));
        assert_eq!(set.category_for(&path), Category::Compile);
    }

    #[test]
    fn test_compile_wins_over_content_and_none() {
        let filters = FilterConfig {
            exclude: vec![],
            compile: vec![r"\.txt$".into()],
            content: vec![r"\.txt$".into()],
            none: vec![r"\.txt$".into()],
        };
        let set = PathFilterSet::new(&filters, Category::None).unwrap();
        assert_eq!(
            set.classify(&RelativePath::new("a.txt")),
            Classification::Category(Category::Compile)
        );
    }

    #[test]
    fn test_content_wins_over_none() {
        let filters = FilterConfig {
            exclude: vec![],
            compile: vec![],
            content: vec![r"\.md$".into()],
            none: vec![r"\.md$".into()],
        };
        let set = PathFilterSet::new(&filters, Category::None).unwrap();
        assert_eq!(set.category_for(&RelativePath::new("README.md")), Category::Content);
    }

    #[test]
    fn test_empty_patterns_never_match() {
        let filters = FilterConfig {
            exclude: vec![String::new()],
            compile: vec![],
            content: vec![],
            none: vec![],
        };
        let set = PathFilterSet::new(&filters, Category::Content).unwrap();
        assert_eq!(
            set.classify(&RelativePath::new("anything.cs")),
            Classification::Category(Category::Content)
        );
    }

    #[test]
    fn test_invalid_pattern_names_rule_set() {
        let filters = FilterConfig {
            none: vec!["([unclosed".into()],
            ..FilterConfig::default()
        };
        let err = PathFilterSet::new(&filters, Category::Content).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("none"), "got: {}", message);
        assert!(message.contains("([unclosed"), "got: {}", message);
    }
}
