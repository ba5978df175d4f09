//! The in-memory manifest and its mutations.

use std::ops::Range;

use projsync_fs::RelativePath;

use crate::error::{Error, Result};
use crate::{Category, parser, writer};

/// Where new entries are appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// The last top-level, unconditioned item group.
    #[default]
    LastGroup,
    /// The group reserved for the entry's category (see
    /// [`Category::canonical_group`]), falling back to the last group when
    /// the document has fewer groups.
    Canonical,
}

/// One declared item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub category: Category,
    /// Element local name, e.g. `Compile` or `EmbeddedResource`.
    pub element: String,
    /// Unescaped `Include` attribute, if present.
    pub include: Option<String>,
    /// Filesystem identity, set only for file-backed entries whose include is
    /// a plain path under the root.
    pub path: Option<RelativePath>,
    /// Index into [`ManifestDocument::groups`].
    pub group: usize,
    pub(crate) span: Option<Range<usize>>,
}

impl ManifestEntry {
    /// Whether this entry takes part in the filesystem diff.
    pub fn is_tracked(&self) -> bool {
        self.category.is_file_backed() && self.path.is_some()
    }

    /// Whether this entry was added since the document was parsed.
    pub fn is_pending(&self) -> bool {
        self.span.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GroupClose {
    /// Byte offset of the `</ItemGroup>` tag.
    EndTag(usize),
    SelfClosing,
    /// Created by an addition, emitted before the root end tag.
    Synthesized,
}

/// An `ItemGroup` element.
#[derive(Debug, Clone)]
pub struct ItemGroup {
    pub(crate) prefix: String,
    pub(crate) span: Range<usize>,
    pub(crate) close: GroupClose,
    pub(crate) indent: String,
    pub(crate) child_indent: Option<String>,
    /// Direct child of the root element.
    pub top_level: bool,
    /// Carries a `Condition` attribute.
    pub conditional: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct RootElement {
    pub prefix: String,
    /// Byte offset of the root end tag; `None` for a self-closing root.
    pub close: Option<usize>,
}

/// A parsed manifest that remembers its original text.
///
/// Mutations are recorded against the source and only materialized by
/// [`ManifestDocument::render`], so every byte outside added or removed
/// entries is reproduced exactly.
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    pub(crate) source: String,
    pub(crate) root: RootElement,
    pub(crate) namespace: Option<String>,
    pub(crate) groups: Vec<ItemGroup>,
    pub(crate) entries: Vec<ManifestEntry>,
    pub(crate) removed: Vec<Range<usize>>,
    pub(crate) newline: &'static str,
}

impl ManifestDocument {
    /// Parse manifest text.
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let parsed = parser::parse(&source)?;
        let root = parsed.root.ok_or(Error::NoInsertionPoint)?;
        let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };

        Ok(Self {
            root,
            namespace: parsed.namespace,
            groups: parsed.groups,
            entries: parsed.entries,
            removed: Vec::new(),
            newline,
            source,
        })
    }

    /// Parse manifest bytes, which must be UTF-8.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::parse(String::from_utf8(bytes)?)
    }

    /// The text the document was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Default namespace declared on the root element.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn groups(&self) -> &[ItemGroup] {
        &self.groups
    }

    /// All live entries, in document order followed by pending additions.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Paths of every tracked entry, in entry order.
    pub fn tracked_paths(&self) -> Vec<RelativePath> {
        self.entries
            .iter()
            .filter(|e| e.is_tracked())
            .filter_map(|e| e.path.clone())
            .collect()
    }

    /// Find the tracked entry for `path`.
    pub fn find(&self, path: &RelativePath) -> Option<&ManifestEntry> {
        self.entries
            .iter()
            .find(|e| e.is_tracked() && e.path.as_ref() == Some(path))
    }

    /// Whether any entry was added or removed since parsing.
    pub fn is_modified(&self) -> bool {
        !self.removed.is_empty() || self.entries.iter().any(ManifestEntry::is_pending)
    }

    /// Append an entry for `path` in `category`.
    ///
    /// Creates a new top-level item group when the document has no group
    /// that can take it.
    pub fn add_entry(
        &mut self,
        category: Category,
        path: &RelativePath,
        placement: Placement,
    ) -> Result<&ManifestEntry> {
        let element = category
            .element_name()
            .ok_or(Error::UnsupportedCategory { category })?;
        let group = self.target_group(category, placement)?;

        self.entries.push(ManifestEntry {
            category,
            element: element.to_string(),
            include: Some(path.as_str().to_string()),
            path: Some(path.clone()),
            group,
            span: None,
        });

        let index = self.entries.len() - 1;
        Ok(&self.entries[index])
    }

    /// Remove every tracked entry for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] when no tracked entry matches.
    pub fn remove_entries(&mut self, path: &RelativePath) -> Result<Vec<ManifestEntry>> {
        let mut removed = Vec::new();
        let mut index = 0;

        while index < self.entries.len() {
            let entry = &self.entries[index];
            if entry.is_tracked() && entry.path.as_ref() == Some(path) {
                let entry = self.entries.remove(index);
                if let Some(span) = &entry.span {
                    self.removed
                        .push(writer::removal_range(&self.source, span.clone()));
                }
                removed.push(entry);
            } else {
                index += 1;
            }
        }

        if removed.is_empty() {
            return Err(Error::EntryNotFound {
                path: path.to_string(),
            });
        }
        Ok(removed)
    }

    /// Produce the manifest text with all mutations applied.
    pub fn render(&self) -> String {
        writer::render(self)
    }

    fn target_group(&mut self, category: Category, placement: Placement) -> Result<usize> {
        let candidates: Vec<usize> = self
            .groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.top_level && !g.conditional)
            .map(|(i, _)| i)
            .collect();

        let chosen = match placement {
            Placement::LastGroup => candidates.last(),
            Placement::Canonical => candidates
                .get(category.canonical_group())
                .or(candidates.last()),
        };
        if let Some(&index) = chosen {
            return Ok(index);
        }

        let close = self.root.close.ok_or(Error::NoInsertionPoint)?;
        tracing::debug!("manifest has no usable item group, creating one");
        self.groups.push(ItemGroup {
            prefix: self.root.prefix.clone(),
            span: close..close,
            close: GroupClose::Synthesized,
            indent: writer::INDENT_UNIT.to_string(),
            child_indent: None,
            top_level: true,
            conditional: false,
        });
        Ok(self.groups.len() - 1)
    }
}
