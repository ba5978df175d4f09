//! Item categories and their element names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Category of a manifest item.
///
/// `Other` covers every item element outside the four named kinds; the
/// concrete element name is kept on the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Assembly reference. `Include` names a library, not a file.
    Reference,
    Compile,
    Content,
    None,
    Other,
}

impl Category {
    /// Categories that name files under the project root.
    pub const FILE_BACKED: [Category; 3] = [Category::Compile, Category::Content, Category::None];

    /// Map an element local name to its category.
    pub fn from_element(local_name: &str) -> Self {
        match local_name {
            "Reference" => Category::Reference,
            "Compile" => Category::Compile,
            "Content" => Category::Content,
            "None" => Category::None,
            _ => Category::Other,
        }
    }

    /// Element local name used when writing entries of this category.
    pub fn element_name(&self) -> Option<&'static str> {
        match self {
            Category::Reference => Some("Reference"),
            Category::Compile => Some("Compile"),
            Category::Content => Some("Content"),
            Category::None => Some("None"),
            Category::Other => Option::None,
        }
    }

    /// Whether entries of this category take part in the filesystem diff.
    pub fn is_file_backed(&self) -> bool {
        Self::FILE_BACKED.contains(self)
    }

    /// Index of the top-level item group reserved for this category when
    /// groups are organized.
    pub fn canonical_group(&self) -> usize {
        match self {
            Category::Reference => 0,
            Category::Compile => 1,
            Category::Content => 2,
            Category::Other => 3,
            Category::None => 4,
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reference" => Ok(Category::Reference),
            "compile" => Ok(Category::Compile),
            "content" => Ok(Category::Content),
            "none" => Ok(Category::None),
            "other" => Ok(Category::Other),
            _ => Err(Error::UnknownCategory {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Reference => "Reference",
            Category::Compile => "Compile",
            Category::Content => "Content",
            Category::Other => "Other",
            Category::None => "None",
        };
        f.write_str(name)
    }
}
