//! Error types for projsync-manifest

use crate::Category;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed manifest at byte {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Manifest is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Manifest has no element to hold item groups")]
    NoInsertionPoint,

    #[error("No manifest entry found for {path}")]
    EntryNotFound { path: String },

    #[error("Cannot write entries of category {category}")]
    UnsupportedCategory { category: Category },

    #[error("Unknown category: {name}")]
    UnknownCategory { name: String },
}
