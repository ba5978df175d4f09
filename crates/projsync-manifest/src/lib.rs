//! Format-preserving MSBuild manifest handling for projsync.
//!
//! A manifest is an XML project file whose `ItemGroup` elements list the
//! files that make up the project:
//!
//! ```text
//! <Project xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
//!   <ItemGroup>
//!     <Reference Include="System" />
//!     <Compile Include="Program.cs" />
//!     <Content Include="Views\Home\Index.cshtml" />
//!   </ItemGroup>
//! </Project>
//! ```
//!
//! Item elements map to a [`Category`] by local name, so prefixed and
//! unprefixed documents are handled alike. The [`ManifestDocument`] keeps
//! the original text and records byte spans for every group and entry;
//! additions and removals are spliced into that text, leaving every other
//! byte untouched.
//!
//! # Example
//!
//! ```
//! use projsync_fs::RelativePath;
//! use projsync_manifest::{Category, ManifestDocument, Placement};
//!
//! let source = "<Project>\n  <ItemGroup>\n    <Compile Include=\"a.cs\" />\n  </ItemGroup>\n</Project>\n";
//! let mut doc = ManifestDocument::parse(source).unwrap();
//! doc.add_entry(Category::Compile, &RelativePath::new("b.cs"), Placement::LastGroup).unwrap();
//!
//! assert!(doc.render().contains("    <Compile Include=\"b.cs\" />\n  </ItemGroup>"));
//! ```

pub mod category;
pub mod document;
pub mod error;
mod parser;
mod writer;

pub use category::Category;
pub use document::{ItemGroup, ManifestDocument, ManifestEntry, Placement};
pub use error::{Error, Result};
