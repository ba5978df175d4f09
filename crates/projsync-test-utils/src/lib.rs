//! Shared test utilities for the projsync workspace.
//!
//! This crate provides project fixtures shared by the crate test suites. It
//! is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`] builder for a project root with a manifest

pub mod project;

pub use project::{TestProject, manifest_with_items};
