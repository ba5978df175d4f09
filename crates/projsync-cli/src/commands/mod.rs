//! Command implementations for projsync-cli

pub mod diff;
pub mod sync;

pub use diff::run_diff;
pub use sync::run_sync;
