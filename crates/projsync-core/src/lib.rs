//! Synchronization engine for projsync
//!
//! This crate keeps a project manifest in step with the files under its
//! root:
//!
//! - **Filtering**: ordered regex rules that exclude paths or pick the
//!   category a new file is added as
//! - **Diffing**: declared versus actual path sets, with wildcard and
//!   non-file-backed declarations shielding files from being added twice
//! - **Store**: the locked read-modify-write cycle over the manifest file
//! - **Engine**: one synchronization pass
//! - **Scheduler**: repeated passes with cooperative cancellation
//!
//! # Architecture
//!
//! ```text
//!                  projsync-cli
//!                       |
//!                 projsync-core
//!                       |
//!         +-------------+-------------+
//!         |                           |
//!    projsync-fs              projsync-manifest
//! ```
//!
//! # Example
//!
//! ```no_run
//! use projsync_core::{SyncConfig, SyncEngine};
//!
//! fn example() -> projsync_core::Result<()> {
//!     let engine = SyncEngine::new("/path/to/project", SyncConfig::default())?;
//!     let pass = engine.run_pass()?;
//!     println!("{} added, {} removed", pass.added.len(), pass.removed.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod declared;
pub mod diff;
pub mod error;
pub mod filter;
pub mod store;
pub mod sync;

pub use config::{FilterConfig, SyncConfig, parse_pipe_list};
pub use declared::DeclaredSet;
pub use diff::{FileSetDiff, FileSetDiffer};
pub use error::{Error, Result};
pub use filter::{Classification, PathFilterSet};
pub use store::{ManifestStore, Removal, backup_path};
pub use sync::{
    CancellationToken, PassChange, PlannedPass, Scheduler, SchedulerState, SchedulerSummary,
    SyncEngine, SyncPass,
};
