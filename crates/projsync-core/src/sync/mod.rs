//! Synchronization passes and their scheduling
//!
//! This module provides:
//! - **engine**: one pass reconciling the manifest with the project root
//! - **scheduler**: repeated passes at an interval, stopped by a
//!   [`CancellationToken`]

mod engine;
mod scheduler;

pub use engine::{PassChange, PlannedPass, SyncEngine, SyncPass};
pub use scheduler::{
    CancellationToken, DEFAULT_TICK, Scheduler, SchedulerState, SchedulerSummary,
};
