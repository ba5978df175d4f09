//! Repeated passes with cooperative cancellation
//!
//! The scheduler runs a pass, then waits out the rest of the polling
//! interval in short ticks, checking a [`CancellationToken`] at every tick.
//! A pass in progress is never interrupted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::Result;

/// Default granularity of cancellation checks while waiting.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Shared stop request.
///
/// Clones share one flag. [`CancellationToken::flag`] exposes it for
/// registration with signal handlers.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// The underlying flag.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Waiting,
    Stopped,
}

/// Outcome of [`Scheduler::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSummary {
    pub passes: usize,
    pub failures: usize,
    pub state: SchedulerState,
}

/// Drives passes at a fixed interval.
///
/// The deadline for the next pass is taken right before the current one
/// starts, so pass duration counts against the interval. Without an
/// interval exactly one pass runs.
#[derive(Debug)]
pub struct Scheduler {
    interval: Option<Duration>,
    tick: Duration,
    state: SchedulerState,
}

impl Scheduler {
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval: interval.filter(|i| !i.is_zero()),
            tick: DEFAULT_TICK,
            state: SchedulerState::Idle,
        }
    }

    /// Change how often cancellation is checked while waiting.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.max(Duration::from_millis(1));
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Run passes until cancelled.
    ///
    /// `observer` sees every pass outcome. In single-pass mode a failed
    /// pass is returned as the error; when polling, failures are logged and
    /// the next pass is attempted after the interval.
    pub fn run<T, P, O>(
        &mut self,
        token: &CancellationToken,
        mut pass: P,
        mut observer: O,
    ) -> Result<SchedulerSummary>
    where
        P: FnMut() -> Result<T>,
        O: FnMut(&Result<T>),
    {
        let mut summary = SchedulerSummary {
            passes: 0,
            failures: 0,
            state: self.state,
        };

        loop {
            self.state = SchedulerState::Running;
            let deadline = self.interval.map(|interval| Instant::now() + interval);

            let outcome = pass();
            summary.passes += 1;
            if outcome.is_err() {
                summary.failures += 1;
            }
            observer(&outcome);

            let Some(deadline) = deadline else {
                self.state = SchedulerState::Stopped;
                outcome?;
                break;
            };

            if let Err(e) = &outcome {
                tracing::warn!(error = %e, "sync pass failed, retrying after the interval");
            }

            self.state = SchedulerState::Waiting;
            if !self.wait(token, deadline) {
                tracing::debug!(passes = summary.passes, "cancellation requested");
                self.state = SchedulerState::Stopped;
                break;
            }
        }

        summary.state = self.state;
        Ok(summary)
    }

    /// Sleep until `deadline`. Returns `false` if cancelled first.
    fn wait(&self, token: &CancellationToken, deadline: Instant) -> bool {
        loop {
            if token.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(self.tick.min(deadline - now));
        }
    }
}
