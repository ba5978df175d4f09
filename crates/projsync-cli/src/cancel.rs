//! Stop requests from the operator
//!
//! While polling, any byte on stdin or SIGINT/SIGTERM cancels the run. Both
//! only set the token; the scheduler notices at its next tick.

use std::io::Read;
use std::thread;

use projsync_core::CancellationToken;
use signal_hook::consts::{SIGINT, SIGTERM};

use crate::error::Result;

/// Route SIGINT and SIGTERM to `token`.
pub fn register_signals(token: &CancellationToken) -> Result<()> {
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, token.flag())?;
    }
    Ok(())
}

/// Cancel `token` once a byte arrives on stdin.
///
/// End of input (a closed or redirected stdin) does not cancel.
pub fn watch_stdin(token: &CancellationToken) {
    let token = token.clone();
    let spawned = thread::Builder::new()
        .name("stdin-watch".into())
        .spawn(move || {
            let mut byte = [0u8; 1];
            match std::io::stdin().read(&mut byte) {
                Ok(n) if n > 0 => {
                    tracing::debug!("input received, stopping after this pass");
                    token.cancel();
                }
                Ok(_) => tracing::debug!("stdin closed, ignoring"),
                Err(e) => tracing::debug!(error = %e, "stdin unreadable, ignoring"),
            }
        });

    if let Err(e) = spawned {
        tracing::warn!(error = %e, "could not watch stdin");
    }
}
