//! SIGINT/SIGTERM handling.
//!
//! A dedicated thread waits for the first signal and hands it to the shared
//! [`TransactionContext`]. Outside a running command the context removes
//! whatever generation left on disk and the thread exits with status 1.
//! While a command runs the cleanup is deferred: the generation run removes
//! the project after the child returns and exits through the normal error
//! path. The thread never prompts.

use std::sync::Arc;

use stacksmith_core::application::{CleanupOutcome, TransactionContext};

/// Install the handler. Call once, before the first prompt.
#[cfg(unix)]
pub fn install(tx: Arc<TransactionContext>) -> anyhow::Result<()> {
    use anyhow::Context as _;
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("failed to register signal handlers")?;

    std::thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            let mut deferred = false;
            for signal in signals.forever() {
                tracing::warn!(signal, deferred, "interrupt received");
                if deferred {
                    eprintln!("Still waiting for the running command to exit.");
                    continue;
                }
                let outcome = tx.interrupt();
                // A prompt may have hidden the cursor.
                let _ = console::Term::stderr().show_cursor();
                eprintln!("\n{}", describe(&outcome));
                if !matches!(outcome, CleanupOutcome::Deferred(_)) {
                    std::process::exit(1);
                }
                deferred = true;
            }
        })
        .context("failed to spawn signal thread")?;

    tracing::debug!("signal handler installed");
    Ok(())
}

/// Without a handler Ctrl-C terminates the process as usual and the partial
/// project stays on disk; `new --help` says so.
#[cfg(not(unix))]
pub fn install(_tx: Arc<TransactionContext>) -> anyhow::Result<()> {
    tracing::debug!("signal handling is only available on unix");
    Ok(())
}

/// One-line report for an interrupt.
pub fn describe(outcome: &CleanupOutcome) -> String {
    match outcome {
        CleanupOutcome::NotStarted => "Interrupted. Nothing was generated.".into(),
        CleanupOutcome::Deferred(path) => format!(
            "Interrupted. Waiting for the running command to exit before removing {}.",
            path.display()
        ),
        CleanupOutcome::RolledBack(path) => format!(
            "Interrupted. Removed the partially generated project at {}.",
            path.display()
        ),
        CleanupOutcome::NothingToRemove(path) => format!(
            "Interrupted. Nothing was left at {}.",
            path.display()
        ),
        CleanupOutcome::CleanupFailed { path, reason } => format!(
            "Interrupted. Could not remove {} ({reason}); delete it manually.",
            path.display()
        ),
    }
}
