// src/delay.rs
//! Shutdown-aware waiting: the rate-limit pause and in-flight lookups

use std::time::Duration;
use tokio::sync::watch;

/// How a pause ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The full duration elapsed
    Elapsed,
    /// A shutdown was signalled first
    Cancelled,
}

/// Drive `future` to completion unless `shutdown` flips to `true` first
///
/// Returns `None` when shutdown wins; the future is dropped unfinished.
/// If the sender side is dropped the future simply runs to completion.
pub async fn until_shutdown<F: Future>(
    future: F,
    shutdown: &mut watch::Receiver<bool>,
) -> Option<F::Output> {
    if *shutdown.borrow_and_update() {
        return None;
    }

    tokio::pin!(future);

    loop {
        tokio::select! {
            output = &mut future => return Some(output),

            changed = shutdown.changed() => {
                if changed.is_err() {
                    return Some((&mut future).await);
                }
                if *shutdown.borrow_and_update() {
                    return None;
                }
            }
        }
    }
}

/// Sleep for `duration` unless `shutdown` flips to `true` first
pub async fn pause(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> PauseOutcome {
    match until_shutdown(tokio::time::sleep(duration), shutdown).await {
        Some(()) => PauseOutcome::Elapsed,
        None => PauseOutcome::Cancelled,
    }
}

/// Spawn a task that flips the returned receiver to `true` on Ctrl-C
pub fn shutdown_on_ctrl_c() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Interrupt received, stopping");
                tx.send(true).ok();
            }
            Err(e) => {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                // Keep the sender alive so lookups and pauses still run to completion
                std::future::pending::<()>().await;
            }
        }
    });

    rx
}
