use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Why an external call did not finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    TimedOut,
    Cancelled,
}

/// Runs `call` under a timeout, abandoning it early if `cancel` fires
pub async fn bounded<T>(
    timeout: Duration,
    cancel: &CancellationToken,
    call: impl Future<Output = T>,
) -> Result<T, Interrupted> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Interrupted::Cancelled),
        outcome = tokio::time::timeout(timeout, call) => outcome.map_err(|_| Interrupted::TimedOut),
    }
}
