//! All-settle joining of spawned tasks.
//!
//! Unlike `try_join_all`, a failing task never cancels its siblings: every
//! task runs to completion and its outcome is reported in input order.

use tokio::task::JoinHandle;

/// Outcome of one spawned task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T> {
    /// The task returned a value.
    Fulfilled(T),
    /// The task panicked or was cancelled; carries the reason.
    Rejected(String),
}

impl<T> Settled<T> {
    /// The value, or `fallback(reason)` for a rejected task.
    pub fn unwrap_or_else(self, fallback: impl FnOnce(String) -> T) -> T {
        match self {
            Settled::Fulfilled(value) => value,
            Settled::Rejected(reason) => fallback(reason),
        }
    }
}

/// Waits for one task and captures a panic or cancellation as `Rejected`.
pub async fn settle<T>(handle: JoinHandle<T>) -> Settled<T> {
    match handle.await {
        Ok(value) => Settled::Fulfilled(value),
        Err(e) if e.is_panic() => {
            let reason = match e.into_panic().downcast::<String>() {
                Ok(message) => *message,
                Err(payload) => payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "task panicked".to_string()),
            };
            log::warn!("Analysis task panicked: {reason}");
            Settled::Rejected(reason)
        }
        Err(e) => {
            log::warn!("Analysis task did not complete: {e}");
            Settled::Rejected(e.to_string())
        }
    }
}

/// Waits for every task; the result has one entry per handle, in input order.
pub async fn settle_all<T>(handles: Vec<JoinHandle<T>>) -> Vec<Settled<T>> {
    futures::future::join_all(handles.into_iter().map(settle)).await
}
