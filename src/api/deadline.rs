//! Request deadlines and cancellation.
//!
//! Every backend call is raced against a timer. Whichever settles first wins;
//! the losing request future is dropped. A [`CancelHandle`] lets the caller
//! abandon a request before its deadline.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::error::{AppError, AppResult};

/// Time budget for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    timeout: Duration,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Shared cancellation flag; clones observe the same flag
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `request` until it completes, the deadline passes, or `cancel` fires.
pub async fn with_deadline<F, T>(
    request: F,
    deadline: Deadline,
    cancel: Option<&CancelHandle>,
) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    let cancelled = async {
        match cancel {
            Some(handle) => handle.cancelled().await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = request => result,
        _ = tokio::time::sleep(deadline.timeout()) => {
            tracing::warn!("Request timed out after {:?}", deadline.timeout());
            Err(AppError::Timeout(deadline.timeout()))
        }
        _ = cancelled => {
            tracing::debug!("Request cancelled by caller");
            Err(AppError::Cancelled)
        }
    }
}
