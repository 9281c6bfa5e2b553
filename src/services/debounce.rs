//! Trailing-edge debounce timer for search-as-you-type

use std::time::Duration;

use tokio::time::Instant;

/// Fires once, `delay` after the most recent [`bump`](Debouncer::bump).
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Restart the countdown
    pub fn bump(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolves when the pending countdown elapses; never resolves when idle.
    ///
    /// Cancel safe: dropping the future keeps the countdown armed.
    pub async fn fired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                tokio::time::sleep_until(deadline).await;
                self.deadline = None;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
