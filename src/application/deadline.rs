//! # Deadline Guard
//!
//! Races the pagination loop against a fixed wall-clock budget measured from
//! session start. Expiry is cooperative: the guard cancels a token the loop
//! polls at its iteration boundaries, and the in-flight step always finishes.
//! Nothing is force-killed, so an expired session never straddles a partially
//! consumed page fetch.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

pub struct DeadlineGuard {
    token: CancellationToken,
    budget: Duration,
}

impl DeadlineGuard {
    pub fn new(budget: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            budget,
        }
    }

    /// Token for the guarded task to poll at its iteration boundaries.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_expired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run `task` to completion, cancelling the token once the budget elapses.
    ///
    /// The task decides how to wind down after cancellation; the guard never
    /// aborts it. The watcher is dropped as soon as the task returns, so a
    /// fast task completes without the token ever firing.
    pub async fn run<F: Future>(&self, task: F) -> F::Output {
        let watcher = tokio::spawn({
            let token = self.token.clone();
            let budget = self.budget;
            async move {
                tokio::time::sleep(budget).await;
                warn!(
                    budget_secs = budget.as_secs(),
                    "session deadline elapsed, requesting stop"
                );
                token.cancel();
            }
        });

        let output = task.await;
        watcher.abort();
        output
    }
}
