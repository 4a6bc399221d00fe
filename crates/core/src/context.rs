use std::future::{Future, pending};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::{AppError, AppResult};

/// Caller-supplied cancellation scope for one outbound request.
///
/// Adapters receive the context unmodified from the host and wrap their
/// blocking call with [`RequestContext::run`].
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancellation: Option<watch::Receiver<bool>>,
}

/// Owner side of a cancellable [`RequestContext`].
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signals cancellation to every clone of the linked context.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl RequestContext {
    /// Creates a context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Creates a context together with the handle that cancels it.
    #[must_use]
    pub fn cancellable() -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        (
            Self {
                deadline: None,
                cancellation: Some(receiver),
            },
            CancelHandle { sender },
        )
    }

    /// Returns a copy bounded by `deadline`; an earlier existing deadline wins.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Returns a copy bounded by `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Drives `operation` until it completes or the context ends first.
    pub async fn run<F, T>(&self, operation: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        tokio::select! {
            biased;
            () = self.cancelled() => {
                Err(AppError::Cancelled("request was cancelled".to_owned()))
            }
            () = self.deadline_elapsed() => {
                Err(AppError::Cancelled("request deadline exceeded".to_owned()))
            }
            result = operation => result,
        }
    }

    async fn cancelled(&self) {
        if let Some(receiver) = &self.cancellation {
            let mut receiver = receiver.clone();
            let signalled = receiver.wait_for(|cancelled| *cancelled).await.is_ok();
            if signalled {
                return;
            }
        }

        // Handle dropped without cancelling.
        pending::<()>().await;
    }

    async fn deadline_elapsed(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => pending::<()>().await,
        }
    }
}
