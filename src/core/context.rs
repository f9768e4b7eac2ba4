use super::error::ContextError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Execution context threaded through every blocking collaborator call.
///
/// Carries a cancellation token shared with the caller and an optional per-call
/// timeout. Calls made through [`OperationContext::run`] return as soon as either
/// fires, dropping the in-flight work.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl OperationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an externally owned token, so cancelling it aborts work running under this context.
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            timeout: None,
        }
    }

    /// Bounds each collaborator call made through this context.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Drives `fut` to completion unless the context is cancelled or the timeout elapses first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, ContextError>
    where
        F: Future<Output = T>,
    {
        if self.cancel.is_cancelled() {
            return Err(ContextError::Cancelled);
        }

        let bounded = async {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, fut)
                    .await
                    .map_err(|_| ContextError::DeadlineExceeded(limit)),
                None => Ok(fut.await),
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ContextError::Cancelled),
            result = bounded => result,
        }
    }
}
