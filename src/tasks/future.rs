//! # Single-consumer handle for one asynchronous result.
//!
//! A [`TaskFuture`] is bound to one submitted task and resolves exactly once
//! with that task's terminal outcome. Both accessors consume the handle, so a
//! second consumption is unrepresentable rather than a runtime error.

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::error::RetryError;

/// Handle for a value not yet available, resolved exactly once.
///
/// Returned by [`Pool::submit`](crate::Pool::submit). Dropping the future
/// does not affect the task: it runs to completion and its result is simply
/// never consumed.
#[derive(Debug)]
pub struct TaskFuture<T, E> {
    result: oneshot::Receiver<Result<T, RetryError<E>>>,
}

impl<T, E> TaskFuture<T, E> {
    pub(crate) fn new(result: oneshot::Receiver<Result<T, RetryError<E>>>) -> Self {
        Self { result }
    }

    /// Waits until the task's result is available and returns it.
    ///
    /// Unconditional wait, no timeout variant. If the producing worker was
    /// torn down before delivering (the pool itself was dropped mid-flight),
    /// resolves to [`RetryError::Canceled`].
    pub async fn get(self) -> Result<T, RetryError<E>> {
        match self.result.await {
            Ok(outcome) => outcome,
            Err(_) => Err(RetryError::Canceled),
        }
    }

    /// Waits until either the result arrives or `ctx` fires.
    ///
    /// Cancellation abandons only this wait and resolves to
    /// [`RetryError::Canceled`]; the underlying task is **not** cancelled and
    /// keeps running in the background.
    pub async fn get_or_cancel(self, ctx: &CancellationToken) -> Result<T, RetryError<E>> {
        let mut result = self.result;
        tokio::select! {
            outcome = &mut result => match outcome {
                Ok(outcome) => outcome,
                Err(_) => Err(RetryError::Canceled),
            },
            _ = ctx.cancelled() => Err(RetryError::Canceled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn get_returns_the_delivered_value() {
        let (tx, rx) = oneshot::channel::<Result<u32, RetryError<&str>>>();
        tx.send(Ok(5)).expect("receiver alive");

        let future = TaskFuture::new(rx);
        assert_eq!(assert_ok!(future.get().await), 5);
    }

    #[tokio::test]
    async fn get_maps_a_lost_producer_to_canceled() {
        let (tx, rx) = oneshot::channel::<Result<u32, RetryError<&str>>>();
        drop(tx);

        let future = TaskFuture::new(rx);
        assert!(matches!(future.get().await, Err(RetryError::Canceled)));
    }

    #[tokio::test]
    async fn get_or_cancel_returns_when_the_token_fires() {
        let (_tx, rx) = oneshot::channel::<Result<u32, RetryError<&str>>>();
        let future = TaskFuture::new(rx);

        let ctx = CancellationToken::new();
        ctx.cancel();

        let outcome = future.get_or_cancel(&ctx).await;
        assert!(matches!(outcome, Err(RetryError::Canceled)));
    }
}
