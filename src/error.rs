//! Error types used by the pool runtime and retrying task executions.
//!
//! This module defines two main error enums:
//!
//! - [`RetryError`] — terminal outcomes of a retried task execution.
//! - [`PoolError`] — errors raised by the pool lifecycle itself.
//!
//! Both types provide an `as_label` helper for logging/metrics. A
//! [`RetryError`] is generic over the error type `E` produced by the task
//! operation, so the underlying failure travels to the caller intact.

use thiserror::Error;

/// # Terminal outcomes of a retried execution.
///
/// Produced by [`Retrier::run`](crate::Retrier::run) and delivered through a
/// [`TaskFuture`](crate::TaskFuture). The variants are mutually exclusive:
/// exactly one of them describes why an execution stopped without a value.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RetryError<E> {
    /// The error filter classified the failure as not worth retrying.
    ///
    /// Renders exactly as the underlying error; no retries were consumed.
    #[error("{0}")]
    NonRetryable(E),

    /// The attempt cap was reached; carries the last underlying error.
    #[error("retries exhausted after {attempts} attempts: {last}")]
    Exhausted {
        /// Number of execution attempts performed.
        attempts: u32,
        /// The error produced by the final attempt.
        last: E,
    },

    /// The wall-clock retry budget was exceeded before the next attempt.
    #[error("elapsed time limit exceeded: {last}")]
    ElapsedExceeded {
        /// The error produced by the most recent attempt.
        last: E,
    },

    /// The cancellation scope fired while waiting (between attempts, or while
    /// a consumer waited on a future). The task's own last error is lost.
    #[error("canceled while waiting")]
    Canceled,

    /// The task operation panicked; the panic was captured by the worker and
    /// converted into an ordinary error so the worker stays in rotation.
    #[error("task panicked: {reason}")]
    Panicked {
        /// Best-effort rendering of the panic payload.
        reason: String,
    },
}

impl<E> RetryError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retrypool::RetryError;
    ///
    /// let err: RetryError<std::io::Error> = RetryError::Panicked { reason: "boom".into() };
    /// assert_eq!(err.as_label(), "panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryError::NonRetryable(_) => "non_retryable",
            RetryError::Exhausted { .. } => "retries_exhausted",
            RetryError::ElapsedExceeded { .. } => "elapsed_exceeded",
            RetryError::Canceled => "canceled",
            RetryError::Panicked { .. } => "panicked",
        }
    }

    /// True if the outcome was produced by cancellation rather than by the
    /// task itself.
    pub fn is_canceled(&self) -> bool {
        matches!(self, RetryError::Canceled)
    }

    /// Recovers the underlying task error, if this outcome carries one.
    pub fn into_source(self) -> Option<E> {
        match self {
            RetryError::NonRetryable(err) => Some(err),
            RetryError::Exhausted { last, .. } => Some(last),
            RetryError::ElapsedExceeded { last } => Some(last),
            RetryError::Canceled | RetryError::Panicked { .. } => None,
        }
    }
}

/// # Errors produced by the pool lifecycle.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// `submit` was called after `close` had begun.
    #[error("pool is closed")]
    Closed,
}

impl PoolError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retrypool::PoolError;
    ///
    /// assert_eq!(PoolError::Closed.as_label(), "pool_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PoolError::Closed => "pool_closed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_retryable_renders_the_underlying_error_unchanged() {
        let err: RetryError<&str> = RetryError::NonRetryable("boom");
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn exhausted_message_carries_attempts_and_last_error() {
        let err: RetryError<&str> = RetryError::Exhausted {
            attempts: 3,
            last: "boom",
        };
        assert_eq!(err.to_string(), "retries exhausted after 3 attempts: boom");
        assert_eq!(err.as_label(), "retries_exhausted");
    }

    #[test]
    fn into_source_recovers_the_task_error() {
        let err: RetryError<&str> = RetryError::ElapsedExceeded { last: "slow" };
        assert_eq!(err.into_source(), Some("slow"));

        let err: RetryError<&str> = RetryError::Canceled;
        assert!(err.into_source().is_none());
    }
}
