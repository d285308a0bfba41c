//! # Unit of work submitted to a pool.
//!
//! [`Task`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per
//! attempt. This avoids shared mutable state between attempts: if an
//! operation needs state that survives retries, share it explicitly with an
//! `Arc` inside the closure.
//!
//! The operation is opaque to the pool: it may call a database, an HTTP
//! client, or pure computation; its result travels back unchanged apart from
//! the retry-outcome wrapping in [`RetryError`](crate::RetryError).

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::core::Retrier;

/// Boxed future produced by a task operation, one per attempt.
pub type OpFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

type Operation<T, E> = Box<dyn Fn() -> OpFuture<T, E> + Send + Sync>;

/// A named fallible operation plus an optional retrier.
///
/// Immutable once submitted. Tasks without a retrier inherit the pool's
/// default retry configuration.
///
/// ## Example
/// ```rust
/// use retrypool::Task;
///
/// let task: Task<u32, std::io::Error> = Task::new("answer", || async { Ok(42) });
/// assert_eq!(task.name(), "answer");
/// ```
pub struct Task<T, E> {
    name: Cow<'static, str>,
    op: Operation<T, E>,
    retrier: Option<Arc<Retrier<E>>>,
}

impl<T, E> Task<T, E> {
    /// Creates a task from a name and an operation.
    ///
    /// The closure *creates* a new future per attempt (`Fn`, not `FnMut`).
    pub fn new<F, Fut>(name: impl Into<Cow<'static, str>>, op: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            name: name.into(),
            op: Box::new(move || -> OpFuture<T, E> { Box::pin(op()) }),
            retrier: None,
        }
    }

    /// Returns a new task carrying its own retrier, overriding the pool
    /// default for this task only.
    pub fn with_retrier(mut self, retrier: Arc<Retrier<E>>) -> Self {
        self.retrier = Some(retrier);
        self
    }

    /// Returns the task name (used in events and logs).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task-attached retrier, if any.
    pub(crate) fn retrier(&self) -> Option<&Arc<Retrier<E>>> {
        self.retrier.as_ref()
    }

    /// Starts one attempt of the operation.
    pub(crate) fn call(&self) -> OpFuture<T, E> {
        (self.op)()
    }
}
