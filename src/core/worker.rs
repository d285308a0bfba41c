//! # Worker loop: executes one task at a time from the shared intake.
//!
//! Each worker repeatedly takes a job from the rendezvous intake, resolves
//! the effective retrier (the task's own, or the pool default), drives the
//! retry loop under the pool's cancellation scope, and delivers exactly one
//! result to the job's future.
//!
//! ## Rules
//! - One job at a time per worker; workers hold no state across jobs.
//! - A failed (or panicked) job never removes the worker from rotation.
//! - The worker exits when the intake closes (pool close or drop).

use std::any::Any;
use std::fmt::Display;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_util::sync::CancellationToken;

use crate::core::retrier::Retrier;
use crate::error::RetryError;
use crate::events::{Bus, Event, EventKind};
use crate::tasks::Task;

/// A submitted task paired with its result channel.
pub(crate) struct Job<T, E> {
    pub(crate) task: Task<T, E>,
    pub(crate) done: oneshot::Sender<Result<T, RetryError<E>>>,
}

/// Intake shared by all workers of one pool.
///
/// The mutex serializes idle workers on `recv`; together with the channel's
/// capacity of 1 this keeps submission a rendezvous: a submitter is released
/// only when a worker has made room by draining the slot.
pub(crate) type Intake<T, E> = Arc<Mutex<mpsc::Receiver<Job<T, E>>>>;

/// Runs one worker until the intake closes.
pub(crate) async fn run_worker<T, E>(
    id: usize,
    intake: Intake<T, E>,
    ctx: CancellationToken,
    fallback: Arc<Retrier<E>>,
    bus: Bus,
) where
    T: Send + 'static,
    E: Display + Send + 'static,
{
    loop {
        let job = {
            let mut slot = intake.lock().await;
            slot.recv().await
        };
        let Some(Job { task, done }) = job else { break };

        bus.publish(
            Event::new(EventKind::TaskStarted)
                .with_task(task.name())
                .with_worker(id),
        );

        let retrier = match task.retrier() {
            Some(own) => Arc::clone(own),
            None => Arc::clone(&fallback),
        };
        let outcome = execute(&retrier, &ctx, &task).await;

        match &outcome {
            Ok(_) => bus.publish(
                Event::new(EventKind::TaskSucceeded)
                    .with_task(task.name())
                    .with_worker(id),
            ),
            Err(RetryError::Panicked { reason }) => bus.publish(
                Event::new(EventKind::TaskPanicked)
                    .with_task(task.name())
                    .with_worker(id)
                    .with_reason(reason.clone()),
            ),
            Err(err) => bus.publish(
                Event::new(EventKind::TaskFailed)
                    .with_task(task.name())
                    .with_worker(id)
                    .with_reason(err.to_string()),
            ),
        }

        // The consumer may have dropped its future; that is not an error.
        let _ = done.send(outcome);
    }
}

/// Drives one task to a terminal outcome, capturing panics.
///
/// A panic anywhere in the operation (or in a retry hook) is converted into
/// [`RetryError::Panicked`] so the worker survives and the pool stays usable.
async fn execute<T, E>(
    retrier: &Retrier<E>,
    ctx: &CancellationToken,
    task: &Task<T, E>,
) -> Result<T, RetryError<E>> {
    let run = retrier.run(ctx, || task.call());
    match std::panic::AssertUnwindSafe(run).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(panic) => Err(RetryError::Panicked {
            reason: panic_reason(panic.as_ref()),
        }),
    }
}

/// Best-effort rendering of a panic payload.
fn panic_reason(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
