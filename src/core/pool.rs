//! # Pool: a fixed set of workers executing retried tasks.
//!
//! The [`Pool`] owns the worker set, the rendezvous intake, the event bus,
//! and the shared cancellation scope. It hands each submitted [`Task`] to an
//! idle worker and returns a [`TaskFuture`] resolving to that task's terminal
//! outcome.
//!
//! ## High-level architecture
//! ```text
//! submit(task) ──► intake (capacity 1, rendezvous) ──► worker 0..N-1
//!     │                                                  │
//!     │ blocks until a worker                            ├─► Retrier::run(pool_ctx, op)
//!     │ makes room (backpressure)                        ├─► publish Task* events
//!     └──► TaskFuture ◄── oneshot ◄──────────────────────┴─► deliver Result (exactly once)
//!
//! close():
//!   take intake sender ─► workers drain and exit ─► cancel pool_ctx ─► PoolDrained
//! ```
//!
//! ## Rules
//! - Worker count is fixed at construction and never changes.
//! - Every accepted task yields exactly one result, delivered to exactly one
//!   future.
//! - Completion order between distinct tasks is unspecified; tasks share no
//!   pool-owned state.
//! - Cancellation (released by `close` after the drain) aborts backoff waits
//!   only; an operation already executing is never preempted.

use std::fmt::Display;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::core::config::PoolConfig;
use crate::core::retrier::Retrier;
use crate::core::worker::{run_worker, Intake, Job};
use crate::error::PoolError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::tasks::{Task, TaskFuture};

/// A fixed-size worker pool running retried tasks.
///
/// Must be created inside a Tokio runtime (workers are spawned at
/// construction). Dropping the pool without [`Pool::close`] shuts the intake
/// and lets workers exit after their current job; `close` additionally waits
/// for that drain.
///
/// # Example
/// ```
/// use retrypool::{Pool, PoolConfig, Task};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let pool: Pool<u32, std::io::Error> = Pool::new(PoolConfig {
///         workers: 2,
///         ..PoolConfig::default()
///     });
///
///     let future = pool
///         .submit(Task::new("answer", || async { Ok(42) }))
///         .await
///         .expect("pool is open");
///     assert_eq!(future.get().await.expect("task succeeds"), 42);
///
///     pool.close().await;
/// }
/// ```
pub struct Pool<T, E> {
    state: Mutex<PoolState<T, E>>,
    ctx: CancellationToken,
    bus: Bus,
}

/// Mutable pool state; the mutex also guards the open/closed transition so
/// `submit` and `close` never race on it.
struct PoolState<T, E> {
    intake: Option<mpsc::Sender<Job<T, E>>>,
    workers: JoinSet<()>,
}

impl<T, E> Pool<T, E>
where
    T: Send + 'static,
    E: Display + Send + 'static,
{
    /// Creates a pool with the given configuration and no subscribers.
    pub fn new(cfg: PoolConfig) -> Self {
        Self::with_subscribers(cfg, Vec::new())
    }

    /// Creates a pool and attaches event subscribers.
    ///
    /// A listener task forwards every bus event to the subscriber set and
    /// shuts the set down once the bus closes (when the pool and its workers
    /// are gone).
    pub fn with_subscribers(cfg: PoolConfig, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        if !subscribers.is_empty() {
            spawn_listener(bus.subscribe(), SubscriberSet::new(subscribers));
        }

        let ctx = CancellationToken::new();
        let fallback = Arc::new(Retrier::new(cfg.retry));
        let (tx, rx) = mpsc::channel(1);
        let intake: Intake<T, E> = Arc::new(Mutex::new(rx));

        let mut workers = JoinSet::new();
        for id in 0..cfg.worker_count() {
            workers.spawn(run_worker(
                id,
                Arc::clone(&intake),
                ctx.clone(),
                Arc::clone(&fallback),
                bus.clone(),
            ));
        }

        Self {
            state: Mutex::new(PoolState {
                intake: Some(tx),
                workers,
            }),
            ctx,
            bus,
        }
    }

    /// Submits a task, blocking until a worker makes room for it.
    ///
    /// This blocking is the pool's backpressure mechanism: an arbitrarily
    /// fast stream of submitters is throttled to the rate at which workers
    /// free up. Returns [`PoolError::Closed`] once [`Pool::close`] has begun.
    pub async fn submit(&self, task: Task<T, E>) -> Result<TaskFuture<T, E>, PoolError> {
        // Clone the sender under the lock, but never hold the lock across the
        // rendezvous send: close() must be able to proceed while submitters
        // are parked waiting for a worker.
        let tx = {
            let state = self.state.lock().await;
            match &state.intake {
                Some(tx) => tx.clone(),
                None => return Err(PoolError::Closed),
            }
        };

        self.bus
            .publish(Event::new(EventKind::TaskAccepted).with_task(task.name()));

        let (done, result) = oneshot::channel();
        tx.send(Job { task, done })
            .await
            .map_err(|_| PoolError::Closed)?;
        Ok(TaskFuture::new(result))
    }

    /// Closes the pool: stops intake, drains accepted tasks, releases the
    /// shared cancellation scope.
    ///
    /// Idempotent and safe to call concurrently with in-flight submits and
    /// with itself; callers racing this method serialize on the state lock
    /// and all observe the drain completed. May wait arbitrarily long if a
    /// task operation never returns: the pool has no forced-interrupt
    /// mechanism for an operation already in flight.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        let draining = state.intake.take().is_some();
        if draining {
            self.bus.publish(Event::new(EventKind::PoolClosing));
        }

        while state.workers.join_next().await.is_some() {}
        self.ctx.cancel();

        if draining {
            self.bus.publish(Event::new(EventKind::PoolDrained));
        }
    }

    /// Returns a receiver observing lifecycle events published after this
    /// call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }
}

/// Forwards bus events to the subscriber set (fire-and-forget).
fn spawn_listener(mut rx: broadcast::Receiver<Event>, set: SubscriberSet) {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => set.emit(&ev),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        set.shutdown().await;
    });
}
