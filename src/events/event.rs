//! # Lifecycle events emitted by the pool and its workers.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Task events**: per-task execution flow (accepted, started, terminal outcome)
//! - **Pool events**: lifecycle of the pool itself (closing, drained)
//!
//! The [`Event`] struct carries additional metadata such as the timestamp,
//! task name, worker index, and failure reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact publish order when events
//! are observed out of order.
//!
//! ## Example
//! ```rust
//! use retrypool::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_task("sync-orders")
//!     .with_worker(3)
//!     .with_reason("retries exhausted after 5 attempts: connection refused");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("sync-orders"));
//! assert_eq!(ev.worker, Some(3));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of pool lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Task events ===
    /// Task admitted for execution (it may still wait for a free worker).
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`/`seq`
    TaskAccepted,

    /// A worker began executing the task.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `worker`: worker index
    /// - `at`/`seq`
    TaskStarted,

    /// Task reached a successful terminal outcome.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `worker`: worker index
    /// - `at`/`seq`
    TaskSucceeded,

    /// Task reached a failed terminal outcome (after any retries).
    ///
    /// Sets:
    /// - `task`: task name
    /// - `worker`: worker index
    /// - `reason`: rendered terminal error
    /// - `at`/`seq`
    TaskFailed,

    /// Task operation panicked; the panic was captured and converted into an
    /// error result, and the worker stayed in rotation.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `worker`: worker index
    /// - `reason`: panic payload rendering
    /// - `at`/`seq`
    TaskPanicked,

    // === Pool events ===
    /// Close began: the intake is shut, accepted tasks are draining.
    ///
    /// Sets:
    /// - `at`/`seq`
    PoolClosing,

    /// All workers finished and the cancellation scope was released.
    ///
    /// Sets:
    /// - `at`/`seq`
    PoolDrained,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Index of the worker that handled the task, if applicable.
    pub worker: Option<usize>,
    /// Human-readable reason (terminal errors, panic payloads).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            worker: None,
            reason: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a worker index.
    #[inline]
    pub fn with_worker(mut self, worker: usize) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
