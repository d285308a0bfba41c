//! # retrypool
//!
//! **Retrypool** is a lightweight worker-pool-with-retry library for Rust.
//!
//! It provides primitives to run caller-supplied fallible async operations on
//! a fixed set of workers, with configurable retry/backoff policies and a
//! single-result future per submitted task. The crate is designed as a
//! building block: operations are opaque (database calls, HTTP requests,
//! pure computation), and their results travel back unchanged apart from the
//! retry-outcome classification.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │     Task     │   │     Task     │   │     Task     │
//!     │ (op+retrier) │   │  (op only)   │   │ (op+retrier) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ submit           ▼ submit           ▼ submit
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Pool (fixed worker set)                                          │
//! │  - intake (capacity 1: a submitter blocks until a worker is free) │
//! │  - default Retrier (for tasks that carry none)                    │
//! │  - shared CancellationToken (released on close, after the drain)  │
//! │  - Bus (broadcast lifecycle events)                               │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   worker 0   │   │   worker 1   │   │   worker N-1 │
//!     │ (retry loop) │   │ (retry loop) │   │ (retry loop) │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘
//!      │ oneshot          │ oneshot          │ oneshot
//!      ▼                  ▼                  ▼
//!  TaskFuture::get()  TaskFuture::get()  TaskFuture::get_or_cancel()
//! ```
//!
//! ### Retry loop (per task)
//! ```text
//! loop {
//!   ├─► op() ── Ok ─────────────────► deliver value
//!   │
//!   └─ Err ─► filter rejects? ──────► deliver NonRetryable
//!             attempts ≥ cap? ──────► deliver Exhausted
//!             budget would be hit? ─► deliver ElapsedExceeded
//!             on_retry(err, n, delay)
//!             sleep(delay) ── token fired? ─► deliver Canceled
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits               |
//! |-------------------|--------------------------------------------------------------|----------------------------------|
//! | **Retry**         | Bounded retries, geometric backoff, additive jitter.         | [`Retrier`], [`RetryConfig`], [`BackoffPolicy`] |
//! | **Pool**          | Fixed worker set, rendezvous intake, graceful close.         | [`Pool`], [`PoolConfig`]         |
//! | **Futures**       | One result per task, cancellable wait.                       | [`TaskFuture`]                   |
//! | **Errors**        | Typed terminal outcomes and lifecycle errors.                | [`RetryError`], [`PoolError`]    |
//! | **Observability** | Lifecycle events, pluggable subscribers.                     | [`Event`], [`Bus`], [`Subscribe`]|
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use retrypool::{BackoffPolicy, Pool, PoolConfig, Retrier, RetryConfig, Task};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let pool: Pool<String, std::io::Error> = Pool::new(PoolConfig {
//!         workers: 4,
//!         ..PoolConfig::default()
//!     });
//!
//!     // A reusable retrier for calls that deserve a tighter schedule.
//!     let api_retrier = Arc::new(Retrier::new(RetryConfig {
//!         max_retries: 4,
//!         backoff: BackoffPolicy {
//!             first: Duration::from_millis(50),
//!             ..BackoffPolicy::default()
//!         },
//!         ..RetryConfig::default()
//!     }));
//!
//!     let future = pool
//!         .submit(
//!             Task::new("fetch-greeting", || async { Ok("hello".to_string()) })
//!                 .with_retrier(api_retrier),
//!         )
//!         .await
//!         .expect("pool is open");
//!
//!     assert_eq!(future.get().await.expect("task succeeds"), "hello");
//!     pool.close().await;
//! }
//! ```

mod core;
mod error;
mod events;
mod policies;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use crate::core::{Pool, PoolConfig, Retrier, RetryConfig, DEFAULT_WORKERS};
pub use crate::error::{PoolError, RetryError};
pub use crate::events::{Bus, Event, EventKind};
pub use crate::policies::BackoffPolicy;
pub use crate::subscribers::{Subscribe, SubscriberSet};
pub use crate::tasks::{OpFuture, Task, TaskFuture};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use crate::subscribers::LogWriter;
