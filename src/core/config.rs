//! # Runtime configuration records.
//!
//! Provides [`RetryConfig`] (per-retrier settings) and [`PoolConfig`]
//! (per-pool settings).
//!
//! Config is used in two ways:
//! 1. **Retrier creation**: `Retrier::new(retry_config)`
//! 2. **Pool creation**: `Pool::new(pool_config)`, whose `retry` field also
//!    becomes the default retrier for tasks submitted without one.
//!
//! ## Sentinel values
//! - `RetryConfig::max_elapsed = 0s` → no wall-clock budget
//! - `PoolConfig::workers = 0` → corrected to [`DEFAULT_WORKERS`]
//!
//! Prefer the helper accessors over sprinkling sentinel checks across the
//! codebase.

use std::time::Duration;

use crate::policies::BackoffPolicy;

/// Worker count used when a pool is configured with `workers = 0`.
pub const DEFAULT_WORKERS: usize = 10;

/// Configuration for a [`Retrier`](crate::Retrier).
///
/// ## Field semantics
/// - `max_retries`: cap on **execution attempts** (`1` = run once, never retry)
/// - `max_elapsed`: wall-clock budget across all attempts (`0s` = unlimited)
/// - `backoff`: delay schedule between attempts
///
/// Out-of-range values are normalized at retrier construction; see
/// [`RetryConfig::normalized`].
#[derive(Clone, Copy, Debug)]
pub struct RetryConfig {
    /// Maximum number of execution attempts (≥ 1).
    ///
    /// Counts executions, not waits: `max_retries = 1` means the operation
    /// runs exactly once and no retry is ever scheduled.
    pub max_retries: u32,

    /// Wall-clock budget measured from the first attempt.
    ///
    /// Once the budget is reached (or a scheduled wait would overshoot it),
    /// the retrier stops with an elapsed-limit error. `Duration::ZERO`
    /// disables the budget.
    pub max_elapsed: Duration,

    /// Delay schedule between attempts.
    pub backoff: BackoffPolicy,
}

impl RetryConfig {
    /// Returns the wall-clock budget as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(d)` → budget of `d` across all attempts
    #[inline]
    pub fn elapsed_limit(&self) -> Option<Duration> {
        if self.max_elapsed == Duration::ZERO {
            None
        } else {
            Some(self.max_elapsed)
        }
    }

    /// Clamps out-of-range fields to usable values.
    ///
    /// - `max_retries` is raised to at least 1;
    /// - `backoff.factor` is raised to at least 1.0;
    /// - `backoff.jitter` is clamped into `[0, 1)` (non-finite → 0).
    pub(crate) fn normalized(mut self) -> Self {
        self.max_retries = self.max_retries.max(1);
        self.backoff.factor = self.backoff.factor.max(1.0);
        self.backoff.jitter = if self.backoff.jitter.is_finite() {
            self.backoff.jitter.clamp(0.0, 1.0 - f64::EPSILON)
        } else {
            0.0
        };
        self
    }
}

impl Default for RetryConfig {
    /// Default configuration:
    ///
    /// - `max_retries = 5`
    /// - `max_elapsed = 30s`
    /// - `backoff = BackoffPolicy::default()` (100ms → ×2 → 5s cap, jitter 0.1)
    fn default() -> Self {
        Self {
            max_retries: 5,
            max_elapsed: Duration::from_secs(30),
            backoff: BackoffPolicy::default(),
        }
    }
}

/// Configuration for a [`Pool`](crate::Pool).
///
/// ## Field semantics
/// - `workers`: fixed worker count (`0` = corrected to [`DEFAULT_WORKERS`])
/// - `retry`: default retry configuration for tasks submitted without their
///   own retrier
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by the bus)
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Number of workers; fixed for the lifetime of the pool.
    pub workers: usize,

    /// Retry configuration applied to tasks that carry no retrier of their own.
    pub retry: RetryConfig,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events will
    /// skip older items.
    pub bus_capacity: usize,
}

impl PoolConfig {
    /// Returns the effective worker count, correcting the `0` sentinel.
    #[inline]
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            DEFAULT_WORKERS
        } else {
            self.workers
        }
    }
}

impl Default for PoolConfig {
    /// Default configuration:
    ///
    /// - `workers = DEFAULT_WORKERS` (10)
    /// - `retry = RetryConfig::default()`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            retry: RetryConfig::default(),
            bus_capacity: 1024,
        }
    }
}
