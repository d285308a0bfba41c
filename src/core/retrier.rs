//! # Retrier: bounded retry with backoff for one fallible operation.
//!
//! Drives a caller-supplied operation to a terminal outcome:
//! - retries per [`RetryConfig`] (attempt cap, wall-clock budget),
//! - delays per [`BackoffPolicy`](crate::BackoffPolicy) (geometric + jitter),
//! - cooperative cancellation via [`CancellationToken`] during waits.
//!
//! ## Flow
//! ```text
//! loop {
//!   ├─► op() ── Ok ──► return value (no retry bookkeeping on the happy path)
//!   │
//!   └─ Err ──► error_filter says "not retryable"? ─► return NonRetryable
//!              ├─► attempts += 1
//!              ├─► attempts ≥ max_retries      ─► return Exhausted
//!              ├─► delay = backoff.next(attempts - 1)
//!              ├─► elapsed budget would be hit ─► return ElapsedExceeded
//!              ├─► on_retry(err, attempts, delay)
//!              └─► sleep(delay) (cancellable)  ─► Canceled on token fire
//! }
//! ```
//!
//! ## Rules
//! - Cancellation is honored only **between** attempts; an operation already
//!   executing always runs to completion.
//! - A sleep that would end past the elapsed budget is never started.
//! - The retrier holds no randomness state; jitter draws from the calling
//!   thread's generator, so one retrier may serve many concurrent executions.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::core::config::RetryConfig;
use crate::error::RetryError;

type ErrorFilter<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;
type RetryHook<E> = Box<dyn Fn(&E, u32, Duration) + Send + Sync>;

/// Executes fallible operations with bounded retries and backoff.
///
/// A `Retrier` owns only configuration and hooks; per-execution state lives
/// on the stack of [`Retrier::run`]. Wrap one in an `Arc` to share a single
/// policy across many tasks.
///
/// ### Hooks
/// - `error_filter`: classifies an error as retryable (`true`) or terminal
///   (`false`). Absent = every error is retryable.
/// - `on_retry`: observer invoked before each backoff sleep with the error,
///   the attempt number (1-based) and the upcoming delay. Side-effecting
///   only; it must not panic. A panicking hook is treated as a fault of the
///   operation, not caught here.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use retrypool::{BackoffPolicy, Retrier, RetryConfig};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let retrier: Retrier<&str> = Retrier::new(RetryConfig {
///         max_retries: 3,
///         backoff: BackoffPolicy {
///             first: Duration::from_millis(1),
///             ..BackoffPolicy::default()
///         },
///         ..RetryConfig::default()
///     });
///
///     let ctx = CancellationToken::new();
///     let value = retrier
///         .run(&ctx, || async { Ok::<_, &str>(7) })
///         .await
///         .expect("succeeds on the first attempt");
///     assert_eq!(value, 7);
/// }
/// ```
pub struct Retrier<E> {
    cfg: RetryConfig,
    error_filter: Option<ErrorFilter<E>>,
    on_retry: Option<RetryHook<E>>,
}

impl<E> Default for Retrier<E> {
    /// Returns a retrier with [`RetryConfig::default`] and no hooks.
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl<E> Retrier<E> {
    /// Creates a retrier from the given configuration.
    ///
    /// Out-of-range fields are silently normalized (attempt cap raised to 1,
    /// factor raised to 1.0, jitter clamped into `[0, 1)`).
    pub fn new(cfg: RetryConfig) -> Self {
        Self {
            cfg: cfg.normalized(),
            error_filter: None,
            on_retry: None,
        }
    }

    /// Returns a new retrier with the given error classifier.
    ///
    /// When the filter returns `false` for an error, `run` stops immediately
    /// and surfaces that error as [`RetryError::NonRetryable`]; no retries
    /// are consumed and `on_retry` is not invoked.
    pub fn with_error_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.error_filter = Some(Box::new(filter));
        self
    }

    /// Returns a new retrier with the given retry observer.
    ///
    /// Invoked once per scheduled retry, after the delay is computed and
    /// before the sleep starts. Must not block the runtime or panic.
    pub fn with_on_retry<F>(mut self, hook: F) -> Self
    where
        F: Fn(&E, u32, Duration) + Send + Sync + 'static,
    {
        self.on_retry = Some(Box::new(hook));
        self
    }

    /// Returns the (normalized) configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.cfg
    }

    /// Runs `op` until it succeeds or a terminal condition is reached.
    ///
    /// `op` is called once per attempt and must produce a fresh future each
    /// time. The first failure schedules a wait of `backoff.first`; each
    /// further failure multiplies the base delay by `backoff.factor` up to
    /// `backoff.max`, plus jitter.
    ///
    /// ### Terminal outcomes
    /// - `Ok(value)` — the operation succeeded on some attempt.
    /// - [`RetryError::NonRetryable`] — the error filter rejected the error.
    /// - [`RetryError::Exhausted`] — `max_retries` attempts all failed.
    /// - [`RetryError::ElapsedExceeded`] — the wall-clock budget ran out, or
    ///   the next wait would overshoot it.
    /// - [`RetryError::Canceled`] — `ctx` fired during a backoff sleep. This
    ///   takes priority over continuing to retry; the task's own last error
    ///   is dropped.
    pub async fn run<T, F, Fut>(&self, ctx: &CancellationToken, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if let Some(filter) = &self.error_filter {
                if !filter(&err) {
                    return Err(RetryError::NonRetryable(err));
                }
            }

            attempts += 1;
            if attempts >= self.cfg.max_retries {
                return Err(RetryError::Exhausted {
                    attempts,
                    last: err,
                });
            }

            let delay = self.cfg.backoff.next(attempts - 1);
            if let Some(limit) = self.cfg.elapsed_limit() {
                let elapsed = started.elapsed();
                if elapsed >= limit || elapsed + delay >= limit {
                    return Err(RetryError::ElapsedExceeded { last: err });
                }
            }

            if let Some(hook) = &self.on_retry {
                hook(&err, attempts, delay);
            }

            let sleep = time::sleep(delay);
            tokio::pin!(sleep);
            tokio::select! {
                _ = &mut sleep => {}
                _ = ctx.cancelled() => return Err(RetryError::Canceled),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::policies::BackoffPolicy;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn plain_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            max_elapsed: Duration::ZERO,
            backoff: BackoffPolicy {
                first: ms(100),
                max: Duration::from_secs(5),
                factor: 2.0,
                jitter: 0.0,
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_first_attempt_returns_immediately() {
        let retrier: Retrier<&str> = Retrier::new(plain_config(5));
        let ctx = CancellationToken::new();
        let calls = AtomicU32::new(0);

        let started = Instant::now();
        let value = retrier
            .run(&ctx, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, &str>("done") }
            })
            .await
            .expect("no retries needed");

        assert_eq!(value, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_with_geometric_waits_then_succeeds() {
        let observed: Arc<Mutex<Vec<(u32, Duration)>>> = Arc::new(Mutex::new(Vec::new()));
        let retrier: Retrier<&str> = Retrier::new(plain_config(4)).with_on_retry({
            let observed = Arc::clone(&observed);
            move |_err, attempt, delay| observed.lock().unwrap().push((attempt, delay))
        });

        let ctx = CancellationToken::new();
        let calls = AtomicU32::new(0);

        let started = Instant::now();
        let value = retrier
            .run(&ctx, || {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call < 3 {
                        Err("flaky")
                    } else {
                        Ok(9)
                    }
                }
            })
            .await
            .expect("fourth attempt succeeds");

        assert_eq!(value, 9);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(
            *observed.lock().unwrap(),
            vec![(1, ms(100)), (2, ms(200)), (3, ms(400))]
        );
        assert_eq!(started.elapsed(), ms(700));
    }

    #[tokio::test(start_paused = true)]
    async fn always_failing_operation_exhausts_the_attempt_cap() {
        let retrier: Retrier<&str> = Retrier::new(plain_config(3));
        let ctx = CancellationToken::new();
        let calls = AtomicU32::new(0);

        let outcome = retrier
            .run::<u32, _, _>(&ctx, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("boom") }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match outcome {
            Err(RetryError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert_eq!(last, "boom");
            }
            other => panic!("expected Exhausted, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn attempt_cap_of_one_means_no_retries() {
        let retrier: Retrier<&str> = Retrier::new(plain_config(1));
        let ctx = CancellationToken::new();
        let calls = AtomicU32::new(0);

        let started = Instant::now();
        let outcome = retrier
            .run::<u32, _, _>(&ctx, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("boom") }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert!(matches!(outcome, Err(RetryError::Exhausted { attempts: 1, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_error_stops_on_the_first_failure() {
        let hook_calls = Arc::new(AtomicU32::new(0));
        let retrier: Retrier<&str> = Retrier::new(plain_config(5))
            .with_error_filter(|err: &&str| !err.contains("fatal"))
            .with_on_retry({
                let hook_calls = Arc::clone(&hook_calls);
                move |_, _, _| {
                    hook_calls.fetch_add(1, Ordering::SeqCst);
                }
            });

        let ctx = CancellationToken::new();
        let calls = AtomicU32::new(0);

        let outcome = retrier
            .run::<u32, _, _>(&ctx, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("fatal: bad credentials") }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(hook_calls.load(Ordering::SeqCst), 0);
        match outcome {
            Err(RetryError::NonRetryable(err)) => assert_eq!(err, "fatal: bad credentials"),
            other => panic!("expected NonRetryable, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_budget_stops_before_an_overshooting_sleep() {
        let retrier: Retrier<&str> = Retrier::new(RetryConfig {
            max_retries: 10,
            max_elapsed: ms(200),
            backoff: BackoffPolicy {
                first: ms(100),
                max: Duration::from_secs(5),
                factor: 2.0,
                jitter: 0.0,
            },
        });
        let ctx = CancellationToken::new();
        let calls = AtomicU32::new(0);

        let started = Instant::now();
        let outcome = retrier
            .run::<u32, _, _>(&ctx, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("slow") }
            })
            .await;

        // First wait (100ms) fits the budget; the second (200ms) would end at
        // 300ms and is never started.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(outcome, Err(RetryError::ElapsedExceeded { .. })));
        assert!(
            started.elapsed() < ms(200),
            "terminated after {:?}, past the budget",
            started.elapsed()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_a_backoff_sleep() {
        let retrier: Retrier<&str> = Retrier::new(RetryConfig {
            max_retries: 5,
            max_elapsed: Duration::ZERO,
            backoff: BackoffPolicy {
                first: Duration::from_secs(10),
                max: Duration::from_secs(60),
                factor: 2.0,
                jitter: 0.0,
            },
        });
        let ctx = CancellationToken::new();

        let started = Instant::now();
        let handle = tokio::spawn({
            let ctx = ctx.clone();
            async move {
                retrier
                    .run::<u32, _, _>(&ctx, || async { Err("flaky") })
                    .await
            }
        });

        time::sleep(ms(50)).await;
        ctx.cancel();

        let outcome = handle.await.expect("retry task not aborted");
        assert!(matches!(outcome, Err(RetryError::Canceled)));
        assert_eq!(started.elapsed(), ms(50));
    }
}
