//! # Backoff policy for retrying tasks.
//!
//! [`BackoffPolicy`] controls how retry delays grow after repeated failures.
//! It is parameterized by:
//! - [`BackoffPolicy::first`] the delay before the first retry;
//! - [`BackoffPolicy::factor`] the multiplicative growth factor;
//! - [`BackoffPolicy::max`] the maximum delay cap;
//! - [`BackoffPolicy::jitter`] the additive noise fraction.
//!
//! The delay for retry `n` is computed as `first × factor^n`, clamped to
//! `max`, then jitter is applied. Because the base delay is derived purely
//! from the retry number, jitter output never feeds back into subsequent
//! calculations — this prevents the negative feedback loop that causes delays
//! to shrink over time.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use retrypool::BackoffPolicy;
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(5),
//!     factor: 2.0,
//!     jitter: 0.0,
//! };
//!
//! // Retry 0 — uses `first` (100ms)
//! assert_eq!(backoff.next(0), Duration::from_millis(100));
//!
//! // Retry 1 — first × factor^1 = 200ms
//! assert_eq!(backoff.next(1), Duration::from_millis(200));
//!
//! // Retry 10 — 100ms × 2^10 = 102_400ms → capped at max=5s
//! assert_eq!(backoff.next(10), Duration::from_secs(5));
//! ```

use std::time::Duration;

use crate::policies::jitter;

/// Retry backoff policy.
///
/// Encapsulates parameters that determine how retry delays grow:
/// - [`BackoffPolicy::first`] — the delay before the first retry;
/// - [`BackoffPolicy::factor`] — multiplicative growth factor;
/// - [`BackoffPolicy::max`] — the maximum delay cap;
/// - [`BackoffPolicy::jitter`] — additive noise fraction in `[0, 1)`.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub first: Duration,
    /// Maximum delay cap for retries (applied before jitter).
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Additive jitter fraction: each delay gains `delay × U` with
    /// `U ∈ [0, jitter)`. `0.0` disables jitter.
    pub jitter: f64,
}

impl Default for BackoffPolicy {
    /// Returns a policy with:
    /// - `first = 100ms`;
    /// - `max = 5s`;
    /// - `factor = 2.0`;
    /// - `jitter = 0.1`.
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(5),
            factor: 2.0,
            jitter: 0.1,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay for the given retry number (0-indexed).
    ///
    /// The base delay is `first × factor^retry`, clamped to
    /// [`BackoffPolicy::max`]. Jitter is applied to the clamped base, but the
    /// result is **never** fed back into subsequent calculations — each retry
    /// derives its base independently.
    ///
    /// # Notes
    /// - If `factor` equals 1.0, the delay remains constant at `first` (up to `max`).
    /// - If `factor` is greater than 1.0, delays grow geometrically up to `max`.
    /// - Jitter may push the final value above `max`; the cap bounds the base.
    pub fn next(&self, retry: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let clamped_exp = retry.min(i32::MAX as u32) as i32;
        let unclamped_secs = self.first.as_secs_f64() * self.factor.powi(clamped_exp);

        let base =
            if !unclamped_secs.is_finite() || unclamped_secs < 0.0 || unclamped_secs > max_secs {
                self.max
            } else {
                Duration::from_secs_f64(unclamped_secs)
            };

        jitter::apply(base, self.jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_retry_zero_returns_first() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            factor: 2.0,
            jitter: 0.0,
        };
        assert_eq!(policy.next(0), Duration::from_millis(100));
    }

    #[test]
    fn test_exponential_growth_no_jitter() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            factor: 2.0,
            jitter: 0.0,
        };

        assert_eq!(policy.next(0), Duration::from_millis(100));
        assert_eq!(policy.next(1), Duration::from_millis(200));
        assert_eq!(policy.next(2), Duration::from_millis(400));
        assert_eq!(policy.next(3), Duration::from_millis(800));
        assert_eq!(policy.next(4), Duration::from_millis(1600));
    }

    #[test]
    fn test_constant_factor() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(500),
            max: Duration::from_secs(30),
            factor: 1.0,
            jitter: 0.0,
        };
        for retry in 0..10 {
            assert_eq!(
                policy.next(retry),
                Duration::from_millis(500),
                "retry {} should be constant at 500ms",
                retry
            );
        }
    }

    #[test]
    fn test_clamped_to_max() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(1),
            factor: 2.0,
            jitter: 0.0,
        };
        assert_eq!(policy.next(10), Duration::from_secs(1));
    }

    #[test]
    fn test_first_exceeds_max() {
        let policy = BackoffPolicy {
            first: Duration::from_secs(10),
            max: Duration::from_secs(5),
            factor: 2.0,
            jitter: 0.0,
        };
        assert_eq!(policy.next(0), Duration::from_secs(5));
    }

    #[test]
    fn test_jitter_never_reduces_the_base() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            factor: 2.0,
            jitter: 0.25,
        };

        // Up to retry 8 the base (100ms × 2^8 = 25.6s) stays under the cap.
        for retry in 0..9 {
            let base_ms = 100.0 * 2.0f64.powi(retry as i32);
            let delay = policy.next(retry);
            assert!(
                delay >= Duration::from_millis(base_ms as u64),
                "retry {}: delay {:?} below base {}ms",
                retry,
                delay,
                base_ms
            );
            assert!(
                delay < Duration::from_micros((base_ms * 1250.0) as u64),
                "retry {}: delay {:?} above base {}ms × 1.25",
                retry,
                delay,
                base_ms
            );
        }
    }

    #[test]
    fn test_huge_retry_clamps_to_max() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(60),
            factor: 2.0,
            jitter: 0.0,
        };
        assert_eq!(policy.next(100), Duration::from_secs(60));
    }

    #[test]
    fn test_non_finite_overflow_clamps_to_max() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(10),
            factor: 2.0,
            jitter: 0.0,
        };
        assert_eq!(policy.next(u32::MAX), Duration::from_secs(10));
    }
}
