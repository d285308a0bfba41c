//! # Additive jitter for retry delays.
//!
//! Adds randomness to backoff delays to prevent thundering herd effects when
//! many callers retry simultaneously. The perturbation is strictly additive:
//! for a jitter fraction `f`, the result lies in `[delay, delay × (1 + f))`,
//! never below the pure-backoff value.
//!
//! Randomness comes from the calling thread's generator (`rand::rng()`), so a
//! single policy value can be evaluated from any number of tasks concurrently
//! without shared RNG state.

use std::time::Duration;

use rand::Rng;

/// Applies additive jitter to `delay`.
///
/// `factor` is the fraction of the delay used as the noise ceiling; values
/// `<= 0` (and a zero delay) return the input unchanged.
pub(crate) fn apply(delay: Duration, factor: f64) -> Duration {
    if factor <= 0.0 || delay.is_zero() {
        return delay;
    }
    let mut rng = rand::rng();
    let noise: f64 = rng.random_range(0.0..factor);
    delay.mul_f64(1.0 + noise)
}
