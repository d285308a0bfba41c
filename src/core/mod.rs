//! Runtime core: retry engine and worker pool.
//!
//! This module contains the embedded implementation of the retrypool runtime.
//! Public API from this module: [`Retrier`], [`Pool`], and their
//! configuration records.
//!
//! Internal modules:
//! - [`retrier`]: drives one operation through bounded retries with backoff;
//! - [`pool`]: owns the worker set, intake, events, and lifecycle;
//! - [`worker`]: per-worker loop with panic isolation;
//! - [`config`]: configuration records and sentinel accessors.

mod config;
mod pool;
mod retrier;
mod worker;

pub use config::{PoolConfig, RetryConfig, DEFAULT_WORKERS};
pub use pool::Pool;
pub use retrier::Retrier;
