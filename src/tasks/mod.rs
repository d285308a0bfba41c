//! # Task abstractions and result handles.
//!
//! This module provides the submission-side types:
//! - [`Task`] - a named fallible operation plus an optional retrier
//! - [`TaskFuture`] - single-consumer handle for a task's eventual result
//! - [`OpFuture`] - boxed future produced by a task operation

mod future;
mod task;

pub use future::TaskFuture;
pub use task::{OpFuture, Task};
