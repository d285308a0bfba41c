//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by the pool and its workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Pool::submit`, `Pool::close`, worker loops.
//! - **Consumers**: receivers from [`Pool::subscribe`](crate::Pool::subscribe)
//!   and the listener that fans out to a
//!   [`SubscriberSet`](crate::SubscriberSet).
//!
//! Event delivery is fire-and-forget observability; it never affects task
//! control flow.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
