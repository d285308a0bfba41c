//! # Event subscribers.
//!
//! Extension point for plugging custom observability into the pool:
//! - [`Subscribe`] - contract for event handlers
//! - [`SubscriberSet`] - non-blocking fan-out over multiple subscribers
//! - [`LogWriter`] - simple stdout subscriber _(feature `logging`)_

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
