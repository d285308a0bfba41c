//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [accepted] task=fetch-user
//! [started] task=fetch-user worker=2
//! [failed] task=fetch-user worker=2 err="retries exhausted after 5 attempts: connection refused"
//! [panicked] task=fetch-user worker=2 reason="index out of bounds"
//! [succeeded] task=fetch-user worker=2
//! [pool-closing]
//! [pool-drained]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::TaskAccepted => {
                if let Some(task) = &e.task {
                    println!("[accepted] task={task}");
                }
            }
            EventKind::TaskStarted => {
                println!("[started] task={:?} worker={:?}", e.task, e.worker);
            }
            EventKind::TaskSucceeded => {
                println!("[succeeded] task={:?} worker={:?}", e.task, e.worker);
            }
            EventKind::TaskFailed => {
                println!(
                    "[failed] task={:?} worker={:?} err={:?}",
                    e.task, e.worker, e.reason
                );
            }
            EventKind::TaskPanicked => {
                println!(
                    "[panicked] task={:?} worker={:?} reason={:?}",
                    e.task, e.worker, e.reason
                );
            }
            EventKind::PoolClosing => {
                println!("[pool-closing]");
            }
            EventKind::PoolDrained => {
                println!("[pool-drained]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
