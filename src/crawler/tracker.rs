//! Outstanding-work counter used for crawl termination
//!
//! Every enqueued task registers one unit and retires it exactly once after a
//! worker finishes with it, whatever the outcome. The crawl is complete when
//! the count returns to zero.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct OutstandingWork {
    count: AtomicUsize,
    idle: Notify,
}

impl OutstandingWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one unit of outstanding work
    pub fn register(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Retires one unit, waking the waiter when the count reaches zero
    pub fn retire(&self) {
        let previous = self.count.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "retired more work than was registered");
        if previous == 1 {
            self.idle.notify_one();
        }
    }

    /// Units currently outstanding
    pub fn pending(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Resolves once no work is outstanding
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}
