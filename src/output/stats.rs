//! Live crawl statistics
//!
//! Workers update these counters concurrently; the coordinator takes a
//! snapshot when the crawl ends.

use crate::state::{ResourceKind, TaskOutcome};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by all workers
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_saved: AtomicU64,
    resources_saved: AtomicU64,
    bytes_written: AtomicU64,
    failed: AtomicU64,
    blocked_by_robots: AtomicU64,
    depth_exceeded: AtomicU64,
    already_visited: AtomicU64,
    duplicates_skipped: AtomicU64,
    queue_overflows: AtomicU64,
}

/// Point-in-time copy of [`CrawlStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// HTML pages rewritten and saved
    pub pages_saved: u64,

    /// Non-HTML content saved unchanged
    pub resources_saved: u64,

    /// Total bytes written to the mirror
    pub bytes_written: u64,

    /// Tasks abandoned after a download, parse or write error
    pub failed: u64,

    /// Tasks dropped by robots.txt
    pub blocked_by_robots: u64,

    /// Tasks dropped for exceeding the maximum depth
    pub depth_exceeded: u64,

    /// Dequeued tasks whose key another worker had already started
    pub already_visited: u64,

    /// Enqueue attempts skipped because the key was already enqueued or visited
    pub duplicates_skipped: u64,

    /// Tasks dropped because the queue was full
    pub queue_overflows: u64,
}

impl StatsSnapshot {
    /// Total files written
    pub fn files_saved(&self) -> u64 {
        self.pages_saved + self.resources_saved
    }
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the terminal outcome of a dequeued task
    pub fn record_outcome(&self, outcome: TaskOutcome) {
        let counter = match outcome {
            // counted by record_saved with its size
            TaskOutcome::Saved => return,
            TaskOutcome::Failed => &self.failed,
            TaskOutcome::BlockedByRobots => &self.blocked_by_robots,
            TaskOutcome::DepthExceeded => &self.depth_exceeded,
            TaskOutcome::AlreadyVisited => &self.already_visited,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a file written to the mirror
    ///
    /// `rewritten` is true for HTML pages that went through reference rewriting.
    pub fn record_saved(&self, kind: ResourceKind, rewritten: bool, bytes: usize) {
        if rewritten && kind.is_page() {
            self.pages_saved.fetch_add(1, Ordering::Relaxed);
        } else {
            self.resources_saved.fetch_add(1, Ordering::Relaxed);
        }
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_overflow(&self) {
        self.queue_overflows.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pages_saved: self.pages_saved.load(Ordering::Relaxed),
            resources_saved: self.resources_saved.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            blocked_by_robots: self.blocked_by_robots.load(Ordering::Relaxed),
            depth_exceeded: self.depth_exceeded.load(Ordering::Relaxed),
            already_visited: self.already_visited.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            queue_overflows: self.queue_overflows.load(Ordering::Relaxed),
        }
    }
}
