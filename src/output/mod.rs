//! Output module for crawl summaries
//!
//! This module handles:
//! - Live statistics shared by the workers
//! - The end-of-run report printed by the command-line tool

pub mod stats;

pub use stats::{CrawlStats, StatsSnapshot};

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Summary of a finished (or cancelled) crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Seed URL the crawl started from
    pub start_url: String,

    /// Root of the local mirror
    pub output_dir: PathBuf,

    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl finished or was cancelled
    pub finished_at: DateTime<Utc>,

    /// Number of canonical keys a worker started processing
    pub visited: usize,

    /// Final counter values
    pub stats: StatsSnapshot,

    /// Whether the crawl was interrupted before the queue drained
    pub cancelled: bool,
}

impl CrawlReport {
    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Prints a crawl report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &CrawlReport) {
    println!("=== Mirror Summary ===\n");

    println!("Overview:");
    println!("  Start URL: {}", report.start_url);
    println!("  Output directory: {}", report.output_dir.display());
    println!(
        "  Started: {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let duration = report.duration();
    println!(
        "  Duration: {}.{:03}s",
        duration.num_seconds(),
        duration.num_milliseconds() % 1000
    );
    if report.cancelled {
        println!("  Status: cancelled");
    } else {
        println!("  Status: completed");
    }
    println!();

    let stats = &report.stats;
    println!("Files:");
    println!("  URLs visited: {}", report.visited);
    println!("  Pages saved: {}", stats.pages_saved);
    println!("  Resources saved: {}", stats.resources_saved);
    println!("  Bytes written: {}", stats.bytes_written);
    println!();

    println!("Skipped:");
    println!("  Failed: {}", stats.failed);
    println!("  Blocked by robots.txt: {}", stats.blocked_by_robots);
    println!("  Beyond max depth: {}", stats.depth_exceeded);
    println!("  Already visited: {}", stats.already_visited);
    println!("  Duplicate references: {}", stats.duplicates_skipped);
    if stats.queue_overflows > 0 {
        println!("  Dropped (queue full): {}", stats.queue_overflows);
    }
}
