//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Task`: one unit of crawl work (URL, depth, expected kind)
//! - `Resource`: a non-page asset discovered while parsing a page
//! - `DedupSet`: the shared visited/enqueued bookkeeping used by all workers

mod dedup;
mod task;

// Re-export main types
pub use dedup::{DedupSet, Membership};
pub use task::{Resource, ResourceKind, Task, TaskOutcome};
