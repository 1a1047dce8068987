//! Configuration module for Site-Mirror
//!
//! Settings come from an optional TOML file layered under command-line flags.
//!
//! # Example
//!
//! ```no_run
//! use site_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlConfig, DEFAULT_MAX_DEPTH, DEFAULT_QUEUE_CAPACITY, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
    DEFAULT_WORKERS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_duration};
pub use validation::{validate, MAX_WORKERS};
