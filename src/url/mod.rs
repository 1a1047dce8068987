//! URL handling module for Site-Mirror
//!
//! This module provides canonical dedup keys, seed URL resolution, host
//! extraction, and the scope rules that decide which discovered URLs are
//! followed or downloaded.

mod canonical;
mod domain;
mod scope;

// Re-export main functions
pub use canonical::{canonicalize, resolve_seed_url, CanonicalKey};
pub use domain::{extract_domain, same_host};
pub use scope::{has_static_asset_extension, should_download, should_follow, STATIC_ASSET_EXTENSIONS};
