//! Storage module for writing the local mirror
//!
//! This module handles:
//! - Mapping URLs to deterministic local paths
//! - Creating parent directories idempotently
//! - Writing downloaded or rewritten bodies

mod paths;

pub use paths::{map_path, INDEX_FILE};

use crate::{StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use url::Url;

/// Destination for downloaded content
///
/// Each canonical URL is processed once, so concurrent workers always write
/// distinct paths. An existing file at the path is overwritten.
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Writes `body` to the path `map_path` computes and returns that path
    async fn save(
        &self,
        url: &Url,
        body: &[u8],
        content_type: &str,
        output_root: &Path,
    ) -> StorageResult<PathBuf>;
}

/// File sink backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

#[async_trait]
impl FileSink for FsSink {
    async fn save(
        &self,
        url: &Url,
        body: &[u8],
        content_type: &str,
        output_root: &Path,
    ) -> StorageResult<PathBuf> {
        let full = map_path(url, content_type, output_root);

        if let Some(dir) = full.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| StorageError::CreateDir {
                    path: dir.display().to_string(),
                    source,
                })?;
        }

        tokio::fs::write(&full, body)
            .await
            .map_err(|source| StorageError::Write {
                path: full.display().to_string(),
                source,
            })?;

        Ok(full)
    }
}
