//! Local path mapping
//!
//! `map_path` is the single source of truth for where a URL lives in the
//! mirror. The writer and the HTML rewriter both call it, so they agree on
//! locations without talking to each other.

use std::path::{Path, PathBuf};
use url::Url;

/// File name used for directory-style URLs
pub const INDEX_FILE: &str = "index.html";

/// Maps a URL and its content type to a file under `output_root`
///
/// # Rules
///
/// 1. Empty or root path → `index.html`
/// 2. Trailing slash → append `index.html`
/// 3. No extension → append one inferred from the content type
///    (`text/html` → `.html`, `text/css` → `.css`,
///    `application/javascript` / `text/javascript` → `.js`)
/// 4. Dot segments are resolved inside the root; the result never escapes it
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use url::Url;
/// use site_mirror::storage::map_path;
///
/// let url = Url::parse("https://example.com/foo/").unwrap();
/// assert_eq!(map_path(&url, "text/html", Path::new("out")), Path::new("out/foo/index.html"));
/// ```
pub fn map_path(url: &Url, content_type: &str, output_root: &Path) -> PathBuf {
    let mut path = url.path().to_string();

    if path.is_empty() || path == "/" {
        path = format!("/{}", INDEX_FILE);
    }

    if path.ends_with('/') {
        path.push_str(INDEX_FILE);
    }

    if !has_extension(&path) {
        if let Some(ext) = extension_for(content_type) {
            path.push_str(ext);
        }
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        segments.push(INDEX_FILE);
    }

    let mut full = output_root.to_path_buf();
    for segment in segments {
        full.push(segment);
    }
    full
}

/// Extension appended to extensionless paths for a given content type
fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "text/html" => Some(".html"),
        "text/css" => Some(".css"),
        "application/javascript" | "text/javascript" => Some(".js"),
        _ => None,
    }
}

/// True if the last path segment contains a dot
///
/// Dotfiles (`.htaccess`) and a trailing dot (`file.`) count as having one.
fn has_extension(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or("");
    file.contains('.')
}
