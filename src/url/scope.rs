//! Crawl scope rules
//!
//! Pages are followed within the seed host. Static assets are also followed
//! across hosts, but resources are only ever downloaded from the seed host.

use crate::url::same_host;
use url::Url;

/// Path suffixes treated as static assets by [`should_follow`]
pub const STATIC_ASSET_EXTENSIONS: &[&str] = &[
    ".css", ".js", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp",
];

/// Case-insensitive check for a static asset suffix on a URL path
pub fn has_static_asset_extension(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    STATIC_ASSET_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(ext))
}

/// Decides whether a discovered link is followed
///
/// True when the scheme is empty, `http` or `https`, and the URL is either on
/// the base host or its path ends in a static asset extension.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::url::should_follow;
///
/// let page = Url::parse("https://example.com/path").unwrap();
/// let external = Url::parse("https://other.com/path").unwrap();
/// let asset = Url::parse("https://other.com/a.css").unwrap();
///
/// assert!(should_follow(&page, "example.com"));
/// assert!(!should_follow(&external, "example.com"));
/// assert!(should_follow(&asset, "example.com"));
/// ```
pub fn should_follow(url: &Url, base_host: &str) -> bool {
    let scheme = url.scheme();
    if !scheme.is_empty() && scheme != "http" && scheme != "https" {
        return false;
    }

    same_host(url, base_host) || has_static_asset_extension(url.path())
}

/// Decides whether a discovered resource is downloaded
///
/// Resources are never fetched cross-host, even when they look like static
/// assets.
pub fn should_download(url: &Url, base_host: &str) -> bool {
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return false;
    }

    same_host(url, base_host)
}
