//! Robots.txt handling module
//!
//! The seed host's robots.txt is fetched once before workers start and is
//! read-only for the rest of the crawl. Any failure to fetch or decode it
//! means crawling proceeds unrestricted.

mod parser;

pub use parser::{product_token, ParsedRobots};

use crate::crawler::Downloader;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Fetches and parses robots.txt for the seed's host
///
/// # Returns
///
/// * `Some(ParsedRobots)` - robots.txt was downloaded and decoded
/// * `None` - it could not be fetched; robots enforcement is skipped
pub async fn fetch_robots(
    downloader: &dyn Downloader,
    seed: &Url,
    cancel: &CancellationToken,
) -> Option<ParsedRobots> {
    let mut robots_url = seed.clone();
    robots_url.set_path("/robots.txt");
    robots_url.set_query(None);
    robots_url.set_fragment(None);

    tracing::debug!("Fetching {}", robots_url);

    let download = match downloader.download(&robots_url, cancel).await {
        Ok(d) => d,
        Err(e) => {
            tracing::info!("No robots.txt applied: {}", e);
            return None;
        }
    };

    if download.content_type.is_empty() {
        tracing::info!("No robots.txt applied: response has no content type");
        return None;
    }

    match String::from_utf8(download.body) {
        Ok(content) => Some(ParsedRobots::from_content(&content)),
        Err(_) => {
            tracing::info!("No robots.txt applied: body is not valid UTF-8");
            None
        }
    }
}

/// Checks if a URL is allowed by robots.txt
pub fn is_allowed(robots: &ParsedRobots, url: &str, user_agent: &str) -> bool {
    robots.is_allowed(url, user_agent)
}
