//! Crawler module for mirroring a site
//!
//! This module contains the core crawling logic, including:
//! - The download capability and its HTTP implementation
//! - HTML and CSS reference extraction and rewriting
//! - The worker pool that coordinates a run

mod coordinator;
mod css;
mod fetcher;
mod parser;
mod tracker;

pub use coordinator::Scraper;
pub use css::{extract_css_urls, rewrite_css_urls, rewrite_srcset, srcset_urls};
pub use fetcher::{bare_content_type, build_http_client, Download, Downloader, HttpDownloader};
pub use parser::{resolve_reference, DocumentParser, ExtractedRefs, HtmlParser};
pub use tracker::OutstandingWork;
