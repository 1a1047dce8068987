//! Crawl task definitions
//!
//! Tasks are created by the coordinator (the seed) or from extracted links and
//! resources, consumed once by a worker, and never mutated.

use std::fmt;
use url::Url;

/// Expected content kind of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Html,
    Css,
    Js,
    Image,
    Other,
}

impl ResourceKind {
    /// Classifies a URL by the extension of its path
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use site_mirror::ResourceKind;
    ///
    /// let url = Url::parse("https://example.com/static/site.CSS").unwrap();
    /// assert_eq!(ResourceKind::from_url(&url), ResourceKind::Css);
    /// ```
    pub fn from_url(url: &Url) -> Self {
        let path = url.path().to_ascii_lowercase();
        let file = path.rsplit('/').next().unwrap_or("");
        let ext = match file.rfind('.') {
            Some(idx) => &file[idx..],
            None => "",
        };

        match ext {
            ".css" => Self::Css,
            ".js" => Self::Js,
            ".jpg" | ".jpeg" | ".png" | ".gif" | ".svg" | ".webp" => Self::Image,
            ".html" | ".htm" => Self::Html,
            _ => Self::Other,
        }
    }

    /// Returns true for HTML pages
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Html)
    }

    /// Returns the string representation used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::Js => "js",
            Self::Image => "image",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resource referenced by a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub url: Url,
    pub kind: ResourceKind,
}

impl Resource {
    /// Creates a resource, classifying it by extension
    pub fn new(url: Url) -> Self {
        let kind = ResourceKind::from_url(&url);
        Self { url, kind }
    }
}

/// One unit of crawl work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// The URL to fetch
    pub url: Url,

    /// Link distance from the seed (0 = seed)
    pub depth: u32,

    /// What the task is expected to contain
    pub kind: ResourceKind,
}

impl Task {
    /// Creates the depth-0 page task for the seed URL
    pub fn seed(url: Url) -> Self {
        Self {
            url,
            depth: 0,
            kind: ResourceKind::Html,
        }
    }

    /// Creates a page task for a followed link, one level deeper than `self`
    pub fn link(&self, url: Url) -> Self {
        Self {
            url,
            depth: self.depth + 1,
            kind: ResourceKind::Html,
        }
    }

    /// Creates a task for a page resource at the same depth as `self`
    ///
    /// Resources inherit the depth of the page that references them.
    pub fn resource(&self, resource: Resource) -> Self {
        Self {
            url: resource.url,
            depth: self.depth,
            kind: resource.kind,
        }
    }
}

/// Terminal state of a dequeued task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskOutcome {
    /// Downloaded and written to the mirror
    Saved,

    /// Disallowed by robots.txt for the configured user agent
    BlockedByRobots,

    /// Deeper than the configured maximum depth
    DepthExceeded,

    /// Another worker already started this key
    AlreadyVisited,

    /// Download, parse or write failed; logged and abandoned
    Failed,
}
