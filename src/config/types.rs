use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;

/// Default maximum link depth from the seed
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Default number of concurrent workers
pub const DEFAULT_WORKERS: usize = 5;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = "Wget/1.0";

/// Default bound of the task queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Crawl configuration
///
/// Every field may be omitted from a TOML file; missing fields take the
/// defaults above. The start URL is usually supplied on the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Seed URL; a missing scheme is completed with `https://`
    pub start_url: String,

    /// Maximum link depth to follow from the seed
    pub max_depth: u32,

    /// Mirror root; defaults to the seed host under the current directory
    pub output_dir: Option<PathBuf>,

    /// Number of concurrent workers
    pub workers: usize,

    /// Per-request timeout
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Skip robots.txt entirely
    pub ignore_robots: bool,

    /// Bound of the task queue; tasks beyond it are dropped
    pub queue_capacity: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: String::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            output_dir: None,
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ignore_robots: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl CrawlConfig {
    /// Creates a configuration with defaults for the given seed
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            ..Self::default()
        }
    }
}

/// Accepts either a duration string (`"10s"`, `"500ms"`) or bare seconds
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Seconds(u64),
        Text(String),
    }

    match RawDuration::deserialize(deserializer)? {
        RawDuration::Seconds(secs) => Ok(Duration::from_secs(secs)),
        RawDuration::Text(text) => {
            super::parse_duration(&text).map_err(serde::de::Error::custom)
        }
    }
}
