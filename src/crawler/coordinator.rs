//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the worker pool that drives a mirror run:
//! - Resolving the seed and preparing the output directory
//! - Loading the robots.txt policy for the seed host
//! - Feeding a bounded task queue shared by a fixed number of workers
//! - Running extract, enqueue, rewrite and save for every task
//! - Detecting completion and honoring cancellation

use crate::config::{validate, CrawlConfig};
use crate::crawler::parser::{DocumentParser, HtmlParser};
use crate::crawler::tracker::OutstandingWork;
use crate::crawler::{Downloader, HttpDownloader};
use crate::output::{CrawlReport, CrawlStats};
use crate::robots::{fetch_robots, is_allowed, ParsedRobots};
use crate::state::{DedupSet, Task, TaskOutcome};
use crate::storage::{FileSink, FsSink};
use crate::url::{canonicalize, extract_domain, resolve_seed_url, should_download, should_follow};
use crate::{ConfigError, MirrorError};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Mirrors a site from a seed URL
///
/// A `Scraper` owns its dedup set, so every instance starts from an empty
/// crawl state. Construct a fresh one per run.
pub struct Scraper {
    config: CrawlConfig,
    seed: Url,
    base_host: String,
    scope_prefix: String,
    output_dir: PathBuf,
    downloader: Arc<dyn Downloader>,
    parser: Arc<dyn DocumentParser>,
    sink: Arc<dyn FileSink>,
    dedup: Arc<DedupSet>,
}

impl Scraper {
    /// Creates a scraper that downloads over HTTP and writes to disk
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - Configuration was valid
    /// * `Err(MirrorError)` - Invalid configuration or HTTP client setup failure
    pub fn new(config: CrawlConfig) -> Result<Self, MirrorError> {
        let downloader = HttpDownloader::new(config.timeout, &config.user_agent)?;
        Self::with_components(
            config,
            Arc::new(downloader),
            Arc::new(HtmlParser::new()),
            Arc::new(FsSink),
        )
    }

    /// Creates a scraper with injected download, parse and save capabilities
    pub fn with_components(
        config: CrawlConfig,
        downloader: Arc<dyn Downloader>,
        parser: Arc<dyn DocumentParser>,
        sink: Arc<dyn FileSink>,
    ) -> Result<Self, MirrorError> {
        validate(&config)?;

        let seed = resolve_seed_url(&config.start_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.start_url, e)))?;
        let base_host = extract_domain(&seed)
            .ok_or_else(|| ConfigError::InvalidUrl(format!("{} has no host", seed)))?;
        let scope_prefix = seed.path().to_string();

        let output_dir = match &config.output_dir {
            Some(dir) => absolute(dir)?,
            None => absolute(Path::new(&base_host))?,
        };

        Ok(Self {
            config,
            seed,
            base_host,
            scope_prefix,
            output_dir,
            downloader,
            parser,
            sink,
            dedup: Arc::new(DedupSet::new()),
        })
    }

    /// The resolved seed URL
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// Host that bounds the crawl scope
    pub fn base_host(&self) -> &str {
        &self.base_host
    }

    /// Path of the seed URL
    pub fn scope_prefix(&self) -> &str {
        &self.scope_prefix
    }

    /// Absolute root of the local mirror
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Visited and enqueued bookkeeping for this crawl
    pub fn dedup(&self) -> &DedupSet {
        &self.dedup
    }

    /// Runs the crawl to completion or until `cancel` fires
    ///
    /// Per-task failures are logged and counted in the report; only setup
    /// failures (such as an unwritable output directory) return an error.
    pub async fn run(&self, cancel: CancellationToken) -> Result<CrawlReport, MirrorError> {
        let started_at = Utc::now();

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| ConfigError::OutputDir {
                path: self.output_dir.display().to_string(),
                source,
            })?;

        tracing::info!(
            "Mirroring {} (host {}, prefix {}) into {}",
            self.seed,
            self.base_host,
            self.scope_prefix,
            self.output_dir.display()
        );

        // Stops the workers on completion or external cancellation
        let shutdown = cancel.child_token();

        let robots = if self.config.ignore_robots {
            tracing::info!("Ignoring robots.txt");
            None
        } else {
            fetch_robots(self.downloader.as_ref(), &self.seed, &shutdown).await
        };

        let (sender, receiver) = mpsc::channel(self.config.queue_capacity);
        let crawl = Arc::new(Crawl {
            user_agent: self.config.user_agent.clone(),
            max_depth: self.config.max_depth,
            base_host: self.base_host.clone(),
            output_dir: self.output_dir.clone(),
            robots,
            downloader: Arc::clone(&self.downloader),
            parser: Arc::clone(&self.parser),
            sink: Arc::clone(&self.sink),
            dedup: Arc::clone(&self.dedup),
            stats: CrawlStats::new(),
            work: OutstandingWork::new(),
            sender,
            shutdown: shutdown.clone(),
        });

        let queue = Arc::new(Mutex::new(receiver));
        let mut workers = Vec::with_capacity(self.config.workers);
        for id in 0..self.config.workers {
            let crawl = Arc::clone(&crawl);
            let queue = Arc::clone(&queue);
            workers.push(tokio::spawn(async move { crawl.worker(id, queue).await }));
        }

        crawl.add_task(Task::seed(self.seed.clone()));

        let cancelled = tokio::select! {
            _ = crawl.work.wait_idle() => false,
            _ = cancel.cancelled() => true,
        };

        if cancelled {
            tracing::warn!(
                "Crawl cancelled with {} tasks outstanding",
                crawl.work.pending()
            );
        }

        shutdown.cancel();
        for worker in workers {
            if let Err(e) = worker.await {
                tracing::error!("Worker terminated abnormally: {}", e);
            }
        }

        let report = CrawlReport {
            start_url: self.seed.to_string(),
            output_dir: self.output_dir.clone(),
            started_at,
            finished_at: Utc::now(),
            visited: self.dedup.visited_len(),
            stats: crawl.stats.snapshot(),
            cancelled,
        };

        tracing::info!(
            "Crawl finished: {} URLs visited, {} files saved, {} failed in {}ms",
            report.visited,
            report.stats.files_saved(),
            report.stats.failed,
            report.duration().num_milliseconds()
        );

        Ok(report)
    }
}

/// Shared state for one run, held by every worker
struct Crawl {
    user_agent: String,
    max_depth: u32,
    base_host: String,
    output_dir: PathBuf,
    robots: Option<ParsedRobots>,
    downloader: Arc<dyn Downloader>,
    parser: Arc<dyn DocumentParser>,
    sink: Arc<dyn FileSink>,
    dedup: Arc<DedupSet>,
    stats: CrawlStats,
    work: OutstandingWork,
    sender: mpsc::Sender<Task>,
    shutdown: CancellationToken,
}

impl Crawl {
    /// Pulls tasks until shutdown
    async fn worker(&self, id: usize, queue: Arc<Mutex<mpsc::Receiver<Task>>>) {
        tracing::trace!("Worker {} started", id);

        loop {
            let next = {
                let mut receiver = queue.lock().await;
                tokio::select! {
                    biased;
                    _ = self.shutdown.cancelled() => None,
                    task = receiver.recv() => task,
                }
            };

            let Some(task) = next else {
                break;
            };

            let outcome = self.process(&task).await;
            self.stats.record_outcome(outcome);
            self.work.retire();
        }

        tracing::trace!("Worker {} stopped", id);
    }

    /// Enqueues a task unless its key was already seen
    ///
    /// Never blocks. When the queue is full the task is dropped and its
    /// bookkeeping rolled back.
    ///
    /// # Returns
    ///
    /// * `true` - The task was queued
    /// * `false` - It was a duplicate or the queue could not take it
    fn add_task(&self, task: Task) -> bool {
        let key = canonicalize(&task.url);
        if !self.dedup.add_enqueued(key.clone()) {
            self.stats.record_duplicate();
            return false;
        }

        self.work.register();
        match self.sender.try_send(task) {
            Ok(()) => true,
            Err(TrySendError::Full(task)) => {
                tracing::warn!("Queue full, dropping {}", task.url);
                self.dedup.remove_enqueued(&key);
                self.work.retire();
                self.stats.record_overflow();
                false
            }
            Err(TrySendError::Closed(task)) => {
                tracing::debug!("Queue closed, dropping {}", task.url);
                self.dedup.remove_enqueued(&key);
                self.work.retire();
                false
            }
        }
    }

    /// Applies the policy checks, then downloads and saves the task
    async fn process(&self, task: &Task) -> TaskOutcome {
        let key = canonicalize(&task.url);

        if let Some(robots) = &self.robots {
            if !is_allowed(robots, task.url.as_str(), &self.user_agent) {
                tracing::info!("Blocked by robots.txt: {}", task.url);
                self.dedup.remove_enqueued(&key);
                return TaskOutcome::BlockedByRobots;
            }
        }

        if task.depth > self.max_depth {
            tracing::debug!(
                "Skipping {}: depth {} exceeds {}",
                task.url,
                task.depth,
                self.max_depth
            );
            self.dedup.remove_enqueued(&key);
            return TaskOutcome::DepthExceeded;
        }

        if !self.dedup.add_visited(key) {
            tracing::trace!("Already visited {}", task.url);
            return TaskOutcome::AlreadyVisited;
        }

        match self.mirror(task).await {
            Ok(path) => {
                tracing::debug!("Saved {} -> {}", task.url, path.display());
                TaskOutcome::Saved
            }
            Err(e) => {
                tracing::warn!("Failed {}: {}", task.url, e);
                TaskOutcome::Failed
            }
        }
    }

    /// Downloads one task, follows its references and writes it to the mirror
    async fn mirror(&self, task: &Task) -> Result<PathBuf, MirrorError> {
        tracing::info!("Downloading {} {} (depth {})", task.kind, task.url, task.depth);

        let download = self.downloader.download(&task.url, &self.shutdown).await?;

        if task.kind.is_page() && download.content_type == "text/html" {
            let refs = self
                .parser
                .extract_links_and_resources(&download.body, &task.url)?;

            for link in refs.links {
                if should_follow(&link, &self.base_host) {
                    self.add_task(task.link(link));
                }
            }
            for resource in refs.resources {
                if should_download(&resource.url, &self.base_host) {
                    self.add_task(task.resource(resource));
                }
            }

            let rewritten = self.parser.rewrite_to_local(
                &download.body,
                &task.url,
                &download.content_type,
                &self.output_dir,
            );
            let path = self
                .sink
                .save(&task.url, &rewritten, &download.content_type, &self.output_dir)
                .await?;
            self.stats.record_saved(task.kind, true, rewritten.len());
            Ok(path)
        } else {
            let path = self
                .sink
                .save(
                    &task.url,
                    &download.body,
                    &download.content_type,
                    &self.output_dir,
                )
                .await?;
            self.stats.record_saved(task.kind, false, download.body.len());
            Ok(path)
        }
    }
}

/// Anchors a relative path at the current directory
fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| ConfigError::OutputDir {
        path: path.display().to_string(),
        source,
    })?;
    Ok(cwd.join(path))
}
