//! Crawl coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Restoring prior state (mapping log, error log, frontier snapshot)
//! - Popping URLs from the frontier and fetching them
//! - Content processing, hashing, and dedup
//! - Link classification and asset logging
//! - Periodic checkpointing and the guaranteed snapshot at exit

use crate::config::Config;
use crate::crawler::classifier::{classify_links, ClassifiedLinks};
use crate::crawler::fetcher::{FetchedPage, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::processor::{process_document, ProcessedDocument};
use crate::output::CrawlStats;
use crate::state::PageState;
use crate::storage::{
    AssetRecord, CrawlStore, ErrorRecord, MappingRecord, PageMeta, StorageError,
};
use crate::CrawlError;
use chrono::Utc;
use std::path::Path;
use url::Url;

/// Owns every piece of crawl state for one run: the frontier and its dedup
/// sets, the fetcher, the persistence layer, and the run counters.
/// Constructed once per run and passed nothing ambient.
pub struct Coordinator {
    config: Config,
    frontier: Frontier,
    fetcher: Fetcher,
    store: CrawlStore,
    stats: CrawlStats,
    saved_since_checkpoint: u32,
}

impl Coordinator {
    /// Builds a coordinator, restoring prior state from the base directory
    ///
    /// Previously saved pages (from the mapping log) are marked seen at both
    /// dedup tiers. With `fresh`, any frontier snapshot is discarded and the
    /// crawl restarts from the seed; saved pages stay excluded either way.
    ///
    /// Failure to create the base directory is the only fatal startup error.
    pub fn new(config: Config, fresh: bool) -> Result<Self, CrawlError> {
        let store = CrawlStore::open(Path::new(&config.output.base_dir))?;
        let fetcher = Fetcher::new(&config)?;
        let mut frontier = Frontier::new();

        let mappings = store.load_mappings()?;
        for mapping in &mappings {
            frontier.mark_seen(&mapping.url);
            frontier.record_hash(&mapping.content_hash);
        }
        if !mappings.is_empty() {
            tracing::info!(
                pages = mappings.len(),
                "loaded prior crawl state from mapping log"
            );
        }

        // Seen-on-failure policy: by default a URL that failed stays
        // excluded on later runs; with requeue-failed it becomes eligible
        // again.
        if !config.resume.requeue_failed {
            for error in store.load_errors()? {
                frontier.mark_seen(&error.url);
            }
        }

        if fresh {
            store.clear_frontier()?;
        } else {
            match store.load_frontier() {
                Ok(Some(snapshot)) => {
                    frontier.restore(&snapshot)?;
                    tracing::info!(pending = frontier.len(), "restored frontier snapshot");
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "unreadable frontier snapshot, starting from the seed");
                }
            }
        }

        if frontier.is_empty() {
            frontier.enqueue(&config.crawler.seed_url)?;
        }

        Ok(Self {
            config,
            frontier,
            fetcher,
            store,
            stats: CrawlStats::new(),
            saved_since_checkpoint: 0,
        })
    }

    /// Runs the crawl to completion or to the page limit
    ///
    /// The frontier snapshot is finalized on every exit path: removed after a
    /// clean completion, rewritten otherwise.
    pub async fn run(&mut self) -> Result<(), CrawlError> {
        tracing::info!(
            seed = %self.config.crawler.seed_url,
            domain = %self.config.crawler.domain,
            max_pages = self.config.crawler.max_pages,
            "starting crawl"
        );

        let outcome = self.crawl_loop().await;
        self.finalize();
        self.stats.log_summary();
        outcome
    }

    async fn crawl_loop(&mut self) -> Result<(), CrawlError> {
        loop {
            if self.page_limit_reached() {
                tracing::info!(
                    limit = self.config.crawler.max_pages,
                    pending = self.frontier.len(),
                    "page limit reached"
                );
                break;
            }

            let url = match self.frontier.pop() {
                Ok(url) => url,
                Err(_) => {
                    tracing::info!("frontier is empty, crawl complete");
                    break;
                }
            };

            let state = self.step(&url).await;
            self.stats.record(state);

            if state == PageState::SavedNew {
                self.saved_since_checkpoint += 1;
                if self.saved_since_checkpoint >= self.config.output.checkpoint_interval {
                    self.checkpoint();
                    self.saved_since_checkpoint = 0;
                    tracing::info!(
                        saved = self.stats.saved_new(),
                        pending = self.frontier.len(),
                        seen = self.frontier.seen_count(),
                        "progress"
                    );
                }
            }
        }

        Ok(())
    }

    /// Drives one URL through fetch → process → classify → persist
    ///
    /// Never aborts the crawl: every failure is logged as an error record and
    /// the loop advances.
    async fn step(&mut self, url: &Url) -> PageState {
        tracing::debug!(%url, state = %PageState::Fetching, "processing");

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                self.log_error(url, &e.to_string());
                return PageState::Failed;
            }
        };

        let content_type = page.content_type.clone().unwrap_or_default();
        let document = match process_document(&page.body, &content_type) {
            Ok(document) => document,
            Err(e) => {
                self.log_error(url, &e.to_string());
                return PageState::Failed;
            }
        };

        let links = classify_links(&document.links, url, &self.config.crawler.domain);
        self.stats.links_discovered += links.pages.len() as u64;
        tracing::trace!(
            %url,
            targets = links.pages.len(),
            assets = links.assets.len(),
            state = %PageState::Discovered,
            "links classified"
        );

        for asset in &links.assets {
            let record = AssetRecord {
                url: asset.as_str().to_string(),
                page: url.as_str().to_string(),
                title: document.title.clone(),
            };
            match self.store.append_asset(&record) {
                Ok(()) => self.stats.assets_logged += 1,
                Err(e) => tracing::warn!(asset = %asset, error = %e, "failed to append asset record"),
            }
        }

        // Targets are queued for new and duplicate content alike: duplicate
        // content must not stall graph discovery.
        for target in &links.pages {
            match self.frontier.enqueue(target.as_str()) {
                Ok(true) => {
                    tracing::trace!(target = %target, state = %PageState::Queued, "queued")
                }
                Ok(false) => {}
                Err(e) => tracing::debug!(target = %target, error = %e, "failed to queue link"),
            }
        }

        if !self.frontier.record_hash(&document.content_hash) {
            tracing::debug!(%url, hash = %document.content_hash, "duplicate content, links still followed");
            return PageState::SavedDuplicate;
        }

        match self.persist_page(url, &page, &document, &links) {
            Ok(()) => PageState::SavedNew,
            Err(e) => {
                self.log_error(url, &format!("failed to persist page: {}", e));
                PageState::Failed
            }
        }
    }

    fn persist_page(
        &self,
        url: &Url,
        page: &FetchedPage,
        document: &ProcessedDocument,
        links: &ClassifiedLinks,
    ) -> Result<(), StorageError> {
        let file = CrawlStore::page_file(&document.content_hash);

        let meta = PageMeta {
            url: url.as_str().to_string(),
            file: file.clone(),
            crawl_ts: Utc::now().to_rfc3339(),
            status: page.status,
            headers: page.headers.clone(),
            title: document.title.clone(),
            heading: document.heading.clone(),
            meta_description: document.meta_description.clone(),
            content_hash: document.content_hash.clone(),
            links: links.pages.iter().map(|u| u.as_str().to_string()).collect(),
            assets: links.assets.iter().map(|u| u.as_str().to_string()).collect(),
            text: document.text.clone(),
        };

        self.store.write_page(&meta, &page.body)?;

        self.store.append_mapping(&MappingRecord {
            url: meta.url.clone(),
            file,
            title: meta.title.clone(),
            content_hash: meta.content_hash.clone(),
        })?;

        Ok(())
    }

    fn log_error(&mut self, url: &Url, message: &str) {
        tracing::warn!(%url, error = message, "page failed");

        let record = ErrorRecord {
            url: url.as_str().to_string(),
            error: message.to_string(),
            ts: Utc::now().to_rfc3339(),
        };
        if let Err(e) = self.store.append_error(&record) {
            tracing::warn!(error = %e, "failed to append error record");
        }
    }

    /// The limit counts unique saved pages only; duplicates and failures do
    /// not consume the budget.
    fn page_limit_reached(&self) -> bool {
        self.config.crawler.max_pages > 0 && self.stats.saved_new() >= self.config.crawler.max_pages
    }

    /// Rewrites the frontier snapshot. A write failure is non-fatal; the loop
    /// proceeds without a fresh checkpoint this cycle.
    fn checkpoint(&self) {
        if let Err(e) = self.store.save_frontier(&self.frontier.snapshot()) {
            tracing::warn!(error = %e, "checkpoint write failed");
        }
    }

    /// Snapshot handling at loop exit: a clean completion removes the
    /// snapshot, any other exit rewrites it.
    fn finalize(&self) {
        if self.frontier.is_empty() {
            if let Err(e) = self.store.clear_frontier() {
                tracing::warn!(error = %e, "failed to remove frontier snapshot");
            }
        } else {
            self.checkpoint();
        }
    }

    /// Number of URLs still pending
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Counters for the current run
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `fresh` - Discard any frontier snapshot and restart from the seed
///
/// # Example
///
/// ```no_run
/// use terrier::config::load_config;
/// use terrier::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// run_crawl(config, false).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, fresh: bool) -> Result<(), CrawlError> {
    let mut coordinator = Coordinator::new(config, fresh)?;
    coordinator.run().await
}
