//! Crawl statistics
//!
//! [`CrawlStats`] counts outcomes for the run in progress; [`load_statistics`]
//! reads the base directory the way the external monitor does, from the
//! persisted artifacts alone.

use crate::state::PageState;
use crate::storage::{CrawlStore, StorageResult};
use std::collections::HashMap;
use std::time::Instant;

/// Counters accumulated over one crawl run
#[derive(Debug)]
pub struct CrawlStats {
    outcomes: HashMap<PageState, u64>,
    pub links_discovered: u64,
    pub assets_logged: u64,
    started: Instant,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
            links_discovered: 0,
            assets_logged: 0,
            started: Instant::now(),
        }
    }

    /// Tallies the terminal state of one processed URL
    pub fn record(&mut self, state: PageState) {
        *self.outcomes.entry(state).or_insert(0) += 1;
    }

    pub fn count(&self, state: PageState) -> u64 {
        self.outcomes.get(&state).copied().unwrap_or(0)
    }

    /// Unique pages saved; this is what the page limit counts
    pub fn saved_new(&self) -> u64 {
        self.count(PageState::SavedNew)
    }

    /// Total URLs that reached a terminal state
    pub fn processed(&self) -> u64 {
        self.outcomes.values().sum()
    }

    /// Logs the end-of-run summary
    pub fn log_summary(&self) {
        let elapsed = self.started.elapsed();
        let rate = if elapsed.as_secs_f64() > 0.0 {
            self.processed() as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        tracing::info!(
            saved = self.saved_new(),
            duplicates = self.count(PageState::SavedDuplicate),
            failed = self.count(PageState::Failed),
            links = self.links_discovered,
            assets = self.assets_logged,
            elapsed_secs = elapsed.as_secs(),
            pages_per_sec = %format!("{:.2}", rate),
            "crawl finished"
        );
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics computed from the persisted artifacts of past runs
#[derive(Debug, Clone)]
pub struct LogStatistics {
    pub pages_saved: usize,
    pub pages_on_disk: usize,
    pub errors: usize,
    pub assets: usize,
    pub frontier_pending: usize,
}

/// Loads statistics from a crawl's base directory
pub fn load_statistics(store: &CrawlStore) -> StorageResult<LogStatistics> {
    let pages_saved = store.load_mappings()?.len();
    let errors = store.load_errors()?.len();
    let assets = store.load_assets()?.len();
    let frontier_pending = store
        .load_frontier()?
        .map(|urls| urls.len())
        .unwrap_or(0);
    let pages_on_disk = store.page_count()?;

    Ok(LogStatistics {
        pages_saved,
        pages_on_disk,
        errors,
        assets,
        frontier_pending,
    })
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &LogStatistics) {
    println!("=== Crawl Statistics ===\n");
    println!("Pages saved (mapping log): {}", stats.pages_saved);
    println!("Page files on disk:        {}", stats.pages_on_disk);
    println!("Errors logged:             {}", stats.errors);
    println!("Asset links logged:        {}", stats.assets);
    println!("Frontier pending:          {}", stats.frontier_pending);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{AssetRecord, ErrorRecord, MappingRecord};
    use tempfile::tempdir;

    #[test]
    fn test_record_and_count() {
        let mut stats = CrawlStats::new();
        stats.record(PageState::SavedNew);
        stats.record(PageState::SavedNew);
        stats.record(PageState::SavedDuplicate);
        stats.record(PageState::Failed);

        assert_eq!(stats.saved_new(), 2);
        assert_eq!(stats.count(PageState::SavedDuplicate), 1);
        assert_eq!(stats.count(PageState::Failed), 1);
        assert_eq!(stats.processed(), 4);
    }

    #[test]
    fn test_empty_stats() {
        let stats = CrawlStats::new();
        assert_eq!(stats.saved_new(), 0);
        assert_eq!(stats.processed(), 0);
    }

    #[test]
    fn test_load_statistics_from_store() {
        let dir = tempdir().unwrap();
        let store = CrawlStore::open(dir.path()).unwrap();

        store
            .append_mapping(&MappingRecord {
                url: "https://example.edu/a".to_string(),
                file: "pages/abc.html".to_string(),
                title: "A".to_string(),
                content_hash: "abc".to_string(),
            })
            .unwrap();
        store
            .append_error(&ErrorRecord {
                url: "https://example.edu/broken".to_string(),
                error: "HTTP status 404".to_string(),
                ts: "2026-01-01T00:00:00Z".to_string(),
            })
            .unwrap();
        store
            .append_asset(&AssetRecord {
                url: "https://example.edu/logo.png".to_string(),
                page: "https://example.edu/a".to_string(),
                title: "A".to_string(),
            })
            .unwrap();
        store
            .save_frontier(&[
                "https://example.edu/b".to_string(),
                "https://example.edu/c".to_string(),
            ])
            .unwrap();

        let stats = load_statistics(&store).unwrap();
        assert_eq!(stats.pages_saved, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.assets, 1);
        assert_eq!(stats.frontier_pending, 2);
        assert_eq!(stats.pages_on_disk, 0);
    }
}
