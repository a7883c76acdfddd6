//! Reporting output
//!
//! Run counters accumulated by the crawl loop, and statistics derived from
//! the persisted artifacts for the `--stats` mode.

mod stats;

pub use stats::{load_statistics, print_statistics, CrawlStats, LogStatistics};
