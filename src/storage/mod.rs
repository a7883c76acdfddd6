//! Storage module for persisting crawl artifacts
//!
//! This module owns every on-disk artifact the crawler writes:
//! - Append-only JSONL logs for the URL→file mapping, errors, and assets
//! - Per-page metadata and raw HTML, addressed by content hash
//! - The frontier snapshot used for checkpoint/resume
//!
//! Files are opened, appended, and closed per write, so external read-only
//! consumers can inspect them while the crawl is running.

mod checkpoint;
mod journal;
mod store;

pub use store::{
    CrawlStore, ASSET_FILE, ERROR_FILE, FRONTIER_FILE, MAPPING_FILE, PAGES_SUBDIR,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One line of the mapping log: a saved page and where its body lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingRecord {
    pub url: String,
    pub file: String,
    pub title: String,
    pub content_hash: String,
}

/// One line of the error log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub url: String,
    pub error: String,
    pub ts: String,
}

/// One line of the asset log: an asset URL and the page it was found on.
/// The same asset may appear once per source page; provenance differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    pub url: String,
    pub page: String,
    pub title: String,
}

/// Response headers captured for the per-page metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderSnapshot {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<String>,
}

/// Per-page metadata, written once per unique content hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub url: String,
    pub file: String,
    pub crawl_ts: String,
    pub status: u16,
    pub headers: HeaderSnapshot,
    pub title: String,
    pub heading: Option<String>,
    pub meta_description: Option<String>,
    pub content_hash: String,
    pub links: Vec<String>,
    pub assets: Vec<String>,
    pub text: String,
}
