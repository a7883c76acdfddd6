//! On-disk layout of a crawl's base directory

use super::checkpoint;
use super::journal;
use super::{AssetRecord, ErrorRecord, MappingRecord, PageMeta, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Subdirectory holding per-page metadata and HTML bodies
pub const PAGES_SUBDIR: &str = "pages";
/// URL→file mapping log
pub const MAPPING_FILE: &str = "mapping.jsonl";
/// Error log
pub const ERROR_FILE: &str = "errors.jsonl";
/// Asset link log
pub const ASSET_FILE: &str = "assets.jsonl";
/// Frontier snapshot
pub const FRONTIER_FILE: &str = "frontier.json";

/// Owns the directory layout under the base directory and is the only writer
/// of on-disk artifacts
#[derive(Debug, Clone)]
pub struct CrawlStore {
    base_dir: PathBuf,
    pages_dir: PathBuf,
}

impl CrawlStore {
    /// Creates the directory layout and empty log files
    ///
    /// This is the only storage failure that is fatal to a crawl; it is
    /// surfaced before any fetching starts.
    pub fn open(base_dir: &Path) -> StorageResult<Self> {
        let pages_dir = base_dir.join(PAGES_SUBDIR);
        fs::create_dir_all(&pages_dir)?;

        let store = Self {
            base_dir: base_dir.to_path_buf(),
            pages_dir,
        };

        for file in [MAPPING_FILE, ERROR_FILE, ASSET_FILE] {
            let path = store.base_dir.join(file);
            if !path.exists() {
                fs::File::create(&path)?;
            }
        }

        Ok(store)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Relative path of a page body, addressed by its content hash
    pub fn page_file(content_hash: &str) -> String {
        format!("{}/{}.html", PAGES_SUBDIR, content_hash)
    }

    fn mapping_path(&self) -> PathBuf {
        self.base_dir.join(MAPPING_FILE)
    }

    fn error_path(&self) -> PathBuf {
        self.base_dir.join(ERROR_FILE)
    }

    fn asset_path(&self) -> PathBuf {
        self.base_dir.join(ASSET_FILE)
    }

    fn frontier_path(&self) -> PathBuf {
        self.base_dir.join(FRONTIER_FILE)
    }

    pub fn append_mapping(&self, record: &MappingRecord) -> StorageResult<()> {
        journal::append_record(&self.mapping_path(), record)
    }

    pub fn append_error(&self, record: &ErrorRecord) -> StorageResult<()> {
        journal::append_record(&self.error_path(), record)
    }

    pub fn append_asset(&self, record: &AssetRecord) -> StorageResult<()> {
        journal::append_record(&self.asset_path(), record)
    }

    pub fn load_mappings(&self) -> StorageResult<Vec<MappingRecord>> {
        journal::read_records(&self.mapping_path())
    }

    pub fn load_errors(&self) -> StorageResult<Vec<ErrorRecord>> {
        journal::read_records(&self.error_path())
    }

    pub fn load_assets(&self) -> StorageResult<Vec<AssetRecord>> {
        journal::read_records(&self.asset_path())
    }

    /// Writes a page's raw HTML and its metadata file, both keyed by content
    /// hash. `meta.file` is the body's path relative to the base directory.
    pub fn write_page(&self, meta: &PageMeta, raw_html: &str) -> StorageResult<()> {
        fs::write(self.base_dir.join(&meta.file), raw_html)?;

        let json_path = self.pages_dir.join(format!("{}.json", meta.content_hash));
        let encoded = serde_json::to_vec_pretty(meta)?;
        fs::write(json_path, encoded)?;

        Ok(())
    }

    pub fn save_frontier(&self, urls: &[String]) -> StorageResult<()> {
        checkpoint::save_snapshot(&self.frontier_path(), urls)
    }

    pub fn load_frontier(&self) -> StorageResult<Option<Vec<String>>> {
        checkpoint::load_snapshot(&self.frontier_path())
    }

    pub fn clear_frontier(&self) -> StorageResult<()> {
        checkpoint::remove_snapshot(&self.frontier_path())
    }

    /// Number of page metadata files on disk
    pub fn page_count(&self) -> StorageResult<usize> {
        let mut count = 0;
        for entry in fs::read_dir(&self.pages_dir)? {
            let entry = entry?;
            if entry.path().extension().map_or(false, |ext| ext == "json") {
                count += 1;
            }
        }
        Ok(count)
    }
}
