//! Frontier snapshot persistence
//!
//! The snapshot is a JSON array of canonical URL strings in queue order. It
//! is rewritten as a whole (never appended) and removed once a crawl
//! completes cleanly.

use super::StorageResult;
use std::fs;
use std::path::Path;

/// Rewrites the snapshot, replacing any previous one
///
/// The data is written to a temporary file and renamed into place, so a
/// concurrent reader never sees a half-written snapshot.
pub fn save_snapshot(path: &Path, urls: &[String]) -> StorageResult<()> {
    let tmp_path = path.with_extension("tmp");
    let encoded = serde_json::to_vec(urls)?;
    fs::write(&tmp_path, encoded)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Loads the snapshot, or None when no snapshot exists
pub fn load_snapshot(path: &Path) -> StorageResult<Option<Vec<String>>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read(path)?;
    let urls = serde_json::from_slice(&raw)?;
    Ok(Some(urls))
}

/// Removes the snapshot. Removing a snapshot that does not exist is not an
/// error.
pub fn remove_snapshot(path: &Path) -> StorageResult<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frontier.json");

        let urls = vec![
            "https://example.edu/a".to_string(),
            "https://example.edu/b".to_string(),
        ];
        save_snapshot(&path, &urls).unwrap();

        let loaded = load_snapshot(&path).unwrap().unwrap();
        assert_eq!(loaded, urls);
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempdir().unwrap();
        let loaded = load_snapshot(&dir.path().join("frontier.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frontier.json");

        save_snapshot(&path, &["https://example.edu/a".to_string()]).unwrap();
        save_snapshot(&path, &["https://example.edu/b".to_string()]).unwrap();

        let loaded = load_snapshot(&path).unwrap().unwrap();
        assert_eq!(loaded, vec!["https://example.edu/b".to_string()]);
    }

    #[test]
    fn test_remove_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frontier.json");

        save_snapshot(&path, &[]).unwrap();
        remove_snapshot(&path).unwrap();
        assert!(!path.exists());

        // Idempotent
        remove_snapshot(&path).unwrap();
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frontier.json");

        save_snapshot(&path, &["https://example.edu/a".to_string()]).unwrap();
        assert!(!path.with_extension("tmp").exists());
    }
}
