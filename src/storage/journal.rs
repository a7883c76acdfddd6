//! Append-only JSONL journals
//!
//! Every record is one complete, newline-terminated JSON line, written with a
//! single `write_all` through its own open/append/close cycle. A reader that
//! processes the file line-by-line never observes a partially-written record
//! from a completed call.

use super::StorageResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Appends one record to a JSONL file
pub fn append_record<T: Serialize>(path: &Path, record: &T) -> StorageResult<()> {
    let mut line = serde_json::to_string(record)?;
    line.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;

    Ok(())
}

/// Reads every well-formed record from a JSONL file
///
/// Lines that fail to parse are skipped: a truncated tail left by a crash
/// must not poison a resume. A missing file reads as empty.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> StorageResult<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = std::fs::File::open(path)?;
    let mut records = Vec::new();

    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => records.push(record),
            Err(_) => continue,
        }
    }

    Ok(records)
}
