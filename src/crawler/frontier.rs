//! Crawl frontier and dedup bookkeeping
//!
//! The frontier is the single owner of the pending-URL queue and the two
//! membership sets: canonical URLs already claimed (queued or visited) and
//! content hashes already stored. Nothing else in the crawler mutates them.

use crate::url::normalize_url;
use crate::UrlResult;
use std::collections::{HashSet, VecDeque};
use thiserror::Error;
use url::Url;

/// Returned by [`Frontier::pop`] when no URLs are pending
#[derive(Debug, Error, PartialEq, Eq)]
#[error("frontier is empty")]
pub struct EmptyFrontier;

/// FIFO crawl frontier with URL- and content-level dedup sets
///
/// The queue is strictly first-in-first-out, which gives the crawl its
/// breadth-first order. A URL is marked seen the moment it is queued
/// ("claimed"), not when its fetch completes, so rediscovering it from
/// another page while it is still pending never queues it twice.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Url>,
    seen_urls: HashSet<String>,
    seen_hashes: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes a URL and queues it unless its canonical form has already
    /// been claimed. Returns true when the URL was newly queued.
    pub fn enqueue(&mut self, url: &str) -> UrlResult<bool> {
        let normalized = normalize_url(url)?;

        if !self.seen_urls.insert(normalized.as_str().to_string()) {
            return Ok(false);
        }

        self.queue.push_back(normalized);
        Ok(true)
    }

    /// Removes and returns the head of the queue
    pub fn pop(&mut self) -> Result<Url, EmptyFrontier> {
        self.queue.pop_front().ok_or(EmptyFrontier)
    }

    /// Registers a content hash. Returns true when the hash is new.
    pub fn record_hash(&mut self, hash: &str) -> bool {
        self.seen_hashes.insert(hash.to_string())
    }

    /// Marks a canonical URL as seen without queueing it (resume bookkeeping)
    pub fn mark_seen(&mut self, canonical: &str) {
        self.seen_urls.insert(canonical.to_string());
    }

    pub fn is_seen(&self, canonical: &str) -> bool {
        self.seen_urls.contains(canonical)
    }

    /// The pending queue in order, as canonical strings
    pub fn snapshot(&self) -> Vec<String> {
        self.queue.iter().map(|u| u.as_str().to_string()).collect()
    }

    /// Appends a snapshot's URLs to the pending queue
    ///
    /// Every restored URL is re-marked as seen, so a page still linking to it
    /// cannot queue it a second time. URLs already claimed (e.g. saved in a
    /// prior run) are skipped.
    pub fn restore(&mut self, urls: &[String]) -> UrlResult<()> {
        for raw in urls {
            let normalized = normalize_url(raw)?;
            if self.seen_urls.insert(normalized.as_str().to_string()) {
                self.queue.push_back(normalized);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of canonical URLs claimed so far
    pub fn seen_count(&self) -> usize {
        self.seen_urls.len()
    }

    /// Number of distinct content hashes recorded so far
    pub fn hash_count(&self) -> usize {
        self.seen_hashes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.enqueue("https://example.edu/a").unwrap();
        frontier.enqueue("https://example.edu/b").unwrap();
        frontier.enqueue("https://example.edu/c").unwrap();

        assert_eq!(frontier.pop().unwrap().as_str(), "https://example.edu/a");
        assert_eq!(frontier.pop().unwrap().as_str(), "https://example.edu/b");
        assert_eq!(frontier.pop().unwrap().as_str(), "https://example.edu/c");
    }

    #[test]
    fn test_pop_empty_frontier() {
        let mut frontier = Frontier::new();
        assert_eq!(frontier.pop(), Err(EmptyFrontier));
    }

    #[test]
    fn test_enqueue_dedups_on_canonical_form() {
        let mut frontier = Frontier::new();
        assert!(frontier.enqueue("https://example.edu/a?b=2&a=1").unwrap());
        // Same canonical URL, different query order and a fragment
        assert!(!frontier.enqueue("https://example.edu/a?a=1&b=2#x").unwrap());
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_claimed_before_fetch_completes() {
        let mut frontier = Frontier::new();
        frontier.enqueue("https://example.edu/a").unwrap();
        let popped = frontier.pop().unwrap();

        // Rediscovering a popped URL must not queue it again
        assert!(!frontier.enqueue(popped.as_str()).unwrap());
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_record_hash() {
        let mut frontier = Frontier::new();
        assert!(frontier.record_hash("abc"));
        assert!(!frontier.record_hash("abc"));
        assert!(frontier.record_hash("def"));
        assert_eq!(frontier.hash_count(), 2);
    }

    #[test]
    fn test_mark_seen_blocks_enqueue() {
        let mut frontier = Frontier::new();
        frontier.mark_seen("https://example.edu/saved");
        assert!(frontier.is_seen("https://example.edu/saved"));
        assert!(!frontier.enqueue("https://example.edu/saved").unwrap());
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let mut frontier = Frontier::new();
        frontier.enqueue("https://example.edu/a").unwrap();
        frontier.enqueue("https://example.edu/b").unwrap();

        assert_eq!(
            frontier.snapshot(),
            vec![
                "https://example.edu/a".to_string(),
                "https://example.edu/b".to_string()
            ]
        );
    }

    #[test]
    fn test_restore_marks_seen() {
        let mut frontier = Frontier::new();
        frontier
            .restore(&[
                "https://example.edu/a".to_string(),
                "https://example.edu/b".to_string(),
            ])
            .unwrap();

        assert_eq!(frontier.len(), 2);
        // A page still linking to a restored URL cannot queue it again
        assert!(!frontier.enqueue("https://example.edu/a").unwrap());
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_restore_skips_already_claimed() {
        let mut frontier = Frontier::new();
        frontier.mark_seen("https://example.edu/saved");
        frontier
            .restore(&[
                "https://example.edu/saved".to_string(),
                "https://example.edu/pending".to_string(),
            ])
            .unwrap();

        assert_eq!(frontier.len(), 1);
        assert_eq!(
            frontier.pop().unwrap().as_str(),
            "https://example.edu/pending"
        );
    }

    #[test]
    fn test_no_url_popped_twice() {
        let mut frontier = Frontier::new();
        frontier.enqueue("https://example.edu/a").unwrap();
        frontier.enqueue("https://example.edu/b").unwrap();

        let mut popped = Vec::new();
        while let Ok(url) = frontier.pop() {
            // Simulate rediscovery during the crawl
            let _ = frontier.enqueue("https://example.edu/a");
            let _ = frontier.enqueue("https://example.edu/b");
            popped.push(url.as_str().to_string());
        }

        assert_eq!(popped.len(), 2);
        assert_ne!(popped[0], popped[1]);
    }
}
