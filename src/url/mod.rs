//! URL handling module for Terrier
//!
//! Provides the canonical URL normalization used as the dedup key throughout
//! the crawler.

mod normalize;

pub use normalize::normalize_url;
