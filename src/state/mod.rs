//! Crawl state tracking
//!
//! Defines the per-URL lifecycle states the crawl loop moves pages through.

mod page_state;

pub use page_state::PageState;
