//! Configuration module for Terrier
//!
//! Configuration is dual-sourced: a TOML file when one is given on the
//! command line, otherwise the environment (`SEED_URL`, `DOMAIN`,
//! `MAX_PAGES`, `RATE_LIMIT_SECONDS`, `TIMEOUT`, `BASE_DIR`, `USER_AGENT`).
//!
//! # Example
//!
//! ```no_run
//! use terrier::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawling {}", config.crawler.seed_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetchConfig, OutputConfig, ResumeConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::load_config;
