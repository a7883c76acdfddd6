use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Main configuration structure for Terrier
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub resume: ResumeConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Exact host to stay within; derived from the seed URL when empty
    #[serde(default)]
    pub domain: String,

    /// Maximum number of unique pages to save; 0 means unlimited
    #[serde(rename = "max-pages", default)]
    pub max_pages: u64,

    /// Delay before every request (seconds)
    #[serde(rename = "rate-limit-seconds", default = "default_rate_limit")]
    pub rate_limit_seconds: f64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-seconds", default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl CrawlerConfig {
    pub fn rate_limit(&self) -> Duration {
        Duration::from_secs_f64(self.rate_limit_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// Optional URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// The User-Agent header value sent with every request
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Retry and backoff configuration for the fetcher
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Maximum attempts per URL, including the first request
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay for exponential backoff between attempts (seconds)
    #[serde(rename = "backoff-base-seconds", default = "default_backoff_base")]
    pub backoff_base_seconds: f64,

    /// HTTP status codes that trigger a retry
    #[serde(rename = "retry-statuses", default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_seconds: default_backoff_base(),
            retry_statuses: default_retry_statuses(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory for all persisted artifacts
    #[serde(rename = "base-dir", default = "default_base_dir")]
    pub base_dir: String,

    /// Rewrite the frontier snapshot every this many newly saved pages
    #[serde(rename = "checkpoint-interval", default = "default_checkpoint_interval")]
    pub checkpoint_interval: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            checkpoint_interval: default_checkpoint_interval(),
        }
    }
}

/// Resume behavior configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeConfig {
    /// When false, URLs in the error log stay excluded on later runs; when
    /// true, failed URLs become eligible again
    #[serde(rename = "requeue-failed", default)]
    pub requeue_failed: bool,
}

impl Config {
    /// Builds a configuration from the environment, for runs without a
    /// config file. `SEED_URL` is required; everything else has a default.
    pub fn from_env() -> ConfigResult<Self> {
        let seed_url = std::env::var("SEED_URL").map_err(|_| {
            ConfigError::Validation(
                "SEED_URL must be set when no config file is given".to_string(),
            )
        })?;

        let mut config = Config {
            crawler: CrawlerConfig {
                seed_url,
                domain: std::env::var("DOMAIN").unwrap_or_default(),
                max_pages: parse_env("MAX_PAGES", 0)?,
                rate_limit_seconds: parse_env("RATE_LIMIT_SECONDS", default_rate_limit())?,
                timeout_seconds: parse_env("TIMEOUT", default_timeout())?,
            },
            user_agent: user_agent_from_env(),
            fetch: FetchConfig::default(),
            output: OutputConfig {
                base_dir: std::env::var("BASE_DIR").unwrap_or_else(|_| default_base_dir()),
                checkpoint_interval: default_checkpoint_interval(),
            },
            resume: ResumeConfig::default(),
        };

        config.resolve_domain()?;
        crate::config::validation::validate(&config)?;
        Ok(config)
    }

    /// Derives the domain from the seed URL when it was not given, and
    /// lower-cases it either way.
    pub(crate) fn resolve_domain(&mut self) -> ConfigResult<()> {
        if self.crawler.domain.is_empty() {
            let seed = Url::parse(&self.crawler.seed_url).map_err(|e| {
                ConfigError::InvalidUrl(format!(
                    "invalid seed-url '{}': {}",
                    self.crawler.seed_url, e
                ))
            })?;
            self.crawler.domain = seed
                .host_str()
                .ok_or_else(|| {
                    ConfigError::InvalidUrl(format!(
                        "seed-url '{}' has no host",
                        self.crawler.seed_url
                    ))
                })?
                .to_string();
        }
        self.crawler.domain = self.crawler.domain.to_lowercase();
        Ok(())
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> ConfigResult<T>
where
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| ConfigError::Validation(format!("invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

fn user_agent_from_env() -> UserAgentConfig {
    match std::env::var("USER_AGENT") {
        Ok(raw) => match raw.split_once('/') {
            Some((name, version)) => UserAgentConfig {
                crawler_name: name.to_string(),
                crawler_version: version.to_string(),
                contact_url: None,
            },
            None => UserAgentConfig {
                crawler_name: raw.clone(),
                ..Default::default()
            },
        },
        Err(_) => UserAgentConfig::default(),
    }
}

fn default_rate_limit() -> f64 {
    1.0
}

fn default_timeout() -> u64 {
    10
}

fn default_crawler_name() -> String {
    "terrier".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base() -> f64 {
    1.0
}

fn default_retry_statuses() -> Vec<u16> {
    vec![429, 500, 502, 503, 504]
}

fn default_base_dir() -> String {
    "crawl_data".to_string()
}

fn default_checkpoint_interval() -> u32 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_header_value() {
        let ua = UserAgentConfig {
            crawler_name: "terrier".to_string(),
            crawler_version: "0.1.0".to_string(),
            contact_url: None,
        };
        assert_eq!(ua.header_value(), "terrier/0.1.0");

        let ua = UserAgentConfig {
            contact_url: Some("https://example.edu/about".to_string()),
            ..ua
        };
        assert_eq!(ua.header_value(), "terrier/0.1.0 (+https://example.edu/about)");
    }

    #[test]
    fn test_resolve_domain_from_seed() {
        let mut config = Config {
            crawler: CrawlerConfig {
                seed_url: "https://Example.EDU/start".to_string(),
                domain: String::new(),
                max_pages: 0,
                rate_limit_seconds: 1.0,
                timeout_seconds: 10,
            },
            user_agent: UserAgentConfig::default(),
            fetch: FetchConfig::default(),
            output: OutputConfig::default(),
            resume: ResumeConfig::default(),
        };

        config.resolve_domain().unwrap();
        assert_eq!(config.crawler.domain, "example.edu");
    }

    #[test]
    fn test_resolve_domain_lowercases_explicit_value() {
        let mut config = Config {
            crawler: CrawlerConfig {
                seed_url: "https://example.edu/".to_string(),
                domain: "Example.EDU".to_string(),
                max_pages: 0,
                rate_limit_seconds: 1.0,
                timeout_seconds: 10,
            },
            user_agent: UserAgentConfig::default(),
            fetch: FetchConfig::default(),
            output: OutputConfig::default(),
            resume: ResumeConfig::default(),
        };

        config.resolve_domain().unwrap();
        assert_eq!(config.crawler.domain, "example.edu");
    }

    #[test]
    fn test_fetch_defaults() {
        let fetch = FetchConfig::default();
        assert_eq!(fetch.max_attempts, 3);
        assert_eq!(fetch.retry_statuses, vec![429, 500, 502, 503, 504]);
    }

    #[test]
    fn test_durations() {
        let crawler = CrawlerConfig {
            seed_url: "https://example.edu/".to_string(),
            domain: "example.edu".to_string(),
            max_pages: 0,
            rate_limit_seconds: 0.5,
            timeout_seconds: 10,
        };
        assert_eq!(crawler.rate_limit(), Duration::from_millis(500));
        assert_eq!(crawler.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("SEED_URL", "https://example.edu/");
        std::env::set_var("MAX_PAGES", "25");
        std::env::set_var("RATE_LIMIT_SECONDS", "0.25");
        std::env::set_var("BASE_DIR", "/tmp/terrier-test-env");
        std::env::set_var("USER_AGENT", "campus-bot/2.1");

        let config = Config::from_env().unwrap();
        assert_eq!(config.crawler.seed_url, "https://example.edu/");
        assert_eq!(config.crawler.domain, "example.edu");
        assert_eq!(config.crawler.max_pages, 25);
        assert_eq!(config.crawler.rate_limit_seconds, 0.25);
        assert_eq!(config.output.base_dir, "/tmp/terrier-test-env");
        assert_eq!(config.user_agent.header_value(), "campus-bot/2.1");

        for name in [
            "SEED_URL",
            "MAX_PAGES",
            "RATE_LIMIT_SECONDS",
            "BASE_DIR",
            "USER_AGENT",
        ] {
            std::env::remove_var(name);
        }
    }
}
