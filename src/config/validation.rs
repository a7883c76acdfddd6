use crate::config::types::{Config, CrawlerConfig, FetchConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let seed = Url::parse(&config.seed_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("invalid seed-url '{}': {}", config.seed_url, e))
    })?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "seed-url must use the http or https scheme, got '{}'",
            seed.scheme()
        )));
    }

    if config.domain.is_empty() {
        return Err(ConfigError::Validation("domain cannot be empty".to_string()));
    }

    if config.domain.contains('/') || config.domain.contains(':') {
        return Err(ConfigError::Validation(format!(
            "domain must be a bare host, got '{}'",
            config.domain
        )));
    }

    if !config.rate_limit_seconds.is_finite() || config.rate_limit_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "rate-limit-seconds must be a non-negative number, got {}",
            config.rate_limit_seconds
        )));
    }

    if config.timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "timeout-seconds must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if !config.backoff_base_seconds.is_finite() || config.backoff_base_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "backoff-base-seconds must be a non-negative number, got {}",
            config.backoff_base_seconds
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.base_dir.is_empty() {
        return Err(ConfigError::Validation(
            "base-dir cannot be empty".to_string(),
        ));
    }

    if config.checkpoint_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "checkpoint-interval must be >= 1, got {}",
            config.checkpoint_interval
        )));
    }

    Ok(())
}
