use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads, resolves, and validates a configuration file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use terrier::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Domain: {}", config.crawler.domain);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let mut config: Config = toml::from_str(&content)?;

    config.resolve_domain()?;
    validate(&config)?;

    Ok(config)
}
