use crate::config::types::{Config, CrawlerConfig, HttpConfig, StoreConfig};
use crate::ConfigError;
use ::url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_store_config(&config.store)?;
    if config.archive.html_page_dir.is_empty() {
        return Err(ConfigError::Validation(
            "html_page_dir cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|_| ConfigError::InvalidUrl(config.base_url.clone()))?;
    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must be http or https, got {}",
            config.base_url
        )));
    }

    if config.parallel_thread_count < 1 || config.parallel_thread_count > 100 {
        return Err(ConfigError::Validation(format!(
            "parallel_thread_count must be between 1 and 100, got {}",
            config.parallel_thread_count
        )));
    }

    if config.max_link_limit < 1 {
        return Err(ConfigError::Validation(
            "max_link_limit must be >= 1".to_string(),
        ));
    }

    if config.link_refresh_after_hours < 1 {
        return Err(ConfigError::Validation(
            "link_refresh_after_hours must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request_timeout must be >= 1 second".to_string(),
        ));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates store configuration
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.fetch_batch_limit < 1 {
        return Err(ConfigError::Validation(
            "fetch_batch_limit must be >= 1".to_string(),
        ));
    }

    Ok(())
}
