use crate::config::types::{Config, CrawlerConfig, LocalityEntry, OutputConfig, UserAgentConfig};
use crate::url::{LOCALITY_PLACEHOLDER, REGION_PLACEHOLDER};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_localities(&config.localities)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if !config.listing_url_template.contains(REGION_PLACEHOLDER)
        || !config.listing_url_template.contains(LOCALITY_PLACEHOLDER)
    {
        return Err(ConfigError::Validation(format!(
            "listing-url-template must contain {} and {}",
            REGION_PLACEHOLDER, LOCALITY_PLACEHOLDER
        )));
    }

    let sample = config
        .listing_url_template
        .replace(REGION_PLACEHOLDER, "xx")
        .replace(LOCALITY_PLACEHOLDER, "xx");
    let url = Url::parse(&sample)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid listing-url-template: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "listing-url-template '{}' must use http or https",
            config.listing_url_template
        )));
    }

    if url.query().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "listing-url-template '{}' must not carry a query string",
            config.listing_url_template
        )));
    }

    if config.category.trim().is_empty() {
        return Err(ConfigError::Validation(
            "category cannot be empty".to_string(),
        ));
    }

    if config.rate_limit_calls < 1 {
        return Err(ConfigError::Validation(format!(
            "rate-limit-calls must be >= 1, got {}",
            config.rate_limit_calls
        )));
    }

    if config.rate_limit_period_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "rate-limit-period-ms must be >= 1, got {}",
            config.rate_limit_period_ms
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent value cannot be empty".to_string(),
        ));
    }

    // Must be a legal header value
    if config.value.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(
            "user-agent value cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates locality entries
fn validate_localities(localities: &[LocalityEntry]) -> Result<(), ConfigError> {
    if localities.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[locality]] entry is required".to_string(),
        ));
    }

    for entry in localities {
        validate_path_segment("region-code", &entry.region_code)?;
        validate_path_segment("locality-name", &entry.locality_name)?;
    }

    Ok(())
}

/// Locality fields end up both in a URL path and in a file name
fn validate_path_segment(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "{} must contain only ASCII letters, digits, '-' or '_', got '{}'",
            field, value
        )));
    }

    Ok(())
}
