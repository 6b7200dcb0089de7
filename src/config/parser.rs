use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so output files can be traced back to the settings
/// that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecordFailurePolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
listing-url-template = "https://directory.example.com/{region_code}/therapists/{locality_name}"
rate-limit-calls = 4
rate-limit-period-ms = 2000
max-pages = 5
on-missing-required-field = "skip-record"

[user-agent]
value = "TestCrawler/1.0"

[output]
directory = "/tmp/out"

[[locality]]
region-code = "on"
locality-name = "ottawa"

[[locality]]
region-code = "bc"
locality-name = "victoria"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.rate_limit_calls, 4);
        assert_eq!(config.crawler.rate_limit_period_ms, 2000);
        assert_eq!(config.crawler.max_pages, 5);
        assert_eq!(
            config.crawler.on_missing_required_field,
            RecordFailurePolicy::SkipRecord
        );
        assert_eq!(config.crawler.category, "in-person");
        assert_eq!(config.user_agent.value, "TestCrawler/1.0");
        assert_eq!(config.output.directory, "/tmp/out");
        assert_eq!(config.localities.len(), 2);
        assert_eq!(config.localities[1].locality_name, "victoria");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.crawler.rate_limit_calls, 2);
        assert_eq!(config.crawler.rate_limit_period_ms, 1000);
        assert_eq!(config.crawler.max_pages, 0);
        assert_eq!(
            config.crawler.on_missing_required_field,
            RecordFailurePolicy::AbortPage
        );
        assert_eq!(config.localities.len(), 1);
        assert_eq!(config.localities[0].region_code, "on");
        assert_eq!(config.localities[0].locality_name, "ottawa");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/crawler.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_failure_policy_rejected() {
        let result = parse_config(
            r#"
[crawler]
on-missing-required-field = "explode"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
rate-limit-calls = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
