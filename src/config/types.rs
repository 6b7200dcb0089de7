use crate::state::LocalityTarget;
use serde::Deserialize;

/// Browser-like User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(rename = "locality", default = "default_localities")]
    pub localities: Vec<LocalityEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Landing page of a locality, with `{region_code}` and `{locality_name}`
    /// placeholders
    #[serde(rename = "listing-url-template", default = "default_listing_url_template")]
    pub listing_url_template: String,

    /// Value of the `category` query parameter
    #[serde(default = "default_category")]
    pub category: String,

    /// Requests allowed per rate limit period
    #[serde(rename = "rate-limit-calls", default = "default_rate_limit_calls")]
    pub rate_limit_calls: u32,

    /// Rate limit period (milliseconds)
    #[serde(rename = "rate-limit-period-ms", default = "default_rate_limit_period_ms")]
    pub rate_limit_period_ms: u64,

    /// Upper bound on resolved listing pages per locality (0 = unlimited)
    #[serde(rename = "max-pages", default)]
    pub max_pages: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// What to do when a profile lacks its display name
    #[serde(rename = "on-missing-required-field", default)]
    pub on_missing_required_field: RecordFailurePolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            listing_url_template: default_listing_url_template(),
            category: default_category(),
            rate_limit_calls: default_rate_limit_calls(),
            rate_limit_period_ms: default_rate_limit_period_ms(),
            max_pages: 0,
            request_timeout_secs: default_request_timeout_secs(),
            on_missing_required_field: RecordFailurePolicy::default(),
        }
    }
}

/// Handling of a profile that fails extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordFailurePolicy {
    /// Stop processing the remaining profiles of the listing page
    #[default]
    AbortPage,
    /// Drop only the failing profile and keep going
    SkipRecord,
}

/// User agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_user_agent")]
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: default_user_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the per-locality CSV files
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

/// One locality to crawl
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalityEntry {
    #[serde(rename = "region-code")]
    pub region_code: String,

    #[serde(rename = "locality-name")]
    pub locality_name: String,
}

impl LocalityEntry {
    pub fn target(&self) -> LocalityTarget {
        LocalityTarget::new(&self.region_code, &self.locality_name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
            localities: default_localities(),
        }
    }
}

impl Config {
    /// Crawl targets in configuration order
    pub fn targets(&self) -> Vec<LocalityTarget> {
        self.localities.iter().map(LocalityEntry::target).collect()
    }
}

fn default_listing_url_template() -> String {
    "https://www.psychologytoday.com/ca/therapists/{region_code}/{locality_name}".to_string()
}

fn default_category() -> String {
    "in-person".to_string()
}

fn default_rate_limit_calls() -> u32 {
    2
}

fn default_rate_limit_period_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_output_directory() -> String {
    ".".to_string()
}

fn default_localities() -> Vec<LocalityEntry> {
    vec![LocalityEntry {
        region_code: "on".to_string(),
        locality_name: "ottawa".to_string(),
    }]
}
