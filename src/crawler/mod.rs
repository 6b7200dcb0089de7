//! Crawler module for listing traversal and profile fetching
//!
//! This module contains the core crawling logic, including:
//! - Rate-limited HTTP fetching
//! - Listing page and pagination parsing
//! - Page count resolution
//! - Per-locality crawl coordination

mod coordinator;
mod fetcher;
mod listing;
mod pagination;
mod rate_limit;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, FetchResponse, Fetcher};
pub use listing::{highest_beyond, parse_listing, parse_pagination, ListingEntry, PageLink};
pub use pagination::PaginationResolver;
pub use rate_limit::RateLimiter;

use crate::config::Config;
use crate::output::CrawlStatistics;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and the shared rate limiter
/// 2. Resolve the page count of each locality
/// 3. Fetch every listing page and the profiles it links to
/// 4. Append each page's records to the locality's CSV file
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl completed; per-locality failures are in the report
/// * `Err(CrawlError)` - Crawl could not start
pub async fn crawl(config: Config) -> Result<CrawlStatistics, CrawlError> {
    run_crawl(config).await
}
