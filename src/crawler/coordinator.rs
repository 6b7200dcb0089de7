//! Crawler coordinator - per-locality crawl orchestration
//!
//! This module drives one locality at a time through its `CrawlPhase`s:
//! - Fetching the landing page and resolving the page count
//! - Fetching each listing page and its linked profiles
//! - Extracting records and flushing them to the sink page by page
//!
//! Failures are contained at the narrowest scope that keeps the crawl moving:
//! a failed profile drops one record, a failed listing page drops one page,
//! a failed landing page drops one locality.

use crate::config::{Config, RecordFailurePolicy};
use crate::crawler::fetcher::{FetchResponse, Fetcher};
use crate::crawler::listing::{parse_listing, ListingEntry};
use crate::crawler::pagination::PaginationResolver;
use crate::extract::{extract_record, TherapistRecord};
use crate::output::{CrawlStatistics, CsvOutput, LocalityReport, RecordSink};
use crate::state::{CrawlPhase, LocalityTarget};
use crate::url::{listing_page_url, locality_url};
use crate::{CrawlError, ExtractResult};
use scraper::Html;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator<S: RecordSink> {
    config: Config,
    fetcher: Fetcher,
    sink: S,
}

impl<S: RecordSink> Coordinator<S> {
    /// Creates a coordinator around an already built fetcher and sink
    ///
    /// The fetcher carries the process-wide rate limiter; every request of
    /// every locality goes through it.
    pub fn new(config: Config, fetcher: Fetcher, sink: S) -> Self {
        Self {
            config,
            fetcher,
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Crawls every configured locality in order
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStatistics)` - One report per locality, including failed ones
    /// * `Err(CrawlError)` - An internal invariant was violated
    pub async fn run(&mut self) -> Result<CrawlStatistics, CrawlError> {
        let targets = self.config.targets();
        tracing::info!("Starting crawl of {} localities", targets.len());

        let start_time = std::time::Instant::now();
        let mut stats = CrawlStatistics::default();

        for target in &targets {
            let report = self.crawl_locality(target).await?;
            tracing::info!(
                "Finished {}: {} records from {} pages",
                target,
                report.records_written,
                report.pages_flushed
            );
            stats.record(report);
        }

        tracing::info!(
            "Crawl finished in {:.1}s, {} records written",
            start_time.elapsed().as_secs_f64(),
            stats.total_records()
        );

        Ok(stats)
    }

    /// Crawls one locality from landing page to the last listing page
    pub async fn crawl_locality(
        &mut self,
        target: &LocalityTarget,
    ) -> Result<LocalityReport, CrawlError> {
        let mut report = LocalityReport::new(target.clone());
        let mut phase = CrawlPhase::ResolvingPages;

        let Some((landing_url, landing)) = self.fetch_landing(target).await else {
            phase.transition(CrawlPhase::Done)?;
            return Ok(report);
        };
        report.landing_ok = true;

        let page_count = PaginationResolver::new(&self.fetcher, self.config.crawler.max_pages)
            .resolve_from_landing(&landing)
            .await;
        report.page_count = page_count;
        tracing::info!("{}: {} listing pages", target, page_count);

        phase = phase.transition(CrawlPhase::FetchingListingPage(1))?;

        while let CrawlPhase::FetchingListingPage(page) = phase {
            let page_url = listing_page_url(&landing_url, page);

            let Some(listing) = self.fetch_listing(&page_url).await else {
                report.pages_failed += 1;
                phase = phase.transition(CrawlPhase::after_page(page, page_count))?;
                continue;
            };

            phase = phase.transition(CrawlPhase::ExtractingDetails(page))?;
            let entries = parse_listing(&listing.text(), &listing.url);
            let records = self.extract_details(target, page, &entries, &mut report).await;

            phase = phase.transition(CrawlPhase::Flushing(page))?;
            match self.sink.append(target, &records) {
                Ok(path) => {
                    tracing::info!("Page {} scraped and added to file {}", page, path.display());
                    report.pages_flushed += 1;
                    report.records_written += records.len() as u64;
                    report.output_path = Some(path);
                }
                Err(e) => {
                    tracing::error!("Failed to write page {} of {}: {}", page, target, e);
                    report.output_failed = true;
                    phase = phase.transition(CrawlPhase::Done)?;
                    break;
                }
            }

            phase = phase.transition(CrawlPhase::after_page(page, page_count))?;
        }

        debug_assert!(phase.is_terminal());
        Ok(report)
    }

    /// Fetches the landing page; None ends the locality
    async fn fetch_landing(&self, target: &LocalityTarget) -> Option<(Url, FetchResponse)> {
        let url = match locality_url(
            &self.config.crawler.listing_url_template,
            target,
            &self.config.crawler.category,
        ) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Cannot build listing URL for {}: {}", target, e);
                return None;
            }
        };

        tracing::info!("Scraping {}", url);
        match self.fetcher.fetch(&url).await {
            Ok(response) if response.is_success() => Some((url, response)),
            Ok(response) => {
                tracing::error!(
                    "Failed to retrieve {}: status code {}",
                    url,
                    response.status
                );
                None
            }
            Err(e) => {
                tracing::error!("Failed to retrieve {}: {}", url, e);
                None
            }
        }
    }

    /// Fetches one listing page; None skips the page
    async fn fetch_listing(&self, url: &Url) -> Option<FetchResponse> {
        match self.fetcher.fetch(url).await {
            Ok(response) if response.is_success() => Some(response),
            Ok(response) => {
                tracing::warn!(
                    "Failed to retrieve page {}: status code {}",
                    url,
                    response.status
                );
                None
            }
            Err(e) => {
                tracing::warn!("Failed to retrieve page {}: {}", url, e);
                None
            }
        }
    }

    /// Fetches and extracts the profiles linked from one listing page
    async fn extract_details(
        &self,
        target: &LocalityTarget,
        page: u32,
        entries: &[ListingEntry],
        report: &mut LocalityReport,
    ) -> Vec<TherapistRecord> {
        let mut records = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let url = &entry.detail_url;

            let response = match self.fetcher.fetch(url).await {
                Ok(response) if response.is_success() => response,
                Ok(response) => {
                    tracing::warn!(
                        "Failed to retrieve profile {}: status code {}",
                        url,
                        response.status
                    );
                    report.details_failed += 1;
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Failed to retrieve profile {}: {}", url, e);
                    report.details_failed += 1;
                    continue;
                }
            };

            match extract_from_body(&response.text(), &target.region_code) {
                Ok(record) => records.push(record),
                Err(e) => {
                    report.extraction_failures += 1;
                    match self.config.crawler.on_missing_required_field {
                        RecordFailurePolicy::AbortPage => {
                            tracing::warn!(
                                "{} on {}; skipping the remaining {} profiles of page {}",
                                e,
                                url,
                                entries.len() - index - 1,
                                page
                            );
                            report.pages_aborted += 1;
                            break;
                        }
                        RecordFailurePolicy::SkipRecord => {
                            tracing::warn!("Skipping profile {}: {}", url, e);
                        }
                    }
                }
            }
        }

        records
    }
}

// Parsed documents stay out of the async state machine
fn extract_from_body(body: &str, region_code: &str) -> ExtractResult<TherapistRecord> {
    let document = Html::parse_document(body);
    extract_record(&document, region_code)
}

/// Runs a crawl of every configured locality into timestamped CSV files
///
/// # Example
///
/// ```no_run
/// use therapist_crawler::config::load_config;
/// use therapist_crawler::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawler.toml"))?;
/// let stats = run_crawl(config).await?;
/// println!("{} records", stats.total_records());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStatistics, CrawlError> {
    let fetcher = Fetcher::from_config(&config)?;
    let sink = CsvOutput::for_current_run(&config.output.directory);
    tracing::info!(
        "Writing output to {} (run {})",
        sink.directory().display(),
        sink.run_timestamp()
    );

    let mut coordinator = Coordinator::new(config, fetcher, sink);
    coordinator.run().await
}
