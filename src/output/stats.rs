//! Crawl statistics
//!
//! The coordinator fills one `LocalityReport` per locality; `main` prints
//! the aggregate when the run finishes.

use crate::state::LocalityTarget;
use std::path::PathBuf;

/// Outcome of crawling one locality
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalityReport {
    pub target: LocalityTarget,

    /// False when the landing request failed and nothing was crawled
    pub landing_ok: bool,

    /// Resolved number of listing pages
    pub page_count: u32,

    /// Listing pages whose records were flushed
    pub pages_flushed: u32,

    /// Listing pages dropped because their fetch failed
    pub pages_failed: u32,

    /// Listing pages cut short by a record without a display name
    pub pages_aborted: u32,

    /// Records appended to the output
    pub records_written: u64,

    /// Profiles dropped because their fetch failed
    pub details_failed: u64,

    /// Profiles that failed extraction
    pub extraction_failures: u64,

    /// True when the sink rejected a page and the locality was abandoned
    pub output_failed: bool,

    /// Output file, once something was flushed
    pub output_path: Option<PathBuf>,
}

impl LocalityReport {
    pub fn new(target: LocalityTarget) -> Self {
        Self {
            target,
            landing_ok: false,
            page_count: 0,
            pages_flushed: 0,
            pages_failed: 0,
            pages_aborted: 0,
            records_written: 0,
            details_failed: 0,
            extraction_failures: 0,
            output_failed: false,
            output_path: None,
        }
    }
}

/// Aggregate over all localities of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    pub localities: Vec<LocalityReport>,
}

impl CrawlStatistics {
    pub fn record(&mut self, report: LocalityReport) {
        self.localities.push(report);
    }

    pub fn total_records(&self) -> u64 {
        self.localities.iter().map(|l| l.records_written).sum()
    }

    pub fn total_pages_flushed(&self) -> u32 {
        self.localities.iter().map(|l| l.pages_flushed).sum()
    }

    pub fn total_failures(&self) -> u64 {
        self.localities
            .iter()
            .map(|l| {
                u64::from(l.pages_failed)
                    + u64::from(l.pages_aborted)
                    + l.details_failed
                    + l.extraction_failures
                    + u64::from(!l.landing_ok)
                    + u64::from(l.output_failed)
            })
            .sum()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    for report in &stats.localities {
        println!("{}:", report.target);
        if !report.landing_ok {
            println!("  Landing page could not be fetched; locality skipped");
            println!();
            continue;
        }
        println!("  Pages: {}", report.page_count);
        println!("  Pages flushed: {}", report.pages_flushed);
        if report.pages_failed > 0 {
            println!("  Pages failed: {}", report.pages_failed);
        }
        if report.pages_aborted > 0 {
            println!("  Pages aborted: {}", report.pages_aborted);
        }
        println!("  Records written: {}", report.records_written);
        if report.details_failed > 0 {
            println!("  Profiles not fetched: {}", report.details_failed);
        }
        if report.extraction_failures > 0 {
            println!("  Profiles without a name: {}", report.extraction_failures);
        }
        if report.output_failed {
            println!("  Output failed; remaining pages skipped");
        }
        if let Some(path) = &report.output_path {
            println!("  Output: {}", path.display());
        }
        println!();
    }

    println!(
        "Total: {} records from {} pages across {} localities ({} failures)",
        stats.total_records(),
        stats.total_pages_flushed(),
        stats.localities.len(),
        stats.total_failures()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let mut first = LocalityReport::new(LocalityTarget::new("on", "ottawa"));
        first.landing_ok = true;
        first.page_count = 2;
        first.pages_flushed = 2;
        first.records_written = 30;
        first.details_failed = 1;

        let second = LocalityReport::new(LocalityTarget::new("on", "kanata"));

        let mut stats = CrawlStatistics::default();
        stats.record(first);
        stats.record(second);

        assert_eq!(stats.total_records(), 30);
        assert_eq!(stats.total_pages_flushed(), 2);
        // one failed profile + one skipped locality
        assert_eq!(stats.total_failures(), 2);
    }
}
