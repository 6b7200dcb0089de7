//! Output module
//!
//! This module handles:
//! - Persisting each page's records as soon as the page is done
//! - Recording per-locality crawl statistics

mod csv_output;
pub mod stats;
mod traits;

pub use csv_output::{encode_row, format_run_timestamp, CsvOutput, RUN_TIMESTAMP_FORMAT};
pub use stats::{print_statistics, CrawlStatistics, LocalityReport};
pub use traits::RecordSink;
