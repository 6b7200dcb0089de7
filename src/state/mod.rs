//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `LocalityTarget`: identifies one crawl unit (region code + locality)
//! - `PageCursor`: tracks the pagination walk while resolving the page count
//! - `CrawlPhase`: the per-locality state machine driven by the coordinator

mod crawl_phase;
mod locality;
mod page_cursor;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use locality::LocalityTarget;
pub use page_cursor::PageCursor;
