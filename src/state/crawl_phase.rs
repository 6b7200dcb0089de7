use crate::CrawlError;
use std::fmt;

/// Per-locality crawl state machine
///
/// ```text
/// ResolvingPages -> FetchingListingPage(1) -> ExtractingDetails(1) -> Flushing(1)
///                                      \                                |
///                                       +-> FetchingListingPage(2) <----+ ... -> Done
/// ```
///
/// A failed listing page skips straight to the next page (or `Done`); a failed
/// landing request ends the locality from `ResolvingPages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Working out how many listing pages the locality has
    ResolvingPages,

    /// Fetching listing page k
    FetchingListingPage(u32),

    /// Fetching and extracting the profiles linked from page k
    ExtractingDetails(u32),

    /// Appending page k's records to the output file
    Flushing(u32),

    /// Locality finished
    Done,
}

impl CrawlPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// The listing page this phase operates on, if any
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::FetchingListingPage(k) | Self::ExtractingDetails(k) | Self::Flushing(k) => {
                Some(*k)
            }
            Self::ResolvingPages | Self::Done => None,
        }
    }

    /// Checks whether moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (*self, next) {
            (Self::ResolvingPages, Self::FetchingListingPage(1)) => true,
            (Self::ResolvingPages, Self::Done) => true,
            (Self::FetchingListingPage(k), Self::ExtractingDetails(j)) => j == k,
            (Self::FetchingListingPage(k), Self::FetchingListingPage(j)) => j == k + 1,
            (Self::FetchingListingPage(_), Self::Done) => true,
            (Self::ExtractingDetails(k), Self::Flushing(j)) => j == k,
            (Self::Flushing(k), Self::FetchingListingPage(j)) => j == k + 1,
            (Self::Flushing(_), Self::Done) => true,
            _ => false,
        }
    }

    /// Performs a checked transition
    pub fn transition(self, next: CrawlPhase) -> Result<CrawlPhase, CrawlError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CrawlError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// The phase that follows page `k` once it is finished or skipped
    pub fn after_page(k: u32, page_count: u32) -> CrawlPhase {
        if k >= page_count {
            Self::Done
        } else {
            Self::FetchingListingPage(k + 1)
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResolvingPages => write!(f, "resolving_pages"),
            Self::FetchingListingPage(k) => write!(f, "fetching_listing_page({})", k),
            Self::ExtractingDetails(k) => write!(f, "extracting_details({})", k),
            Self::Flushing(k) => write!(f, "flushing({})", k),
            Self::Done => write!(f, "done"),
        }
    }
}
