//! Pagination resolver
//!
//! The listing site renders only a sliding window of page numbers, so the
//! total page count is found by repeatedly jumping to the highest page number
//! visible and looking at the window rendered there. The walk ends when no
//! visible link goes beyond the highest page already seen.
//!
//! Resolution is fail-open: any error during the walk yields a single page,
//! so a broken pagination control never costs the locality's first page.

use crate::crawler::fetcher::{FetchResponse, Fetcher};
use crate::crawler::listing::{highest_beyond, parse_pagination, PageLink};
use crate::state::PageCursor;
use crate::CrawlError;
use url::Url;

/// Determines how many listing pages a locality has
pub struct PaginationResolver<'a> {
    fetcher: &'a Fetcher,

    /// Upper bound on the resolved count (0 = unlimited)
    max_pages: u32,
}

impl<'a> PaginationResolver<'a> {
    pub fn new(fetcher: &'a Fetcher, max_pages: u32) -> Self {
        Self { fetcher, max_pages }
    }

    /// Resolves the number of listing pages behind `listing_url`
    ///
    /// Always returns at least 1.
    pub async fn resolve_page_count(&self, listing_url: &Url) -> u32 {
        let walked = match self.fetch_page_links(listing_url).await {
            Ok(links) => self.walk(links).await,
            Err(e) => Err(e),
        };
        fail_open(listing_url, walked)
    }

    /// Like `resolve_page_count`, starting from an already fetched landing page
    pub async fn resolve_from_landing(&self, landing: &FetchResponse) -> u32 {
        let links = parse_pagination(&landing.text(), &landing.url);
        fail_open(&landing.url, self.walk(links).await)
    }

    async fn walk(&self, links: Option<Vec<PageLink>>) -> Result<u32, CrawlError> {
        let Some(mut links) = links else {
            tracing::debug!("No pagination control, single page");
            return Ok(1);
        };

        let mut cursor = PageCursor::new();

        while let Some(next) = highest_beyond(&links, cursor.highest_known_page_number()) {
            cursor.advance_to(next.number);
            tracing::debug!("Highest page so far: {}", next.number);

            if cursor.reached_cap(self.max_pages) {
                tracing::debug!("Page cap {} reached", self.max_pages);
                break;
            }

            // The window shown on the new page may reveal higher numbers
            match self.fetch_page_links(&next.url).await? {
                Some(next_links) => links = next_links,
                None => break,
            }
        }

        Ok(cursor.page_count(self.max_pages))
    }

    async fn fetch_page_links(&self, url: &Url) -> Result<Option<Vec<PageLink>>, CrawlError> {
        let response = self.fetcher.fetch(url).await?;
        if !response.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok(parse_pagination(&response.text(), &response.url))
    }
}

fn fail_open(listing_url: &Url, walked: Result<u32, CrawlError>) -> u32 {
    match walked {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Error getting number of pages for {}: {}", listing_url, e);
            1
        }
    }
}
