//! Listing page parser
//!
//! A listing page carries two things the crawler needs:
//! - the profile links of the current result page (`ListingEntry`)
//! - the pagination control, which only shows a window of page numbers

use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::url::resolve_link;

static RESULTS: LazyLock<Selector> = LazyLock::new(|| listing_selector("div.results"));
static RESULT_ROW: LazyLock<Selector> = LazyLock::new(|| listing_selector("div.results-row"));
static PROFILE_LINK: LazyLock<Selector> = LazyLock::new(|| listing_selector("a.profile-title"));
static PAGINATION: LazyLock<Selector> =
    LazyLock::new(|| listing_selector("div.results-pagination-container"));
static PAGINATION_LINK: LazyLock<Selector> = LazyLock::new(|| listing_selector("a"));

fn listing_selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("valid listing selector")
}

/// A profile linked from a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub detail_url: Url,
}

/// A numbered link inside the pagination control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub url: Url,
}

/// Extracts the profile links of a listing page
///
/// Rows are `div.results-row` inside `div.results`; the profile link is the
/// row's `a.profile-title`. Rows without a usable link are skipped.
pub fn parse_listing(html: &str, page_url: &Url) -> Vec<ListingEntry> {
    let document = Html::parse_document(html);

    let Some(results) = document.select(&RESULTS).next() else {
        tracing::warn!("Results container not found on {}", page_url);
        return Vec::new();
    };

    let rows: Vec<_> = results.select(&RESULT_ROW).collect();
    tracing::info!("Found {} therapists on {}", rows.len(), page_url);
    if rows.is_empty() {
        tracing::warn!("No therapist rows found on {}", page_url);
    }

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let detail_url = row
            .select(&PROFILE_LINK)
            .next()
            .and_then(|link| link.value().attr("href"))
            .and_then(|href| resolve_link(href, page_url));

        match detail_url {
            Some(detail_url) => entries.push(ListingEntry { detail_url }),
            None => tracing::warn!("Profile link not found in a result row on {}", page_url),
        }
    }

    entries
}

/// Extracts the numbered links of the pagination control
///
/// Returns None when the page has no `div.results-pagination-container`,
/// meaning the listing fits on a single page. Links whose label is not a
/// number ("Next", "…") or that have no usable href are skipped.
pub fn parse_pagination(html: &str, page_url: &Url) -> Option<Vec<PageLink>> {
    let document = Html::parse_document(html);

    let container = document.select(&PAGINATION).next()?;

    let links = container
        .select(&PAGINATION_LINK)
        .filter_map(|link| {
            let label = link.text().collect::<String>();
            let number = label.trim().parse::<u32>().ok()?;
            let href = link.value().attr("href")?;
            let url = resolve_link(href, page_url)?;
            Some(PageLink { number, url })
        })
        .collect();

    Some(links)
}

/// The highest-numbered link strictly beyond `highest`
///
/// When several links carry the same number the first one wins.
pub fn highest_beyond(links: &[PageLink], highest: u32) -> Option<&PageLink> {
    links
        .iter()
        .filter(|link| link.number > highest)
        .fold(None, |best: Option<&PageLink>, link| match best {
            Some(current) if current.number >= link.number => Some(current),
            _ => Some(link),
        })
}
