use crate::state::LocalityTarget;
use crate::UrlError;
use url::Url;

/// Placeholder for the region code in the listing URL template
pub const REGION_PLACEHOLDER: &str = "{region_code}";

/// Placeholder for the locality name in the listing URL template
pub const LOCALITY_PLACEHOLDER: &str = "{locality_name}";

/// Query parameter selecting a listing page
pub const PAGE_PARAM: &str = "page";

/// Builds the landing URL of a locality
///
/// The template's placeholders are substituted and the `category` query
/// parameter is appended.
///
/// # Examples
///
/// ```
/// use therapist_crawler::state::LocalityTarget;
/// use therapist_crawler::url::locality_url;
///
/// let url = locality_url(
///     "https://example.com/{region_code}/therapists/{locality_name}",
///     &LocalityTarget::new("on", "ottawa"),
///     "in-person",
/// )
/// .unwrap();
/// assert_eq!(url.as_str(), "https://example.com/on/therapists/ottawa?category=in-person");
/// ```
pub fn locality_url(
    template: &str,
    target: &LocalityTarget,
    category: &str,
) -> Result<Url, UrlError> {
    let raw = template
        .replace(REGION_PLACEHOLDER, &target.region_code)
        .replace(LOCALITY_PLACEHOLDER, &target.locality_name);

    let mut url = Url::parse(&raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    url.query_pairs_mut().append_pair("category", category);
    Ok(url)
}

/// URL of listing page `page` for a locality landing URL
pub fn listing_page_url(locality_url: &Url, page: u32) -> Url {
    let mut url = locality_url.clone();
    url.query_pairs_mut()
        .append_pair(PAGE_PARAM, &page.to_string());
    url
}
