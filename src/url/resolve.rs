use url::Url;

/// Schemes that never lead to a page
const NON_NAVIGABLE: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];

/// Turns an href from listing markup into an absolute http(s) URL
///
/// Empty hrefs, same-page anchors, non-navigable schemes and anything that
/// does not resolve to http(s) against `base_url` yield None.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if NON_NAVIGABLE.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    base_url
        .join(href)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}
