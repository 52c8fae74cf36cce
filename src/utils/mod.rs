//! Utility functions and helpers.

pub mod normalize;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extract the listing ID from a listing URL: the trailing numeric path
/// segment (e.g. `https://example.com/tutor/jobs/5938125`).
pub fn extract_listing_id(url: &str) -> Option<String> {
    let pattern = regex::Regex::new(r"/(\d+)/?(?:[?#].*)?$").ok()?;
    pattern
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}
