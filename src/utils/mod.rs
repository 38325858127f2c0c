//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Resolve a URL string against a base URL string.
///
/// Falls back to `href` unchanged when the base does not parse.
pub fn resolve(base_url: &str, href: &str) -> String {
    Url::parse(base_url)
        .map(|base| resolve_url(&base, href))
        .unwrap_or_else(|_| href.to_string())
}

/// Trim whitespace, including the non-breaking space the source pads cells with.
///
/// Some pages carry the escape sequence `\xa0` as literal text; it is removed too.
pub fn clean_cell(text: &str) -> String {
    text.replace("\\xa0", "")
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
