// src/services/links.rs

//! Bulletin link resolution.
//!
//! Searches the source for "radar <month>" and takes the first result link.

use scraper::{Html, Selector};

use super::fetcher::PageFetcher;
use crate::error::{AppError, Result};
use crate::utils::resolve;

/// Search-result link markers, most specific first.
const LINK_SELECTORS: [&str; 2] = ["a[rel~='bookmark']", ".entry-title a"];

/// Finds the bulletin URL for the current period.
pub struct LinkResolver<'a> {
    fetcher: &'a dyn PageFetcher,
    base_url: String,
}

impl<'a> LinkResolver<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Search URL for a month name.
    pub fn search_url(&self, month_name: &str) -> String {
        format!(
            "{}/?s=radar+{}",
            self.base_url.trim_end_matches('/'),
            month_name
        )
    }

    /// Fetch the search page for `month_name` and return the bulletin link.
    ///
    /// One request, no retries.
    pub async fn resolve(&self, month_name: &str) -> Result<String> {
        let url = self.search_url(month_name);
        let page = self.fetcher.fetch(&url).await?.ensure_success()?;

        let link = extract_link(&page.body, &url)?;
        log::debug!("Resolved bulletin link {} from {}", link, url);
        Ok(link)
    }
}

/// Pull the first bulletin link out of search-result markup.
///
/// Relative links are resolved against `page_url`.
pub fn extract_link(markup: &str, page_url: &str) -> Result<String> {
    if markup.trim().is_empty() {
        return Err(AppError::parse(page_url, "empty search results page"));
    }

    let document = Html::parse_document(markup);
    for selector in LINK_SELECTORS {
        let selector = parse_selector(selector)?;
        let href = document
            .select(&selector)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .find(|href| !href.is_empty());

        if let Some(href) = href {
            return Ok(resolve(page_url, href));
        }
    }

    Err(AppError::LinkNotFound {
        url: page_url.to_string(),
    })
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::services::fetcher::testing::FakeFetcher;

    const SEARCH_URL: &str = "https://www.ahoraleon.com/?s=radar+marzo";

    #[test]
    fn test_search_url_trims_trailing_slash() {
        let fetcher = FakeFetcher::new();
        let resolver = LinkResolver::new(&fetcher, "https://www.ahoraleon.com/");
        assert_eq!(resolver.search_url("marzo"), SEARCH_URL);
    }

    #[test]
    fn test_extract_first_bookmark() {
        let html = r#"
            <article><h2 class="entry-title">
              <a href="https://www.ahoraleon.com/radares-marzo/" rel="bookmark">Radares marzo</a>
            </h2></article>
            <article><h2 class="entry-title">
              <a href="https://www.ahoraleon.com/radares-febrero/" rel="bookmark">Radares febrero</a>
            </h2></article>
        "#;
        assert_eq!(
            extract_link(html, SEARCH_URL).unwrap(),
            "https://www.ahoraleon.com/radares-marzo/"
        );
    }

    #[test]
    fn test_extract_skips_empty_href() {
        let html = r#"<a rel="bookmark" href="  "></a><a rel="nofollow bookmark" href="/radar-2/">x</a>"#;
        assert_eq!(
            extract_link(html, SEARCH_URL).unwrap(),
            "https://www.ahoraleon.com/radar-2/"
        );
    }

    #[test]
    fn test_extract_falls_back_to_entry_title() {
        let html = r#"<h3 class="entry-title"><a href="/radares-en-leon/">Radares</a></h3>"#;
        assert_eq!(
            extract_link(html, SEARCH_URL).unwrap(),
            "https://www.ahoraleon.com/radares-en-leon/"
        );
    }

    #[test]
    fn test_extract_no_link() {
        let html = "<html><body><p>No hay resultados</p></body></html>";
        let err = extract_link(html, SEARCH_URL).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LinkNotFound);
    }

    #[test]
    fn test_extract_empty_body_is_parse_error() {
        let err = extract_link("   ", SEARCH_URL).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_resolve_fetches_search_url_once() {
        let fetcher = FakeFetcher::new().with_page(
            SEARCH_URL,
            200,
            r#"<a rel="bookmark" href="https://www.ahoraleon.com/radares/">r</a>"#,
        );
        let resolver = LinkResolver::new(&fetcher, "https://www.ahoraleon.com");

        let link = resolver.resolve("marzo").await.unwrap();
        assert_eq!(link, "https://www.ahoraleon.com/radares/");
        assert_eq!(fetcher.requests(), vec![SEARCH_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_resolve_reports_status() {
        let fetcher = FakeFetcher::new().with_page(SEARCH_URL, 500, "oops");
        let resolver = LinkResolver::new(&fetcher, "https://www.ahoraleon.com");

        let err = resolver.resolve("marzo").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HttpStatus);
    }

    #[tokio::test]
    async fn test_resolve_reports_transport() {
        let fetcher = FakeFetcher::new();
        let resolver = LinkResolver::new(&fetcher, "https://www.ahoraleon.com");

        let err = resolver.resolve("marzo").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(fetcher.requests().len(), 1);
    }
}
