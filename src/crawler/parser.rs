//! The document capability port and its HTML default
//!
//! A [`DocumentParser`] turns a fetched page into an [`HtmlDocument`] the
//! visitor can mine for links. Parse failures are non-fatal: the engine
//! treats them as "no links found" and still runs the visitor.

use crate::crawler::fetcher::FetchedPage;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// Link and title structure extracted from a fetched page
///
/// Links are absolute (resolved against the page's final URL) but not yet
/// normalized; normalization happens when the engine considers a candidate.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    pub title: Option<String>,
    pub links: Vec<Url>,
}

/// Document port failure
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

/// Capability port turning a response body into a link-bearing document
pub trait DocumentParser: Send + Sync {
    fn parse(&self, page: &FetchedPage) -> Result<HtmlDocument, ParseError>;
}

/// Default parser built on scraper
///
/// Extraction rules: `<a href>` anchors without a `download` attribute.
/// Skipped: `javascript:`, `mailto:`, `tel:` and `data:` schemes,
/// fragment-only anchors, and anything that does not resolve to http(s).
/// `rel="nofollow"` anchors are kept; honoring nofollow is selector policy.
pub struct HtmlDocParser;

impl DocumentParser for HtmlDocParser {
    fn parse(&self, page: &FetchedPage) -> Result<HtmlDocument, ParseError> {
        let document = Html::parse_document(&page.body);

        let title = extract_title(&document);
        let links = extract_links(&document, &page.url);

        Ok(HtmlDocument { title, links })
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute) = resolve_link(href, base_url) {
                    links.push(absolute);
                }
            }
        }
    }

    links
}

/// Resolves an href against the page URL; None means the link is not a
/// crawlable hyperlink.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}
