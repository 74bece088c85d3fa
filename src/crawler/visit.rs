//! User decision points: which links to take, what to do with a page
//!
//! Both contracts are one-method traits with blanket impls for plain
//! closures, so embedders pass `Arc::new(|url: &Url| ...)` instead of
//! writing adapter types.

use crate::crawler::fetcher::FetchedPage;
use crate::crawler::parser::HtmlDocument;
use url::Url;

/// What a visitor decided about a fetched page
///
/// When `follow` is false the returned links are discarded unread; a
/// visitor can consume content without ever expanding the frontier.
#[derive(Debug, Default)]
pub struct Visit {
    pub links: Vec<Url>,
    pub follow: bool,
}

impl Visit {
    /// Surface these links for enqueueing.
    pub fn follow(links: Vec<Url>) -> Self {
        Self { links, follow: true }
    }

    /// Surface nothing; the crawl does not grow from this page.
    pub fn stop() -> Self {
        Self {
            links: Vec::new(),
            follow: false,
        }
    }
}

/// Predicate gating which discovered candidate links are enqueued
///
/// Called once per candidate, after same-host filtering and before the
/// de-duplication check, so it sees repeat sightings of known URLs. It
/// must not carry side effects the engine depends on.
pub trait LinkSelector: Send + Sync {
    fn select(&self, url: &Url) -> bool;
}

impl<F> LinkSelector for F
where
    F: Fn(&Url) -> bool + Send + Sync,
{
    fn select(&self, url: &Url) -> bool {
        self(url)
    }
}

/// Handler for a fetched page
///
/// `document` is None when the document port failed; the body on `page` is
/// fully buffered either way.
pub trait PageVisitor: Send + Sync {
    fn visit(&self, page: &FetchedPage, document: Option<&HtmlDocument>) -> Visit;
}

impl<F> PageVisitor for F
where
    F: Fn(&FetchedPage, Option<&HtmlDocument>) -> Visit + Send + Sync,
{
    fn visit(&self, page: &FetchedPage, document: Option<&HtmlDocument>) -> Visit {
        self(page, document)
    }
}

/// Default visitor: surface every link the document port extracted
///
/// This is what a zero-configuration run uses; combined with the default
/// same-host policy it walks a site and nothing else.
pub struct FollowLinksVisitor;

impl PageVisitor for FollowLinksVisitor {
    fn visit(&self, _page: &FetchedPage, document: Option<&HtmlDocument>) -> Visit {
        match document {
            Some(doc) => Visit::follow(doc.links.clone()),
            None => Visit::stop(),
        }
    }
}
