//! The crawl engine core
//!
//! This module contains the orchestrator and its parts:
//! - per-host worker tasks with idle self-retirement
//! - courtesy-delay enforcement per host
//! - frontier de-duplication
//! - the fetch/parse/select/visit capability ports and their defaults

mod fetcher;
mod frontier;
mod orchestrator;
mod parser;
mod politeness;
mod visit;
mod worker;

pub use fetcher::{FetchError, FetchedPage, Fetcher, HttpFetcher, DEFAULT_USER_AGENT};
pub use frontier::VisitedSet;
pub use orchestrator::{
    CrawlOptions, Crawler, DEFAULT_CRAWL_DELAY, DEFAULT_WORKER_IDLE_TTL,
};
pub use parser::{DocumentParser, HtmlDocParser, HtmlDocument, ParseError};
pub use politeness::{effective_delay, PolitenessClock};
pub use visit::{FollowLinksVisitor, LinkSelector, PageVisitor, Visit};
