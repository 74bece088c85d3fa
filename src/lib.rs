//! Curtsy: a polite, embeddable web-crawl engine
//!
//! This crate implements the core of a crawler (per-host workers, courtesy
//! delays, frontier de-duplication, completion detection) behind
//! pluggable fetch/parse/select/visit capability ports. It deliberately does
//! not persist anything: embed it and observe the crawl through your visitor
//! and the event sink.

pub mod config;
pub mod crawler;
pub mod events;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Errors that abort a crawl before any worker is spawned
///
/// Everything that can go wrong *during* a crawl (fetch failures, parse
/// failures, callback faults) is non-fatal and reported through the event
/// sink instead; see the `events` module.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::url::{host_key, normalize_url};
pub use config::Config;
pub use crawler::{
    CrawlOptions, Crawler, DocumentParser, FetchError, FetchedPage, Fetcher, FollowLinksVisitor,
    HtmlDocParser, HtmlDocument, HttpFetcher, LinkSelector, PageVisitor, ParseError, Visit,
};
pub use events::{CrawlEvent, EventSink, TracingSink};
pub use robots::{RobotsPolicy, RobotsRules, StaticRobots};
