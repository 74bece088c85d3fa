//! Structured observability events
//!
//! The engine reports worker lifecycle, fetch failures and callback
//! faults as typed events through an [`EventSink`]. It never
//! formats or persists them; the default [`TracingSink`] hands them to the
//! `tracing` subscriber, where `EnvFilter` controls verbosity.

use std::time::Duration;
use url::Url;

/// Everything the engine reports about a running crawl
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    /// A run began with this many accepted seeds.
    RunStarted { seeds: usize },
    /// The run completed; `pages` counts resolved work items.
    RunCompleted { pages: u64 },
    /// A worker task was spawned for a host.
    WorkerStarted { host: String },
    /// A worker sat idle past its TTL and was cleared.
    WorkerEvicted { host: String, idle_for: Duration },
    /// A worker task exited (eviction or run teardown).
    WorkerStopped { host: String },
    /// A fetch attempt failed; the item is resolved and the crawl goes on.
    FetchFailed { url: Url, error: String },
    /// The robots policy vetoed a fetch.
    RobotsDenied { url: Url },
    /// The document port could not produce a document for a fetched page.
    ParseFailed { url: Url, error: String },
    /// A user visitor panicked while processing this page.
    VisitorPanicked { url: Url },
    /// A user selector panicked on this candidate link.
    SelectorPanicked { url: Url },
}

/// Capability port for receiving crawl events
///
/// Implementations must be cheap and non-blocking; events are emitted from
/// worker tasks and the orchestrator loop alike.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &CrawlEvent);
}

/// Default sink: forwards events to `tracing` at conventional levels
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &CrawlEvent) {
        match event {
            CrawlEvent::RunStarted { seeds } => {
                tracing::info!(seeds, "crawl run started");
            }
            CrawlEvent::RunCompleted { pages } => {
                tracing::info!(pages, "crawl run completed");
            }
            CrawlEvent::WorkerStarted { host } => {
                tracing::debug!(%host, "worker started");
            }
            CrawlEvent::WorkerEvicted { host, idle_for } => {
                tracing::info!(%host, idle_ms = idle_for.as_millis() as u64, "idle worker evicted");
            }
            CrawlEvent::WorkerStopped { host } => {
                tracing::debug!(%host, "worker stopped");
            }
            CrawlEvent::FetchFailed { url, error } => {
                tracing::warn!(%url, %error, "fetch failed");
            }
            CrawlEvent::RobotsDenied { url } => {
                tracing::info!(%url, "fetch denied by robots policy");
            }
            CrawlEvent::ParseFailed { url, error } => {
                tracing::warn!(%url, %error, "document parse failed");
            }
            CrawlEvent::VisitorPanicked { url } => {
                tracing::error!(%url, "visitor panicked; item abandoned");
            }
            CrawlEvent::SelectorPanicked { url } => {
                tracing::error!(%url, "selector panicked; link dropped");
            }
        }
    }
}
