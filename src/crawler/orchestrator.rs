//! Crawl orchestration
//!
//! The orchestrator owns the run: it normalizes and routes seeds, creates
//! host workers lazily, moves selector-approved links from workers into the
//! right queues, and decides when the whole crawl is finished.
//!
//! All routing state (the visited set, the outstanding-work counter, the
//! worker table) lives on the orchestrator's single message loop. Workers
//! never touch it; they report over a channel. Outstanding work is
//! incremented before an item is handed to a queue and decremented only
//! when a worker reports it fully resolved, so zero outstanding means zero
//! in flight, everywhere.

use crate::crawler::fetcher::{Fetcher, HttpFetcher, DEFAULT_USER_AGENT};
use crate::crawler::parser::{DocumentParser, HtmlDocParser};
use crate::crawler::visit::{FollowLinksVisitor, LinkSelector, PageVisitor};
use crate::crawler::worker::{EngineMsg, HostWorker, WorkItem, WorkerContext};
use crate::events::{CrawlEvent, EventSink, TracingSink};
use crate::robots::RobotsPolicy;
use crate::url::{host_key, normalize_url};
use crate::{ConfigError, CrawlError};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

use super::frontier::VisitedSet;

/// Default courtesy delay between fetches to one host.
pub const DEFAULT_CRAWL_DELAY: Duration = Duration::from_secs(5);

/// Default time a host worker may wait without work before retiring.
pub const DEFAULT_WORKER_IDLE_TTL: Duration = Duration::from_secs(10);

/// Everything a crawl run can be configured with
///
/// Every field has a default that allows a zero-configuration run against
/// seeds only: same-host crawling with the HTTP fetcher, the HTML parser
/// and a visitor that follows every extracted link.
#[derive(Clone)]
pub struct CrawlOptions {
    /// Drop discovered links whose host is not a seed host.
    pub same_host_only: bool,
    /// Minimum time between fetches to the same host.
    pub crawl_delay: Duration,
    /// Idle time after which a host worker retires.
    pub worker_idle_ttl: Duration,
    /// Cap on work items dispatched to fetch; None means unbounded.
    pub max_visits: Option<u64>,
    /// Gate for discovered links; None accepts everything.
    pub selector: Option<Arc<dyn LinkSelector>>,
    /// Handler for fetched pages.
    pub visitor: Arc<dyn PageVisitor>,
    /// Fetch port; None builds an [`HttpFetcher`] at run entry.
    pub fetcher: Option<Arc<dyn Fetcher>>,
    /// Document port.
    pub parser: Arc<dyn DocumentParser>,
    /// Robots awareness; None disables both the allow gate and declared
    /// crawl delays.
    pub robots: Option<Arc<dyn RobotsPolicy>>,
    /// Event sink; defaults to forwarding into `tracing`.
    pub events: Arc<dyn EventSink>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            same_host_only: true,
            crawl_delay: DEFAULT_CRAWL_DELAY,
            worker_idle_ttl: DEFAULT_WORKER_IDLE_TTL,
            max_visits: None,
            selector: None,
            visitor: Arc::new(FollowLinksVisitor),
            fetcher: None,
            parser: Arc::new(HtmlDocParser),
            robots: None,
            events: Arc::new(TracingSink),
        }
    }
}

/// The crawl engine
///
/// A `Crawler` is cheap to keep around and may run any number of
/// *sequential* crawls; every run builds its state from scratch, so nothing
/// leaks from one run into the next. Options may be adjusted between runs.
pub struct Crawler {
    pub options: CrawlOptions,
}

impl Crawler {
    pub fn new(options: CrawlOptions) -> Self {
        Self { options }
    }

    /// Convenience constructor for the common case: a visitor plus an
    /// optional selector, everything else defaulted.
    pub fn with_visitor(
        visitor: Arc<dyn PageVisitor>,
        selector: Option<Arc<dyn LinkSelector>>,
    ) -> Self {
        Self::new(CrawlOptions {
            visitor,
            selector,
            ..CrawlOptions::default()
        })
    }

    /// Crawls from the given seeds until nothing is left to do
    ///
    /// Blocks (awaits) until every accepted URL has been resolved and every
    /// worker has drained. Fails fast, before any worker is spawned, on
    /// invalid options, an unbuildable default fetcher, or unparseable
    /// seeds. Everything after that is non-fatal and reported through the
    /// event sink.
    pub async fn run<I, S>(&self, seeds: I) -> crate::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.validate()?;

        let fetcher: Arc<dyn Fetcher> = match &self.options.fetcher {
            Some(fetcher) => Arc::clone(fetcher),
            None => Arc::new(HttpFetcher::new(DEFAULT_USER_AGENT).map_err(CrawlError::Client)?),
        };

        let seeds: Vec<Url> = seeds
            .into_iter()
            .map(|s| normalize_url(s.as_ref()))
            .collect::<Result<_, _>>()?;

        let seed_hosts: HashSet<String> = seeds.iter().filter_map(host_key).collect();

        let ctx = Arc::new(WorkerContext {
            fetcher,
            parser: Arc::clone(&self.options.parser),
            visitor: Arc::clone(&self.options.visitor),
            selector: self.options.selector.clone(),
            robots: self.options.robots.clone(),
            events: Arc::clone(&self.options.events),
            same_host_only: self.options.same_host_only,
            seed_hosts,
            idle_ttl: self.options.worker_idle_ttl,
            crawl_delay: self.options.crawl_delay,
        });

        self.options
            .events
            .emit(&CrawlEvent::RunStarted { seeds: seeds.len() });

        let mut run = RunLoop::new(ctx, self.options.max_visits);
        for seed in seeds {
            run.route(seed);
        }
        run.drive().await;

        self.options.events.emit(&CrawlEvent::RunCompleted {
            pages: run.resolved,
        });

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.options.worker_idle_ttl.is_zero() {
            return Err(ConfigError::Validation(
                "worker_idle_ttl must be nonzero".to_string(),
            ));
        }
        if self.options.max_visits == Some(0) {
            return Err(ConfigError::Validation(
                "max_visits must be nonzero when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Handle to a live worker: its queue plus how many of its items the
/// orchestrator still considers unresolved.
struct WorkerHandle {
    tx: mpsc::UnboundedSender<WorkItem>,
    pending: u64,
}

/// State of one run, owned by the message loop
struct RunLoop {
    ctx: Arc<WorkerContext>,
    engine_tx: mpsc::UnboundedSender<EngineMsg>,
    engine_rx: mpsc::UnboundedReceiver<EngineMsg>,
    visited: VisitedSet,
    workers: HashMap<String, WorkerHandle>,
    outstanding: u64,
    live_workers: u64,
    dispatched: u64,
    resolved: u64,
    max_visits: Option<u64>,
}

impl RunLoop {
    fn new(ctx: Arc<WorkerContext>, max_visits: Option<u64>) -> Self {
        let (engine_tx, engine_rx) = mpsc::unbounded_channel();
        Self {
            ctx,
            engine_tx,
            engine_rx,
            visited: VisitedSet::new(),
            workers: HashMap::new(),
            outstanding: 0,
            live_workers: 0,
            dispatched: 0,
            resolved: 0,
            max_visits,
        }
    }

    /// Accepts a normalized URL into the crawl: de-duplicates, applies the
    /// dispatch cap, and hands it to its host's worker, creating the worker
    /// if the host has none (first sight, or a previous worker retired).
    fn route(&mut self, url: Url) {
        if let Some(max) = self.max_visits {
            if self.dispatched >= max {
                tracing::debug!(%url, "dispatch cap reached, dropping candidate");
                return;
            }
        }

        // Membership is claimed at enqueue time, not fetch time, so a URL
        // reported twice in flight still fetches once.
        if !self.visited.try_visit(&url) {
            return;
        }

        let Some(host) = host_key(&url) else {
            return;
        };

        self.outstanding += 1;
        self.dispatched += 1;

        let handle = match self.workers.entry(host) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let (tx, rx) = mpsc::unbounded_channel();
                let worker = HostWorker::new(
                    entry.key().clone(),
                    rx,
                    self.engine_tx.clone(),
                    Arc::clone(&self.ctx),
                );
                tokio::spawn(worker.run());
                self.live_workers += 1;
                entry.insert(WorkerHandle { tx, pending: 0 })
            }
        };
        handle.pending += 1;
        let _ = handle.tx.send(WorkItem { url });
    }

    /// Runs the message loop to completion: no outstanding work and no
    /// live worker tasks.
    async fn drive(&mut self) {
        while self.outstanding > 0 || self.live_workers > 0 {
            let Some(msg) = self.engine_rx.recv().await else {
                break;
            };
            self.handle(msg);
        }
        // Normally a no-op: queues are closed the moment outstanding hits
        // zero, which is what let the loop finish.
        self.workers.clear();
    }

    fn handle(&mut self, msg: EngineMsg) {
        match msg {
            EngineMsg::Discovered { links } => {
                for link in links {
                    self.route(link);
                }
            }

            EngineMsg::ItemDone { host } => {
                self.outstanding -= 1;
                self.resolved += 1;
                if let Some(handle) = self.workers.get_mut(&host) {
                    handle.pending -= 1;
                }
                if self.outstanding == 0 {
                    // Nothing left anywhere: close every queue and let the
                    // workers drain out.
                    self.workers.clear();
                }
            }

            EngineMsg::IdleTimeout { host, idle_for } => {
                // Honor the request only if nothing is in flight to this
                // worker; otherwise it is about to receive the raced-in
                // item and carries on.
                let retire = self
                    .workers
                    .get(&host)
                    .map(|handle| handle.pending == 0)
                    .unwrap_or(false);
                if retire {
                    self.workers.remove(&host);
                    tracing::debug!(
                        %host,
                        served = self.visited.enqueued_for_host(&host),
                        "retiring idle worker"
                    );
                    self.ctx
                        .events
                        .emit(&CrawlEvent::WorkerEvicted { host, idle_for });
                }
            }

            EngineMsg::WorkerExited { host } => {
                self.live_workers -= 1;
                tracing::trace!(%host, live = self.live_workers, "worker accounted");
            }
        }
    }
}
