//! Per-host worker task
//!
//! A worker owns one host's queue and politeness clock. Its loop is:
//! wait for work or the idle TTL, sleep out the courtesy delay, fetch,
//! parse, run the visitor, screen the surfaced links, report back.
//!
//! Termination is a handshake, not a unilateral exit: on an idle timeout
//! the worker *requests* retirement and keeps waiting. The orchestrator
//! honors the request only when nothing is in flight for this host, by
//! closing the queue. A work item can never be lost to a worker that
//! quit a moment earlier.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::DocumentParser;
use crate::crawler::politeness::PolitenessClock;
use crate::crawler::visit::{LinkSelector, PageVisitor, Visit};
use crate::events::{CrawlEvent, EventSink};
use crate::robots::RobotsPolicy;
use crate::url::{host_key, normalize};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout, Instant};
use url::Url;

/// A pending crawl task, owned by exactly one worker queue
#[derive(Debug)]
pub(crate) struct WorkItem {
    pub url: Url,
}

/// Worker-to-orchestrator reports
#[derive(Debug)]
pub(crate) enum EngineMsg {
    /// Links that survived the same-host filter and the selector.
    Discovered { links: Vec<Url> },
    /// A work item fully resolved (fetched, failed, or denied).
    ItemDone { host: String },
    /// The worker sat idle past its TTL and asks to be retired.
    IdleTimeout { host: String, idle_for: Duration },
    /// The worker task is gone; final accounting.
    WorkerExited { host: String },
}

/// Capabilities and policy shared by every worker of one run
pub(crate) struct WorkerContext {
    pub fetcher: Arc<dyn Fetcher>,
    pub parser: Arc<dyn DocumentParser>,
    pub visitor: Arc<dyn PageVisitor>,
    pub selector: Option<Arc<dyn LinkSelector>>,
    pub robots: Option<Arc<dyn RobotsPolicy>>,
    pub events: Arc<dyn EventSink>,
    pub same_host_only: bool,
    pub seed_hosts: HashSet<String>,
    pub idle_ttl: Duration,
    pub crawl_delay: Duration,
}

pub(crate) struct HostWorker {
    host: String,
    rx: mpsc::UnboundedReceiver<WorkItem>,
    engine_tx: mpsc::UnboundedSender<EngineMsg>,
    clock: PolitenessClock,
    ctx: Arc<WorkerContext>,
}

impl HostWorker {
    pub fn new(
        host: String,
        rx: mpsc::UnboundedReceiver<WorkItem>,
        engine_tx: mpsc::UnboundedSender<EngineMsg>,
        ctx: Arc<WorkerContext>,
    ) -> Self {
        let declared = ctx.robots.as_ref().and_then(|r| r.crawl_delay(&host));
        let delay = super::politeness::effective_delay(ctx.crawl_delay, declared);
        Self {
            host,
            rx,
            engine_tx,
            clock: PolitenessClock::new(delay),
            ctx,
        }
    }

    pub async fn run(mut self) {
        self.ctx.events.emit(&CrawlEvent::WorkerStarted {
            host: self.host.clone(),
        });

        loop {
            match timeout(self.ctx.idle_ttl, self.rx.recv()).await {
                Ok(Some(item)) => self.process(item).await,
                // Queue closed: retired by the orchestrator, or run teardown
                Ok(None) => break,
                Err(_elapsed) => {
                    // Request retirement but keep waiting; the orchestrator
                    // ignores the request if work is in flight to us.
                    let _ = self.engine_tx.send(EngineMsg::IdleTimeout {
                        host: self.host.clone(),
                        idle_for: self.ctx.idle_ttl,
                    });
                }
            }
        }

        self.ctx.events.emit(&CrawlEvent::WorkerStopped {
            host: self.host.clone(),
        });
        let _ = self.engine_tx.send(EngineMsg::WorkerExited {
            host: self.host.clone(),
        });
    }

    /// One fetch cycle. Always ends with exactly one `ItemDone`.
    async fn process(&mut self, item: WorkItem) {
        let url = item.url;

        if let Some(wait) = self.clock.time_until_ready(Instant::now()) {
            tracing::trace!(host = %self.host, wait_ms = wait.as_millis() as u64, "politeness wait");
            sleep(wait).await;
        }

        if let Some(robots) = &self.ctx.robots {
            if !robots.allowed(&url) {
                self.ctx.events.emit(&CrawlEvent::RobotsDenied { url });
                self.item_done();
                return;
            }
        }

        let page = match self.ctx.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(err) => {
                self.clock.record_fetch(Instant::now());
                self.ctx.events.emit(&CrawlEvent::FetchFailed {
                    url,
                    error: err.to_string(),
                });
                self.item_done();
                return;
            }
        };

        // Parse failure degrades to "no document"; the visitor still runs
        // and can read the raw body.
        let document = match self.ctx.parser.parse(&page) {
            Ok(doc) => Some(doc),
            Err(err) => {
                self.ctx.events.emit(&CrawlEvent::ParseFailed {
                    url: page.url.clone(),
                    error: err.to_string(),
                });
                None
            }
        };

        let visitor = &self.ctx.visitor;
        let visit = match panic::catch_unwind(AssertUnwindSafe(|| {
            visitor.visit(&page, document.as_ref())
        })) {
            Ok(visit) => visit,
            Err(_) => {
                self.ctx.events.emit(&CrawlEvent::VisitorPanicked {
                    url: page.url.clone(),
                });
                Visit::stop()
            }
        };

        if visit.follow {
            let approved = self.screen_links(visit.links);
            if !approved.is_empty() {
                let _ = self.engine_tx.send(EngineMsg::Discovered { links: approved });
            }
        }

        self.clock.record_fetch(Instant::now());
        self.item_done();
    }

    /// Applies normalization, the same-host policy and the selector to the
    /// links a visitor surfaced. De-duplication is the orchestrator's job.
    fn screen_links(&self, links: Vec<Url>) -> Vec<Url> {
        let mut approved = Vec::new();
        for link in links {
            let normalized = match normalize(link) {
                Ok(url) => url,
                Err(err) => {
                    tracing::debug!(%err, "dropping uncrawlable link");
                    continue;
                }
            };

            if self.ctx.same_host_only {
                match host_key(&normalized) {
                    Some(host) if self.ctx.seed_hosts.contains(&host) => {}
                    _ => continue,
                }
            }

            if let Some(selector) = &self.ctx.selector {
                let keep = match panic::catch_unwind(AssertUnwindSafe(|| {
                    selector.select(&normalized)
                })) {
                    Ok(keep) => keep,
                    Err(_) => {
                        self.ctx.events.emit(&CrawlEvent::SelectorPanicked {
                            url: normalized.clone(),
                        });
                        false
                    }
                };
                if !keep {
                    continue;
                }
            }

            approved.push(normalized);
        }
        approved
    }

    fn item_done(&self) {
        let _ = self.engine_tx.send(EngineMsg::ItemDone {
            host: self.host.clone(),
        });
    }
}
