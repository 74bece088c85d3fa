//! Per-host courtesy delay tracking
//!
//! Each host worker owns one [`PolitenessClock`]. The clock remembers when
//! the host may next be contacted; the worker sleeps out the difference
//! before fetching and advances the clock after every attempt.

use std::time::Duration;
use tokio::time::Instant;

/// Tracks the earliest time the next fetch for one host may start
#[derive(Debug)]
pub struct PolitenessClock {
    delay: Duration,
    next_allowed: Option<Instant>,
}

impl PolitenessClock {
    /// Creates a clock with the host's effective delay. A zero delay
    /// disables throttling entirely.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_allowed: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Time left until the next fetch is permitted, or None if it may start
    /// now. The first fetch is always immediate.
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        let next = self.next_allowed?;
        if now >= next {
            None
        } else {
            Some(next - now)
        }
    }

    /// Records a fetch attempt, pushing the next allowed time out by the
    /// full delay. Failed attempts count: the request still hit the host.
    pub fn record_fetch(&mut self, now: Instant) {
        self.next_allowed = Some(now + self.delay);
    }
}

/// Resolves the delay a host is owed: the larger of the configured delay
/// and the robots-declared one, when present.
pub fn effective_delay(configured: Duration, robots_declared: Option<Duration>) -> Duration {
    match robots_declared {
        Some(declared) => configured.max(declared),
        None => configured,
    }
}
