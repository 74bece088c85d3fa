//! Robots awareness as a capability port
//!
//! The engine does not fetch or cache robots.txt. It asks an injected
//! [`RobotsPolicy`] two questions: may this URL be fetched, and does this
//! host declare a crawl delay. [`RobotsRules`] parses robots.txt content
//! handed to it; [`StaticRobots`] maps hosts to rules for embedders that
//! obtain the files out of band (and for tests).

mod rules;

pub use rules::RobotsRules;

use crate::url::host_key;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Capability port for robots.txt decisions
pub trait RobotsPolicy: Send + Sync {
    /// Whether the URL may be fetched at all.
    fn allowed(&self, url: &Url) -> bool;

    /// Host-declared crawl delay, if any. The engine uses the larger of
    /// this and its configured delay.
    fn crawl_delay(&self, host: &str) -> Option<Duration>;
}

/// A fixed host → rules policy
pub struct StaticRobots {
    rules: HashMap<String, RobotsRules>,
    user_agent: String,
}

impl StaticRobots {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            rules: HashMap::new(),
            user_agent: user_agent.into(),
        }
    }

    /// Registers robots.txt content for a host, replacing any previous rules.
    pub fn insert(&mut self, host: impl Into<String>, content: &str) {
        self.rules
            .insert(host.into().to_lowercase(), RobotsRules::from_content(content));
    }

    pub fn with_rules(mut self, host: impl Into<String>, content: &str) -> Self {
        self.insert(host, content);
        self
    }
}

impl RobotsPolicy for StaticRobots {
    fn allowed(&self, url: &Url) -> bool {
        let Some(host) = host_key(url) else {
            return true;
        };
        match self.rules.get(&host) {
            // Unknown host: nothing forbids it
            None => true,
            Some(rules) => rules.is_allowed(url.path(), &self.user_agent),
        }
    }

    fn crawl_delay(&self, host: &str) -> Option<Duration> {
        self.rules
            .get(&host.to_lowercase())?
            .crawl_delay(&self.user_agent)
            .map(Duration::from_secs_f64)
    }
}
