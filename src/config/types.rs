use serde::Deserialize;
use std::time::Duration;

/// File-based configuration for the `curtsy` binary
///
/// The library itself is configured through `CrawlOptions`; this type is
/// the TOML surface the CLI exposes for the same knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Seed URLs the crawl starts from
    pub seeds: Vec<String>,

    #[serde(default)]
    pub crawl: CrawlSection,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Engine behavior knobs
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSection {
    /// Restrict the crawl to the seed hosts
    #[serde(rename = "same-host-only", default = "default_same_host_only")]
    pub same_host_only: bool,

    /// Minimum time between fetches to one host (milliseconds)
    #[serde(rename = "crawl-delay-ms", default = "default_crawl_delay_ms")]
    pub crawl_delay_ms: u64,

    /// Idle time after which a host worker retires (milliseconds)
    #[serde(rename = "worker-idle-ttl-ms", default = "default_worker_idle_ttl_ms")]
    pub worker_idle_ttl_ms: u64,

    /// Optional cap on pages dispatched to fetch
    #[serde(rename = "max-visits", default)]
    pub max_visits: Option<u64>,
}

impl Default for CrawlSection {
    fn default() -> Self {
        Self {
            same_host_only: default_same_host_only(),
            crawl_delay_ms: default_crawl_delay_ms(),
            worker_idle_ttl_ms: default_worker_idle_ttl_ms(),
            max_visits: None,
        }
    }
}

fn default_same_host_only() -> bool {
    true
}

fn default_crawl_delay_ms() -> u64 {
    crate::crawler::DEFAULT_CRAWL_DELAY.as_millis() as u64
}

fn default_worker_idle_ttl_ms() -> u64 {
    crate::crawler::DEFAULT_WORKER_IDLE_TTL.as_millis() as u64
}

/// User agent identification
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler, appended to the UA string
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

fn default_crawler_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Config {
    pub fn crawl_delay(&self) -> Duration {
        Duration::from_millis(self.crawl.crawl_delay_ms)
    }

    pub fn worker_idle_ttl(&self) -> Duration {
        Duration::from_millis(self.crawl.worker_idle_ttl_ms)
    }

    /// Formats the user agent string: `name/version` or
    /// `name/version (+contact-url)`.
    pub fn user_agent_string(&self) -> String {
        match &self.user_agent.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.user_agent.crawler_name, self.user_agent.crawler_version, contact
            ),
            None => format!(
                "{}/{}",
                self.user_agent.crawler_name, self.user_agent.crawler_version
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let config: Config = toml::from_str(r#"seeds = ["http://hosta/page1.html"]"#).unwrap();
        assert!(config.crawl.same_host_only);
        assert_eq!(config.crawl_delay(), crate::crawler::DEFAULT_CRAWL_DELAY);
        assert_eq!(config.crawl.max_visits, None);
        assert!(config.user_agent_string().starts_with("curtsy/"));
    }

    #[test]
    fn test_full_config_parses() {
        let config: Config = toml::from_str(
            r#"
            seeds = ["http://hosta/page1.html", "http://hosta/page4.html"]

            [crawl]
            same-host-only = false
            crawl-delay-ms = 250
            worker-idle-ttl-ms = 2000
            max-visits = 100

            [user-agent]
            crawler-name = "mybot"
            crawler-version = "2.1"
            contact-url = "https://example.com/bot"
            "#,
        )
        .unwrap();

        assert!(!config.crawl.same_host_only);
        assert_eq!(config.crawl_delay(), Duration::from_millis(250));
        assert_eq!(config.worker_idle_ttl(), Duration::from_millis(2000));
        assert_eq!(config.crawl.max_visits, Some(100));
        assert_eq!(
            config.user_agent_string(),
            "mybot/2.1 (+https://example.com/bot)"
        );
    }
}
