//! Robots.txt content parsing
//!
//! Allow/disallow matching is delegated to the robotstxt crate. Crawl-delay
//! is not part of the original robots.txt standard and the crate does not
//! surface it, so the directive is scanned out of the raw content here.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt rules for one host
#[derive(Debug, Clone)]
pub struct RobotsRules {
    content: String,
}

impl RobotsRules {
    /// Wraps raw robots.txt content. Empty content allows everything.
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Checks whether a URL path is allowed for the given user agent.
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        if self.content.is_empty() {
            return true;
        }
        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, path)
    }

    /// Crawl delay in seconds declared for the given user agent
    ///
    /// A delay in a group naming the agent wins over one in a `*` group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let mut current_agents: Vec<String> = Vec::new();
        let mut wildcard_delay: Option<f64> = None;
        let mut agent_delay: Option<f64> = None;

        let normalized_agent = user_agent.to_lowercase();

        for line in self.content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    current_agents.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    if let Ok(delay) = value.parse::<f64>() {
                        if current_agents.iter().any(|ua| *ua == normalized_agent) {
                            agent_delay = Some(delay);
                        } else if current_agents.iter().any(|ua| ua == "*") {
                            wildcard_delay = Some(delay);
                        }
                    }
                    // A delay closes its group; the next User-agent starts fresh
                    current_agents.clear();
                }
                _ => {
                    // Allow/Disallow and friends are the matcher's business
                }
            }
        }

        agent_delay.or(wildcard_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_allows_everything() {
        let rules = RobotsRules::from_content("");
        assert!(rules.is_allowed("/any/path", "TestBot"));
        assert_eq!(rules.crawl_delay("TestBot"), None);
    }

    #[test]
    fn test_disallow_all() {
        let rules = RobotsRules::from_content("User-agent: *\nDisallow: /");
        assert!(!rules.is_allowed("/", "TestBot"));
        assert!(!rules.is_allowed("/page", "TestBot"));
    }

    #[test]
    fn test_disallow_specific() {
        let rules = RobotsRules::from_content("User-agent: *\nDisallow: /admin");
        assert!(rules.is_allowed("/", "TestBot"));
        assert!(rules.is_allowed("/page", "TestBot"));
        assert!(!rules.is_allowed("/admin", "TestBot"));
        assert!(!rules.is_allowed("/admin/users", "TestBot"));
    }

    #[test]
    fn test_allow_overrides_disallow() {
        let rules =
            RobotsRules::from_content("User-agent: *\nDisallow: /private\nAllow: /private/public");
        assert!(!rules.is_allowed("/private", "TestBot"));
        assert!(rules.is_allowed("/private/public", "TestBot"));
    }

    #[test]
    fn test_specific_user_agent_group() {
        let rules =
            RobotsRules::from_content("User-agent: BadBot\nDisallow: /\n\nUser-agent: *\nAllow: /");
        assert!(rules.is_allowed("/page", "GoodBot"));
        assert!(!rules.is_allowed("/page", "BadBot"));
    }

    #[test]
    fn test_crawl_delay_wildcard() {
        let rules = RobotsRules::from_content("User-agent: *\nCrawl-delay: 10\nDisallow: /admin");
        assert_eq!(rules.crawl_delay("TestBot"), Some(10.0));
        assert_eq!(rules.crawl_delay("AnyBot"), Some(10.0));
    }

    #[test]
    fn test_crawl_delay_specific_agent_wins() {
        let rules =
            RobotsRules::from_content("User-agent: TestBot\nCrawl-delay: 5\n\nUser-agent: *\nCrawl-delay: 10");
        assert_eq!(rules.crawl_delay("TestBot"), Some(5.0));
        assert_eq!(rules.crawl_delay("OtherBot"), Some(10.0));
    }

    #[test]
    fn test_crawl_delay_absent() {
        let rules = RobotsRules::from_content("User-agent: *\nDisallow: /admin");
        assert_eq!(rules.crawl_delay("TestBot"), None);
    }

    #[test]
    fn test_crawl_delay_decimal() {
        let rules = RobotsRules::from_content("User-agent: *\nCrawl-delay: 2.5");
        assert_eq!(rules.crawl_delay("TestBot"), Some(2.5));
    }

    #[test]
    fn test_crawl_delay_case_insensitive() {
        let rules = RobotsRules::from_content("User-agent: TestBot\ncrawl-delay: 7");
        assert_eq!(rules.crawl_delay("testbot"), Some(7.0));
        assert_eq!(rules.crawl_delay("TESTBOT"), Some(7.0));
    }

    #[test]
    fn test_crawl_delay_multiple_agents_in_group() {
        let rules = RobotsRules::from_content("User-agent: BotA\nUser-agent: BotB\nCrawl-delay: 3");
        assert_eq!(rules.crawl_delay("BotA"), Some(3.0));
        assert_eq!(rules.crawl_delay("BotB"), Some(3.0));
        assert_eq!(rules.crawl_delay("BotC"), None);
    }
}
