use crate::config::types::Config;
use crate::url::normalize_url;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seeds(config)?;
    validate_crawl(config)?;
    validate_user_agent(config)?;
    Ok(())
}

fn validate_seeds(config: &Config) -> Result<(), ConfigError> {
    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in &config.seeds {
        normalize_url(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("seed '{}': {}", seed, e)))?;
    }

    Ok(())
}

fn validate_crawl(config: &Config) -> Result<(), ConfigError> {
    if config.crawl.worker_idle_ttl_ms == 0 {
        return Err(ConfigError::Validation(
            "worker-idle-ttl-ms must be nonzero".to_string(),
        ));
    }

    if config.crawl.max_visits == Some(0) {
        return Err(ConfigError::Validation(
            "max-visits must be nonzero when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_user_agent(config: &Config) -> Result<(), ConfigError> {
    let name = &config.user_agent.crawler_name;
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            name
        )));
    }

    if let Some(contact) = &config.user_agent.contact_url {
        url::Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("invalid contact-url: {}", e)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml_str: &str) -> Config {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_valid_minimal_config() {
        let cfg = config(r#"seeds = ["http://hosta/page1.html"]"#);
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_empty_seeds_rejected() {
        let cfg = config("seeds = []");
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_malformed_seed_rejected() {
        let cfg = config(r#"seeds = ["not a url"]"#);
        assert!(matches!(validate(&cfg), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_non_http_seed_rejected() {
        let cfg = config(r#"seeds = ["ftp://hosta/file"]"#);
        assert!(matches!(validate(&cfg), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_zero_idle_ttl_rejected() {
        let cfg = config(
            r#"
            seeds = ["http://hosta/page1.html"]
            [crawl]
            worker-idle-ttl-ms = 0
            "#,
        );
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_max_visits_rejected() {
        let cfg = config(
            r#"
            seeds = ["http://hosta/page1.html"]
            [crawl]
            max-visits = 0
            "#,
        );
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_crawler_name_rejected() {
        let cfg = config(
            r#"
            seeds = ["http://hosta/page1.html"]
            [user-agent]
            crawler-name = "my bot!"
            "#,
        );
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_contact_url_rejected() {
        let cfg = config(
            r#"
            seeds = ["http://hosta/page1.html"]
            [user-agent]
            contact-url = "nope"
            "#,
        );
        assert!(matches!(validate(&cfg), Err(ConfigError::InvalidUrl(_))));
    }
}
