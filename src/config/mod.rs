//! TOML configuration for the command-line binary
//!
//! The library is configured in code through `CrawlOptions`; this module is
//! the file-based mirror of those knobs used by `main.rs`.

mod loader;
mod types;
mod validation;

pub use loader::load_config;
pub use types::{Config, CrawlSection, UserAgentConfig};
pub use validation::validate;
