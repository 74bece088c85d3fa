//! URL identity for the crawl engine
//!
//! Normalization defines de-duplication identity: two links that normalize
//! to the same string are the same page. The host key partitions all
//! per-host state (worker, queue, politeness clock).

mod domain;
mod normalize;

pub use domain::host_key;
pub use normalize::{normalize, normalize_url};
