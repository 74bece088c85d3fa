use url::Url;

/// Extracts the host key from a URL
///
/// The host key is the lowercase hostname without the port. It is the unit
/// of work partitioning: one worker, one queue and one politeness clock per
/// host key. Returns None for URLs without a host.
pub fn host_key(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
