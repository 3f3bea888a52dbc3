use crate::protocol::UrlMatch;
use url::Url;

/// Whether `url` falls under `rule`.
///
/// Hosts compare case-insensitively and ports are ignored. Unparseable URLs
/// never match.
pub fn matches_url(rule: &UrlMatch, url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    let Some(host) = parsed.host_str() else {
        return false;
    };

    if !host.eq_ignore_ascii_case(&rule.domain) {
        return false;
    }

    match &rule.path_prefix {
        Some(prefix) if !prefix.is_empty() => parsed.path().starts_with(prefix.as_str()),
        _ => true,
    }
}

/// Lowercased host of `url`, if it has one.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}
