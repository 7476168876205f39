//! Pure helpers for validating and shaping backend URLs.
//!
//! Nothing in here performs I/O, so every function is usable from the
//! synchronous accessor as well as from the resolver chain.

use crate::error::{ResolverError, Result};
use std::net::IpAddr;
use url::Url;

/// Trims `raw`, checks it is an absolute `http`/`https` URL with a host and
/// returns it without trailing slashes.
///
/// The value must spell out `scheme://`. `Url::parse` repairs inputs such as
/// `https:api.example.com`, which a browser would treat as a relative path.
pub fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ResolverError::InvalidUrl("empty value".to_string()));
    }

    let parsed = Url::parse(trimmed)?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ResolverError::InvalidUrl(format!(
                "unsupported scheme '{}' in {}",
                other, trimmed
            )))
        }
    }
    let authority = format!("{}://", parsed.scheme());
    let spelled_out = trimmed
        .get(..authority.len())
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case(&authority));
    if !spelled_out {
        return Err(ResolverError::InvalidUrl(format!("not an absolute URL: {}", trimmed)));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ResolverError::InvalidUrl(format!("missing host in {}", trimmed)));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Same as [`normalize_url`] but discards the reason, for sources that only
/// care whether a candidate is usable.
pub fn usable_url(raw: &str) -> Option<String> {
    normalize_url(raw).ok()
}

/// Whether `host` names the local machine.
pub fn is_loopback_host(host: &str) -> bool {
    let host = host.trim().trim_start_matches('[').trim_end_matches(']').to_lowercase();
    if host == "localhost" || host.ends_with(".localhost") {
        return true;
    }
    match host.parse::<IpAddr>() {
        Ok(ip) => ip.is_loopback() || ip.is_unspecified(),
        Err(_) => false,
    }
}

/// Whether `url` parses and its host is a loopback host.
pub fn points_at_loopback(url: &str) -> bool {
    Url::parse(url.trim())
        .ok()
        .and_then(|parsed| parsed.host_str().map(is_loopback_host))
        .unwrap_or(false)
}

/// Appends a cache-busting query token to `path`.
pub fn cache_busted(path: &str, token: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{}{}{}", path, separator, token)
}

/// Joins a resolved base URL with an API path.
///
/// An empty base means the backend is unconfigured; the caller gets an error
/// instead of a relative URL that would silently hit the page's own origin.
pub fn join_api_path(base: &str, path: &str) -> Result<String> {
    let base = base.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(ResolverError::Unconfigured);
    }
    if path.is_empty() {
        return Ok(base.to_string());
    }
    if path.starts_with('/') {
        Ok(format!("{}{}", base, path))
    } else {
        Ok(format!("{}/{}", base, path))
    }
}
