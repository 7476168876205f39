//! The places a backend URL may be found, one type per place.
//!
//! Each source either yields a usable URL or `None`; failures are logged here
//! and never reach the caller.

use crate::config::{ResolverSettings, UnresolvedPolicy};
use crate::environment::Environment;
use crate::heuristics::guess_backend_url;
use crate::models::resolution::SourceKind;
use crate::urls::{cache_busted, is_loopback_host, points_at_loopback, usable_url};
use async_trait::async_trait;
use log::{debug, warn};

/// What a source gets to look at.
pub struct ResolveContext<'a> {
    pub env: &'a Environment,
    pub settings: &'a ResolverSettings,
}

#[async_trait(?Send)]
pub trait UrlSource {
    fn kind(&self) -> SourceKind;

    /// Whether a URL found here is written back to durable storage.
    fn persists(&self) -> bool {
        false
    }

    async fn try_resolve(&self, ctx: &ResolveContext<'_>) -> Option<String>;
}

/// The standard priority order.
pub fn default_chain() -> Vec<Box<dyn UrlSource>> {
    vec![
        Box::new(StoredSource),
        Box::new(ManualOverrideSource),
        Box::new(RuntimeConfigSource),
        Box::new(BuildTimeSource),
        Box::new(HostnameHeuristicSource),
        Box::new(LocalDefaultSource),
    ]
}

/// The URL a previous session persisted.
pub struct StoredSource;

#[async_trait(?Send)]
impl UrlSource for StoredSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Stored
    }

    async fn try_resolve(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        let stored = match ctx.env.storage.load(&ctx.settings.storage_key) {
            Ok(stored) => stored?,
            Err(e) => {
                warn!("Failed to read stored API URL: {}", e);
                return None;
            }
        };

        let url = match usable_url(&stored) {
            Some(url) => url,
            None => {
                debug!("Ignoring malformed stored API URL '{}'", stored);
                return None;
            }
        };
        if points_at_loopback(&url) {
            debug!("Ignoring stored API URL pointing at loopback: {}", url);
            return None;
        }
        Some(url)
    }
}

/// `window.__API_URL__` or whatever slot the page exposes.
pub struct ManualOverrideSource;

#[async_trait(?Send)]
impl UrlSource for ManualOverrideSource {
    fn kind(&self) -> SourceKind {
        SourceKind::ManualOverride
    }

    fn persists(&self) -> bool {
        true
    }

    async fn try_resolve(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        let value = ctx.env.page.manual_override()?;
        if value.trim().is_empty() {
            return None;
        }
        let url = usable_url(&value);
        if url.is_none() {
            warn!("Ignoring manual API URL override '{}': not an absolute http(s) URL", value);
        }
        url
    }
}

/// `config.json` served next to the page.
pub struct RuntimeConfigSource;

#[async_trait(?Send)]
impl UrlSource for RuntimeConfigSource {
    fn kind(&self) -> SourceKind {
        SourceKind::RuntimeConfig
    }

    fn persists(&self) -> bool {
        true
    }

    async fn try_resolve(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        let url = cache_busted(&ctx.settings.config_path, &ctx.env.page.cache_bust_token());
        match ctx.env.fetcher.fetch_document(&url).await {
            Ok(document) => {
                let configured = document.configured_url(ctx.settings);
                if configured.is_none() {
                    debug!(
                        "{} does not configure a usable apiUrl ({:?})",
                        ctx.settings.config_path, document.api_url
                    );
                }
                configured
            }
            Err(e) => {
                debug!("Runtime config {} unavailable: {}", ctx.settings.config_path, e);
                None
            }
        }
    }
}

/// Constant baked into the build.
pub struct BuildTimeSource;

#[async_trait(?Send)]
impl UrlSource for BuildTimeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::BuildTime
    }

    async fn try_resolve(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        let value = ctx.settings.build_time()?;
        let url = usable_url(value);
        if url.is_none() {
            warn!("Ignoring build-time API URL '{}': not an absolute http(s) URL", value);
        }
        url
    }
}

/// Companion backend guessed from the page's hostname.
pub struct HostnameHeuristicSource;

#[async_trait(?Send)]
impl UrlSource for HostnameHeuristicSource {
    fn kind(&self) -> SourceKind {
        SourceKind::HostnameHeuristic
    }

    async fn try_resolve(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        let hostname = ctx.env.page.hostname()?;
        let guess = guess_backend_url(&hostname, &ctx.settings.hosting_rules)?;
        warn!(
            "Backend API URL not configured. Set it in {} or the API_URL build variable.",
            ctx.settings.config_path
        );
        warn!(
            "Using backend URL guessed from {} hostname {}: {}",
            guess.provider, hostname, guess.url
        );
        Some(guess.url)
    }
}

/// Local development backend.
pub struct LocalDefaultSource;

#[async_trait(?Send)]
impl UrlSource for LocalDefaultSource {
    fn kind(&self) -> SourceKind {
        SourceKind::LocalDefault
    }

    async fn try_resolve(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        let local = match ctx.env.page.hostname() {
            None => true,
            Some(host) => host.trim().is_empty() || is_loopback_host(&host),
        };
        if local || ctx.settings.unresolved_policy == UnresolvedPolicy::LocalDefault {
            Some(ctx.settings.local_default.clone())
        } else {
            None
        }
    }
}
