use crate::config::ResolverSettings;
use crate::environment::Environment;
use crate::error::Result;
use crate::models::resolution::{Resolution, ResolutionState, SourceKind};
use crate::sources::{default_chain, ResolveContext, UrlSource};
use crate::urls::{normalize_url, points_at_loopback, usable_url};
use log::{debug, error, info, warn};
use std::cell::RefCell;

/// Owns the backend URL for one page session.
///
/// Construct it once at start-up and hand it to whoever needs the URL. The
/// first successful [`resolve`](Self::resolve) is memoized; later calls return
/// the same value without consulting any source.
pub struct ApiUrlResolver {
    env: Environment,
    settings: ResolverSettings,
    sources: Vec<Box<dyn UrlSource>>,
    state: RefCell<ResolutionState>,
}

impl ApiUrlResolver {
    pub fn new(env: Environment, settings: ResolverSettings) -> Self {
        Self::with_sources(env, settings, default_chain())
    }

    pub fn with_sources(
        env: Environment,
        settings: ResolverSettings,
        sources: Vec<Box<dyn UrlSource>>,
    ) -> Self {
        Self {
            env,
            settings,
            sources,
            state: RefCell::new(ResolutionState::Unresolved),
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn state(&self) -> ResolutionState {
        self.state.borrow().clone()
    }

    pub fn last_resolution(&self) -> Option<Resolution> {
        self.state.borrow().resolution().cloned()
    }

    /// Resolves the backend URL, consulting sources in priority order.
    ///
    /// Returns an empty string when nothing usable was found on a hosted page.
    /// Concurrent calls before the first one finishes are not coalesced.
    pub async fn resolve(&self) -> String {
        self.resolve_detailed()
            .await
            .map(|resolution| resolution.url)
            .unwrap_or_default()
    }

    /// Like [`resolve`](Self::resolve) but reports which source won.
    pub async fn resolve_detailed(&self) -> Option<Resolution> {
        if let Some(resolution) = self.last_resolution() {
            return Some(resolution);
        }

        self.state.replace(ResolutionState::Resolving);
        let ctx = ResolveContext {
            env: &self.env,
            settings: &self.settings,
        };

        for source in &self.sources {
            let attempt = source.try_resolve(&ctx).await;

            // An override or a concurrent resolution may have settled the URL
            // while this one was suspended; the first memoized value stands.
            if let Some(settled) = self.last_resolution() {
                debug!("API URL settled while consulting {}, keeping {}", source.kind(), settled.url);
                return Some(settled);
            }

            let url = match attempt {
                Some(url) => url,
                None => {
                    debug!("No API URL from {}", source.kind());
                    continue;
                }
            };

            if source.persists() {
                self.persist(&url);
            }
            info!("Using API URL from {}: {}", source.kind(), url);
            return Some(self.memoize(Resolution::new(url, source.kind())));
        }

        error!(
            "Backend API URL is not configured for {}. Set apiUrl in {} or the API_URL build variable.",
            self.env.page.hostname().unwrap_or_default(),
            self.settings.config_path
        );
        self.state.replace(ResolutionState::Failed);
        None
    }

    /// Best currently known URL, without I/O.
    ///
    /// The memoized value if resolved, else the build-time constant, else the
    /// local development default.
    pub fn current(&self) -> String {
        if let Some(resolution) = self.state.borrow().resolution() {
            return resolution.url.clone();
        }
        self.settings
            .build_time()
            .and_then(usable_url)
            .unwrap_or_else(|| self.settings.local_default.clone())
    }

    /// Replaces the session URL with one supplied by a human, and persists it
    /// so the next session starts from it.
    pub fn override_url(&self, raw: &str) -> Result<Resolution> {
        let url = normalize_url(raw)?;
        if !points_at_loopback(&url) {
            self.env.storage.store(&self.settings.storage_key, &url)?;
        }
        info!("API URL overridden: {}", url);
        Ok(self.memoize(Resolution::new(url, SourceKind::ManualOverride)))
    }

    /// Drops the persisted URL and the memoized one; the next
    /// [`resolve`](Self::resolve) starts from scratch.
    pub fn forget(&self) -> Result<()> {
        self.env.storage.remove(&self.settings.storage_key)?;
        self.state.replace(ResolutionState::Unresolved);
        info!("Stored API URL cleared");
        Ok(())
    }

    fn persist(&self, url: &str) {
        // Storage only ever holds non-local URLs.
        if url.trim().is_empty() || points_at_loopback(url) {
            return;
        }
        if let Err(e) = self.env.storage.store(&self.settings.storage_key, url) {
            warn!("Failed to persist API URL {}: {}", url, e);
        }
    }

    fn memoize(&self, resolution: Resolution) -> Resolution {
        self.state.replace(ResolutionState::Resolved(resolution.clone()));
        resolution
    }
}
