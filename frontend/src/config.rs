use log::warn;
use shared::{ResolverSettings, UnresolvedPolicy};

pub struct Config;

impl Config {
    /// Backend URL baked in by the build (`API_URL=... trunk build`).
    pub fn build_time_api_url() -> Option<&'static str> {
        option_env!("API_URL").filter(|url| !url.trim().is_empty())
    }

    /// Resolver settings for this build.
    ///
    /// Everything here is fixed at compile time; `config.json` is the knob for
    /// changing the backend without a rebuild.
    pub fn resolver_settings() -> ResolverSettings {
        let mut settings = ResolverSettings::default().with_build_time_url(Self::build_time_api_url());

        if let Some(key) = option_env!("API_URL_STORAGE_KEY").filter(|k| !k.is_empty()) {
            settings = settings.with_storage_key(key);
        }
        if let Some(local) = option_env!("LOCAL_API_URL").filter(|u| !u.is_empty()) {
            settings = settings.with_local_default(local);
        }
        if let Some(policy) = option_env!("API_URL_UNRESOLVED_POLICY") {
            match policy.parse::<UnresolvedPolicy>() {
                Ok(policy) => settings = settings.with_unresolved_policy(policy),
                Err(e) => warn!("{}; keeping {:?}", e, settings.unresolved_policy),
            }
        }

        settings
    }
}
