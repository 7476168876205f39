use serde::{Deserialize, Serialize};

/// Storage key holding the last successfully resolved non-local URL.
pub const DEFAULT_STORAGE_KEY: &str = "api_url";

/// Runtime configuration document served next to the page.
pub const DEFAULT_CONFIG_PATH: &str = "/config.json";

/// Local development backend.
pub const DEFAULT_LOCAL_URL: &str = "http://localhost:8080";

/// What the resolver returns when no source produced a URL on a hosted page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Return an empty URL so that API calls fail loudly.
    Empty,
    /// Return the local development default anyway.
    LocalDefault,
}

impl Default for UnresolvedPolicy {
    fn default() -> Self {
        UnresolvedPolicy::Empty
    }
}

impl std::str::FromStr for UnresolvedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "empty" => Ok(UnresolvedPolicy::Empty),
            "local" | "local_default" | "localdefault" => Ok(UnresolvedPolicy::LocalDefault),
            _ => Err(format!("Unknown unresolved policy: {}", s)),
        }
    }
}

/// A hosting provider whose hostnames let us guess the companion backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostingRule {
    /// Provider name, used in log lines only
    pub name: String,
    /// Hostname suffixes identifying the provider, e.g. `vercel.app`
    pub host_suffixes: Vec<String>,
    /// Ordered candidate URL patterns; `{project}` is replaced with the
    /// project name derived from the hostname
    pub candidates: Vec<String>,
}

impl HostingRule {
    pub fn new(name: &str, host_suffixes: &[&str], candidates: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            host_suffixes: host_suffixes.iter().map(|s| s.to_string()).collect(),
            candidates: candidates.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Frontend on Vercel, backend on Railway.
    pub fn vercel() -> Self {
        Self::new(
            "vercel",
            &["vercel.app", "vercel.com"],
            &["https://{project}.railway.app"],
        )
    }
}

/// Everything the resolver needs to know up front.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolverSettings {
    pub storage_key: String,
    pub config_path: String,
    /// Value baked in at build time; empty when the build did not set one
    pub build_time_url: Option<String>,
    pub local_default: String,
    /// `apiUrl` values shipped in template config files
    pub placeholders: Vec<String>,
    pub hosting_rules: Vec<HostingRule>,
    pub unresolved_policy: UnresolvedPolicy,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            config_path: DEFAULT_CONFIG_PATH.to_string(),
            build_time_url: None,
            local_default: DEFAULT_LOCAL_URL.to_string(),
            placeholders: default_placeholders(),
            hosting_rules: vec![HostingRule::vercel()],
            unresolved_policy: UnresolvedPolicy::default(),
        }
    }
}

fn default_placeholders() -> Vec<String> {
    [
        "https://your-backend-url.railway.app",
        "https://your-backend.railway.app",
        "https://your-backend-url.com",
        "YOUR_BACKEND_URL",
        "YOUR_API_URL",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl ResolverSettings {
    pub fn with_build_time_url(mut self, url: Option<&str>) -> Self {
        self.build_time_url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_storage_key(mut self, key: &str) -> Self {
        self.storage_key = key.to_string();
        self
    }

    pub fn with_local_default(mut self, url: &str) -> Self {
        self.local_default = url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_unresolved_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved_policy = policy;
        self
    }

    /// Build-time constant if it is set and non-empty.
    pub fn build_time(&self) -> Option<&str> {
        self.build_time_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// Whether `url` is one of the known template values.
    pub fn is_placeholder(&self, url: &str) -> bool {
        let candidate = url.trim().trim_end_matches('/');
        self.placeholders
            .iter()
            .any(|p| p.trim().trim_end_matches('/').eq_ignore_ascii_case(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let settings = ResolverSettings::default();
        assert_eq!(settings.storage_key, "api_url");
        assert_eq!(settings.config_path, "/config.json");
        assert_eq!(settings.local_default, "http://localhost:8080");
        assert_eq!(settings.unresolved_policy, UnresolvedPolicy::Empty);
        assert_eq!(settings.build_time(), None);
        assert_eq!(settings.hosting_rules, vec![HostingRule::vercel()]);
    }

    #[test]
    fn blank_build_time_url_is_ignored() {
        let settings = ResolverSettings::default().with_build_time_url(Some("   "));
        assert_eq!(settings.build_time_url, None);

        let settings = ResolverSettings::default().with_build_time_url(Some(" https://api.example.com "));
        assert_eq!(settings.build_time(), Some("https://api.example.com"));
    }

    #[test]
    fn placeholder_matching_ignores_case_and_trailing_slash() {
        let settings = ResolverSettings::default();
        assert!(settings.is_placeholder("https://your-backend-url.railway.app/"));
        assert!(settings.is_placeholder("  https://YOUR-BACKEND-URL.railway.app "));
        assert!(settings.is_placeholder("your_api_url"));
        assert!(!settings.is_placeholder("https://quiz-api.railway.app"));
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("empty".parse::<UnresolvedPolicy>(), Ok(UnresolvedPolicy::Empty));
        assert_eq!("Local".parse::<UnresolvedPolicy>(), Ok(UnresolvedPolicy::LocalDefault));
        assert!("guess".parse::<UnresolvedPolicy>().is_err());
    }

    #[test]
    fn settings_roundtrip_through_json() {
        let settings = ResolverSettings::default().with_storage_key("backend_url");
        let json = serde_json::to_string(&settings).unwrap();
        let back: ResolverSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
