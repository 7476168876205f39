pub mod models {
    pub mod resolution;
    pub mod runtime_config;
}

pub mod config;
pub mod environment;
pub mod error;
pub mod heuristics;
pub mod resolver;
pub mod sources;
pub mod urls;

// Re-export commonly used items
pub use error::{ResolverError, Result};

pub use config::{HostingRule, ResolverSettings, UnresolvedPolicy};
pub use environment::{
    ConfigFetcher, Environment, MemoryStorage, PageContext, StaticFetcher, StaticPage, UrlStorage,
};
pub use models::{
    resolution::{Resolution, ResolutionState, SourceKind},
    runtime_config::RuntimeConfigDocument,
};
pub use resolver::ApiUrlResolver;
pub use sources::{ResolveContext, UrlSource};
pub use urls::{join_api_path, normalize_url};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_from_served_json() {
        let body = r#"{ "apiUrl": "https://assessment-api.railway.app" }"#;
        let doc = RuntimeConfigDocument::from_json(body).unwrap();
        let settings = ResolverSettings::default();

        assert_eq!(
            doc.configured_url(&settings).as_deref(),
            Some("https://assessment-api.railway.app")
        );
    }

    #[test]
    fn test_settings_feed_heuristics() {
        let settings = ResolverSettings::default();
        let guess = heuristics::guess_backend_url("assessment.vercel.app", &settings.hosting_rules);

        assert_eq!(
            guess.map(|g| g.url).as_deref(),
            Some("https://assessment.railway.app")
        );
    }
}
