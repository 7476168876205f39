pub mod utils;

use crate::components::api_config_provider::ApiConfigContext;
use shared::{join_api_path, ResolverError};

/// Absolute URL for `path` on the backend at `base`.
///
/// Fails with [`ResolverError::Unconfigured`] when `base` is empty, so a
/// missing configuration shows up as an error instead of a request to the
/// page's own origin.
pub fn api_url(base: &str, path: &str) -> Result<String, ResolverError> {
    join_api_path(base, path)
}

/// Same as [`api_url`], using the base URL currently held by the context.
pub fn context_api_url(config: &ApiConfigContext, path: &str) -> Result<String, ResolverError> {
    api_url(&config.base_url(), path)
}
