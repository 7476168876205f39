use crate::api::api_url;
use gloo_net::http::{Request, RequestBuilder};

/// Creates a GET request against the backend at `base`.
pub fn api_get(base: &str, path: &str) -> Result<RequestBuilder, String> {
    let url = api_url(base, path).map_err(|e| format!("Cannot build request for {}: {}", path, e))?;
    Ok(Request::get(&url))
}
