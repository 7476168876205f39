use async_trait::async_trait;
use gloo_net::http::Request;
use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use log::debug;
use shared::{ConfigFetcher, PageContext, ResolverError, Result, RuntimeConfigDocument, UrlStorage};
use wasm_bindgen::JsValue;

/// Global a human or the hosting page sets to force a backend URL.
pub const OVERRIDE_SLOT: &str = "__API_URL__";

/// `window.localStorage`, shared by every tab of the origin.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl UrlStorage for BrowserStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match LocalStorage::get::<String>(key) {
            Ok(value) => Ok(Some(value)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            // Written by hand in devtools, or by an older build, without JSON quoting
            Err(StorageError::SerdeError(_)) => LocalStorage::raw()
                .get_item(key)
                .map_err(|e| ResolverError::Storage(format!("{:?}", e))),
            Err(e) => Err(ResolverError::Storage(e.to_string())),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<()> {
        LocalStorage::set(key, value).map_err(|e| ResolverError::Storage(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        LocalStorage::delete(key);
        Ok(())
    }
}

/// Fetches `config.json` from the page's own origin.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserFetcher;

#[async_trait(?Send)]
impl ConfigFetcher for BrowserFetcher {
    async fn fetch_document(&self, url: &str) -> Result<RuntimeConfigDocument> {
        debug!("Fetching runtime config from {}", url);
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| ResolverError::Fetch(e.to_string()))?;

        if !response.ok() {
            return Err(ResolverError::HttpStatus(response.status()));
        }

        // SPA hosts answer unknown paths with index.html, so parse the text
        // ourselves rather than trusting the content type.
        let body = response
            .text()
            .await
            .map_err(|e| ResolverError::Fetch(e.to_string()))?;
        RuntimeConfigDocument::from_json(&body)
    }
}

/// The current `window`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserPage;

impl PageContext for BrowserPage {
    fn hostname(&self) -> Option<String> {
        web_sys::window()?.location().hostname().ok()
    }

    fn manual_override(&self) -> Option<String> {
        let window = web_sys::window()?;
        js_sys::Reflect::get(&window, &JsValue::from_str(OVERRIDE_SLOT))
            .ok()?
            .as_string()
    }

    fn cache_bust_token(&self) -> String {
        format!("{}", js_sys::Date::now() as u64)
    }
}

/// Writes `url` into the override slot so the page and devtools see it.
pub fn set_override_slot(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = js_sys::Reflect::set(
            &window,
            &JsValue::from_str(OVERRIDE_SLOT),
            &JsValue::from_str(url),
        );
    }
}

pub fn clear_override_slot() {
    if let Some(window) = web_sys::window() {
        let _ = js_sys::Reflect::delete_property(&window, &JsValue::from_str(OVERRIDE_SLOT));
    }
}
