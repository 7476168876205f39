//! The outside world as seen by the resolver.
//!
//! The browser implementations live in the frontend crate; the in-memory ones
//! below serve native callers and tests.

use crate::error::{ResolverError, Result};
use crate::models::runtime_config::RuntimeConfigDocument;
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Durable per-origin key/value storage. Last writer wins.
pub trait UrlStorage {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn store(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Fetches the runtime configuration document.
#[async_trait(?Send)]
pub trait ConfigFetcher {
    /// `url` already carries the cache-busting token.
    async fn fetch_document(&self, url: &str) -> Result<RuntimeConfigDocument>;
}

/// Facts about the hosting page.
pub trait PageContext {
    /// Hostname the page is served from, without port.
    fn hostname(&self) -> Option<String>;

    /// Value a human or the hosting page put in the override slot.
    fn manual_override(&self) -> Option<String>;

    fn cache_bust_token(&self) -> String {
        chrono::Utc::now().timestamp_millis().to_string()
    }
}

/// Bundle of the three seams, cheap to clone.
#[derive(Clone)]
pub struct Environment {
    pub storage: Rc<dyn UrlStorage>,
    pub fetcher: Rc<dyn ConfigFetcher>,
    pub page: Rc<dyn PageContext>,
}

impl Environment {
    pub fn new(
        storage: Rc<dyn UrlStorage>,
        fetcher: Rc<dyn ConfigFetcher>,
        page: Rc<dyn PageContext>,
    ) -> Self {
        Self {
            storage,
            fetcher,
            page,
        }
    }
}

/// Storage backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        storage
    }

    /// Makes subsequent writes fail, like a full or disabled localStorage.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl UrlStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn store(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(ResolverError::Storage("storage is read-only".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Fetcher that answers every request with the same canned outcome and
/// records the URLs it was asked for.
#[derive(Debug)]
pub struct StaticFetcher {
    response: RefCell<Result<RuntimeConfigDocument>>,
    requests: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub fn new(response: Result<RuntimeConfigDocument>) -> Self {
        Self {
            response: RefCell::new(response),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn serving(api_url: &str) -> Self {
        Self::new(Ok(RuntimeConfigDocument::new(api_url)))
    }

    /// A server without a `config.json`.
    pub fn not_found() -> Self {
        Self::new(Err(ResolverError::HttpStatus(404)))
    }

    pub fn set_response(&self, response: Result<RuntimeConfigDocument>) {
        *self.response.borrow_mut() = response;
    }

    pub fn fetch_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ConfigFetcher for StaticFetcher {
    async fn fetch_document(&self, url: &str) -> Result<RuntimeConfigDocument> {
        self.requests.borrow_mut().push(url.to_string());
        self.response.borrow().clone()
    }
}

/// Page facts fixed at construction; the override slot stays mutable.
#[derive(Debug, Default)]
pub struct StaticPage {
    hostname: Option<String>,
    manual_override: RefCell<Option<String>>,
    token: Option<String>,
}

impl StaticPage {
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: Some(hostname.to_string()),
            ..Default::default()
        }
    }

    pub fn with_override(self, url: &str) -> Self {
        self.set_override(Some(url));
        self
    }

    /// Pins the cache-busting token so requested URLs are predictable.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn set_override(&self, url: Option<&str>) {
        *self.manual_override.borrow_mut() = url.map(str::to_string);
    }
}

impl PageContext for StaticPage {
    fn hostname(&self) -> Option<String> {
        self.hostname.clone()
    }

    fn manual_override(&self) -> Option<String> {
        self.manual_override.borrow().clone()
    }

    fn cache_bust_token(&self) -> String {
        match &self.token {
            Some(token) => token.clone(),
            None => chrono::Utc::now().timestamp_millis().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load("api_url").unwrap(), None);

        storage.store("api_url", "https://a.example.com").unwrap();
        assert_eq!(storage.load("api_url").unwrap().as_deref(), Some("https://a.example.com"));

        storage.store("api_url", "https://b.example.com").unwrap();
        assert_eq!(storage.get("api_url").as_deref(), Some("https://b.example.com"));

        storage.remove("api_url").unwrap();
        assert_eq!(storage.get("api_url"), None);
    }

    #[test]
    fn memory_storage_can_refuse_writes() {
        let storage = MemoryStorage::new();
        storage.fail_writes(true);
        assert!(matches!(
            storage.store("api_url", "https://a.example.com"),
            Err(ResolverError::Storage(_))
        ));
    }

    #[test]
    fn static_page_token_defaults_to_clock() {
        let page = StaticPage::new("quiz.vercel.app");
        assert!(page.cache_bust_token().parse::<i64>().is_ok());
        assert_eq!(StaticPage::new("x").with_token("42").cache_bust_token(), "42");
    }
}
