//! In-browser tests: `wasm-pack test --headless --firefox frontend`
#![cfg(target_arch = "wasm32")]

use frontend::browser::{clear_override_slot, set_override_slot, BrowserPage, BrowserStorage};
use shared::{
    ApiUrlResolver, Environment, PageContext, ResolverSettings, SourceKind, StaticFetcher, UrlStorage,
};
use std::rc::Rc;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const TEST_KEY: &str = "api_url_browser_test";

fn settings() -> ResolverSettings {
    ResolverSettings::default().with_storage_key(TEST_KEY)
}

fn cleanup() {
    clear_override_slot();
    let _ = BrowserStorage.remove(TEST_KEY);
}

#[wasm_bindgen_test]
fn local_storage_roundtrip() {
    cleanup();
    assert_eq!(BrowserStorage.load(TEST_KEY).unwrap(), None);

    BrowserStorage.store(TEST_KEY, "https://stored.example.com").unwrap();
    assert_eq!(
        BrowserStorage.load(TEST_KEY).unwrap().as_deref(),
        Some("https://stored.example.com")
    );

    BrowserStorage.remove(TEST_KEY).unwrap();
    assert_eq!(BrowserStorage.load(TEST_KEY).unwrap(), None);
}

#[wasm_bindgen_test]
fn unquoted_storage_values_are_read() {
    cleanup();
    gloo_storage::LocalStorage::raw()
        .set_item(TEST_KEY, "https://raw.example.com")
        .unwrap();
    assert_eq!(
        BrowserStorage.load(TEST_KEY).unwrap().as_deref(),
        Some("https://raw.example.com")
    );
    cleanup();
}

#[wasm_bindgen_test]
fn override_slot_roundtrip() {
    cleanup();
    assert_eq!(BrowserPage.manual_override(), None);

    set_override_slot("https://override.example.com");
    assert_eq!(
        BrowserPage.manual_override().as_deref(),
        Some("https://override.example.com")
    );

    clear_override_slot();
    assert_eq!(BrowserPage.manual_override(), None);
}

#[wasm_bindgen_test]
fn page_reports_hostname_and_token() {
    assert!(BrowserPage.hostname().is_some());
    assert!(BrowserPage.cache_bust_token().parse::<u64>().is_ok());
}

#[wasm_bindgen_test]
async fn override_in_window_is_persisted_to_local_storage() {
    cleanup();
    set_override_slot("https://override.example.com/");

    let fetcher = Rc::new(StaticFetcher::serving("https://config.example.com"));
    let env = Environment::new(Rc::new(BrowserStorage), fetcher.clone(), Rc::new(BrowserPage));
    let resolver = ApiUrlResolver::new(env, settings());

    let resolution = resolver.resolve_detailed().await.unwrap();
    assert_eq!(resolution.url, "https://override.example.com");
    assert_eq!(resolution.source, SourceKind::ManualOverride);
    assert_eq!(fetcher.fetch_count(), 0);
    assert_eq!(
        BrowserStorage.load(TEST_KEY).unwrap().as_deref(),
        Some("https://override.example.com")
    );

    cleanup();
}
