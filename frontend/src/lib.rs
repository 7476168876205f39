use yew::prelude::*;
use log::{info, debug, error};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;
use shared::{ApiUrlResolver, Environment};
use std::cell::RefCell;
use std::rc::Rc;
use crate::browser::{BrowserFetcher, BrowserPage, BrowserStorage};
use crate::components::api_config_provider::ApiConfigProvider;
use crate::components::api_url_settings::ApiUrlSettings;
use crate::config::Config;

pub mod api;
pub mod browser;
pub mod components;
pub mod config;


thread_local! {
    // The one resolver of this page session, shared by the Yew tree and the
    // functions exported to JavaScript.
    static APP_RESOLVER: RefCell<Option<Rc<ApiUrlResolver>>> = RefCell::new(None);
}

/// Resolver wired to `window`, `localStorage` and `fetch`.
pub fn browser_resolver() -> ApiUrlResolver {
    let env = Environment::new(
        Rc::new(BrowserStorage),
        Rc::new(BrowserFetcher),
        Rc::new(BrowserPage),
    );
    ApiUrlResolver::new(env, Config::resolver_settings())
}

/// Makes `resolver` the page session's resolver. Only the first call wins.
pub fn install_resolver(resolver: Rc<ApiUrlResolver>) -> Rc<ApiUrlResolver> {
    APP_RESOLVER.with(|slot| {
        let mut slot = slot.borrow_mut();
        match slot.as_ref() {
            Some(existing) => existing.clone(),
            None => {
                *slot = Some(resolver.clone());
                resolver
            }
        }
    })
}

/// The page session's resolver, creating the browser one on first use.
pub fn app_resolver() -> Rc<ApiUrlResolver> {
    let existing = APP_RESOLVER.with(|slot| slot.borrow().clone());
    match existing {
        Some(resolver) => resolver,
        None => install_resolver(Rc::new(browser_resolver())),
    }
}

/// Resolves the backend base URL. Empty when nothing is configured.
#[wasm_bindgen(js_name = resolveApiUrl)]
pub async fn resolve_api_url() -> String {
    app_resolver().resolve().await
}

/// Best backend URL known right now, without network access.
#[wasm_bindgen(js_name = apiUrlSync)]
pub fn api_url_sync() -> String {
    app_resolver().current()
}

/// Winning URL and source as JSON, or `undefined` before resolution.
#[wasm_bindgen(js_name = apiUrlResolution)]
pub fn api_url_resolution() -> Option<String> {
    let resolution = app_resolver().last_resolution()?;
    serde_json::to_string(&resolution).ok()
}

/// Debugging hook: points the page at another backend and remembers it.
#[wasm_bindgen(js_name = setApiUrl)]
pub fn set_api_url(url: &str) -> Result<String, JsValue> {
    let resolution = app_resolver()
        .override_url(url)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    browser::set_override_slot(&resolution.url);
    Ok(resolution.url)
}

/// Debugging hook: forgets the stored and overridden backend URL.
#[wasm_bindgen(js_name = resetApiUrl)]
pub fn reset_api_url() -> Result<(), JsValue> {
    browser::clear_override_slot();
    app_resolver()
        .forget()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[function_component(App)]
fn app() -> Html {
    debug!("App component rendering");
    html! {
        <ApiConfigProvider>
            <div class="app-container">
                <main class="flex-1 p-4">
                    <ApiUrlSettings />
                </main>
            </div>
        </ApiConfigProvider>
    }
}

#[wasm_bindgen]
pub async fn run_app() -> Result<(), JsValue> {
    // Initialize logging
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    info!("Logger initialized");

    // Set up panic hook
    console_error_panic_hook::set_once();
    info!("Panic hook set");

    // One resolver per page session, created before anything talks to the backend
    let resolver = install_resolver(Rc::new(browser_resolver()));
    let url = resolver.resolve().await;
    if url.is_empty() {
        error!("Starting without a backend API URL");
    } else {
        info!("Backend API URL: {}", url);
    }

    info!("Mounting application to #app");
    yew::Renderer::<App>::new().render();
    info!("Application mounted");

    Ok(())
}

// Add a start function that Trunk can call
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = run_app().await {
            error!("Failed to run app: {:?}", e);
        }
    });
    Ok(())
}
